//! The fixed mastering sub-chain.

use super::model::{CompressParams, plain, signed};
use crate::config::MasteringDefaults;
use serde::{Deserialize, Serialize};

/// One built-in stage of the mastering chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum MasterStage {
    HighPass {
        cutoff_hz: f64,
    },
    Compress(CompressParams),
    TwoBandEq {
        low_hz: f64,
        low_gain_db: f64,
        high_hz: f64,
        high_gain_db: f64,
    },
    Limit {
        ceiling_db: f64,
    },
    Normalize {
        target_lufs: f64,
        true_peak_db: f64,
        loudness_range: f64,
    },
}

impl MasterStage {
    pub fn describe(&self) -> String {
        match self {
            Self::HighPass { cutoff_hz } => format!("High-pass @ {}Hz", plain(*cutoff_hz)),
            Self::Compress(p) => format!(
                "Compression {}:1 @ {}dB",
                plain(p.ratio),
                plain(p.threshold_db)
            ),
            Self::TwoBandEq {
                low_hz,
                low_gain_db,
                high_hz,
                high_gain_db,
            } => format!(
                "EQ {}dB @ {}Hz, {}dB @ {}Hz",
                signed(*low_gain_db),
                plain(*low_hz),
                signed(*high_gain_db),
                plain(*high_hz)
            ),
            Self::Limit { ceiling_db } => format!("Limiter @ {}dB", plain(*ceiling_db)),
            Self::Normalize { target_lufs, .. } => {
                format!("Loudness {} LUFS", plain(*target_lufs))
            }
        }
    }
}

/// The ordered stages a `Master` operation resolves to.
///
/// Order is always: high-pass, compression, two-band EQ, limiter, loudness.
#[derive(Debug, Clone, PartialEq)]
pub struct MasteringChain {
    stages: [MasterStage; 5],
}

impl MasteringChain {
    pub fn new(defaults: &MasteringDefaults) -> Self {
        Self {
            stages: [
                MasterStage::HighPass {
                    cutoff_hz: defaults.highpass_hz,
                },
                MasterStage::Compress(CompressParams {
                    threshold_db: defaults.comp_threshold_db,
                    ratio: defaults.comp_ratio,
                    attack_ms: defaults.comp_attack_ms,
                    release_ms: defaults.comp_release_ms,
                }),
                MasterStage::TwoBandEq {
                    low_hz: defaults.eq_low_hz,
                    low_gain_db: defaults.eq_low_gain_db,
                    high_hz: defaults.eq_high_hz,
                    high_gain_db: defaults.eq_high_gain_db,
                },
                MasterStage::Limit {
                    ceiling_db: defaults.limiter_ceiling_db,
                },
                MasterStage::Normalize {
                    target_lufs: defaults.target_lufs,
                    true_peak_db: defaults.true_peak_db,
                    loudness_range: defaults.loudness_range,
                },
            ],
        }
    }

    pub fn stages(&self) -> &[MasterStage] {
        &self.stages
    }
}

impl Default for MasteringChain {
    fn default() -> Self {
        Self::new(&MasteringDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_order_is_fixed() {
        let chain = MasteringChain::default();
        let names: Vec<&str> = chain
            .stages()
            .iter()
            .map(|stage| match stage {
                MasterStage::HighPass { .. } => "highpass",
                MasterStage::Compress(_) => "compress",
                MasterStage::TwoBandEq { .. } => "eq",
                MasterStage::Limit { .. } => "limit",
                MasterStage::Normalize { .. } => "normalize",
            })
            .collect();
        assert_eq!(names, vec!["highpass", "compress", "eq", "limit", "normalize"]);
    }

    #[test]
    fn test_chain_uses_house_defaults() {
        let chain = MasteringChain::default();
        assert_eq!(chain.stages()[0], MasterStage::HighPass { cutoff_hz: 30.0 });
        assert_eq!(chain.stages()[3], MasterStage::Limit { ceiling_db: -1.0 });
        assert_eq!(
            chain.stages()[4].describe(),
            "Loudness -14 LUFS"
        );
    }

    #[test]
    fn test_chain_honours_overrides() {
        let defaults = MasteringDefaults {
            target_lufs: -16.0,
            ..MasteringDefaults::default()
        };
        let chain = MasteringChain::new(&defaults);
        match &chain.stages()[4] {
            MasterStage::Normalize { target_lufs, .. } => assert_eq!(*target_lufs, -16.0),
            other => panic!("unexpected stage: {:?}", other),
        }
    }
}
