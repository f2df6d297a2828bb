//! Mixing operation domain models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumIter};

/// The fixed vocabulary of mixing operation kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OperationKind {
    Equalize,
    Compress,
    Reverb,
    Volume,
    StereoWidth,
    Master,
    StyleChange,
}

impl OperationKind {
    /// Suffix used when naming the artifact produced by this kind.
    pub fn slot_suffix(&self) -> &'static str {
        match self {
            Self::Equalize => "eq",
            Self::Compress => "compression",
            Self::Reverb => "reverb",
            Self::Volume => "volume",
            Self::StereoWidth => "stereo_width",
            Self::Master => "master",
            Self::StyleChange => "style",
        }
    }

    /// Short label for summaries ("EQ", "Compression", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Equalize => "EQ",
            Self::Compress => "Compression",
            Self::Reverb => "Reverb",
            Self::Volume => "Volume",
            Self::StereoWidth => "Stereo Width",
            Self::Master => "Mastering",
            Self::StyleChange => "Style Change",
        }
    }
}

/// Three-band equalizer gains in dB (100 Hz, 1 kHz, 10 kHz).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EqParams {
    pub bass_db: f64,
    pub mid_db: f64,
    pub treble_db: f64,
}

/// Dynamic range compression settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressParams {
    pub threshold_db: f64,
    pub ratio: f64,
    pub attack_ms: f64,
    pub release_ms: f64,
}

impl Default for CompressParams {
    fn default() -> Self {
        Self {
            threshold_db: -20.0,
            ratio: 4.0,
            attack_ms: 5.0,
            release_ms: 50.0,
        }
    }
}

/// Reverb settings; every field lies in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReverbParams {
    pub room_size: f64,
    pub damping: f64,
    pub wet: f64,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            room_size: 0.5,
            damping: 0.5,
            wet: 0.3,
        }
    }
}

impl ReverbParams {
    /// Returns a copy with every field clamped into `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            room_size: self.room_size.clamp(0.0, 1.0),
            damping: self.damping.clamp(0.0, 1.0),
            wet: self.wet.clamp(0.0, 1.0),
        }
    }
}

/// Gain change in dB.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VolumeParams {
    pub delta_db: f64,
}

impl VolumeParams {
    /// Gain used for "louder"/"quieter" without an explicit number.
    pub const QUALITATIVE_STEP_DB: f64 = 3.0;
    /// Gain used for "much louder"/"much quieter".
    pub const STRONG_STEP_DB: f64 = 6.0;
}

/// Stereo width multiplier (1.0 = unchanged).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidthParams {
    pub multiplier: f64,
}

impl Default for WidthParams {
    fn default() -> Self {
        Self { multiplier: 1.0 }
    }
}

impl WidthParams {
    pub fn new(multiplier: f64) -> Self {
        Self {
            multiplier: multiplier.max(0.0),
        }
    }
}

/// A single typed, parameterized mixing instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    Equalize(EqParams),
    Compress(CompressParams),
    Reverb(ReverbParams),
    Volume(VolumeParams),
    StereoWidth(WidthParams),
    /// Expands to the fixed mastering chain at execution time.
    Master,
    /// Never executed locally; signals an external regeneration workflow.
    StyleChange { prompt: String },
}

impl Operation {
    /// Default-parameter constructor for each kind.
    ///
    /// `StyleChange` has no meaningful default payload and gets an empty prompt.
    pub fn default_for(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Equalize => Self::Equalize(EqParams::default()),
            OperationKind::Compress => Self::Compress(CompressParams::default()),
            OperationKind::Reverb => Self::Reverb(ReverbParams::default()),
            OperationKind::Volume => Self::Volume(VolumeParams::default()),
            OperationKind::StereoWidth => Self::StereoWidth(WidthParams::default()),
            OperationKind::Master => Self::Master,
            OperationKind::StyleChange => Self::StyleChange {
                prompt: String::new(),
            },
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Equalize(_) => OperationKind::Equalize,
            Self::Compress(_) => OperationKind::Compress,
            Self::Reverb(_) => OperationKind::Reverb,
            Self::Volume(_) => OperationKind::Volume,
            Self::StereoWidth(_) => OperationKind::StereoWidth,
            Self::Master => OperationKind::Master,
            Self::StyleChange { .. } => OperationKind::StyleChange,
        }
    }

    /// Whether the external audio engine can execute this operation.
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::StyleChange { .. })
    }

    /// Short human-readable description of the resolved parameters.
    pub fn describe(&self) -> String {
        match self {
            Self::Equalize(p) => format!(
                "EQ: bass={}dB, mid={}dB, treble={}dB",
                signed(p.bass_db),
                signed(p.mid_db),
                signed(p.treble_db)
            ),
            Self::Compress(p) => format!(
                "Compression: {}:1 @ {}dB",
                plain(p.ratio),
                plain(p.threshold_db)
            ),
            Self::Reverb(p) => format!("Reverb: room={:.1}, wet={:.1}", p.room_size, p.wet),
            Self::Volume(p) => format!("Volume: {}dB", signed(p.delta_db)),
            Self::StereoWidth(p) => format!("Stereo Width: {:.1}x", p.multiplier),
            Self::Master => "Mastering chain applied (HP, Comp, EQ, Limiter, Loudness)".to_string(),
            Self::StyleChange { prompt } => format!("Style change: {}", prompt),
        }
    }

    /// Resolved numeric parameters, keyed by name, for history records.
    pub fn params(&self) -> BTreeMap<String, f64> {
        let pairs: Vec<(&str, f64)> = match self {
            Self::Equalize(p) => vec![
                ("bass_db", p.bass_db),
                ("mid_db", p.mid_db),
                ("treble_db", p.treble_db),
            ],
            Self::Compress(p) => vec![
                ("threshold_db", p.threshold_db),
                ("ratio", p.ratio),
                ("attack_ms", p.attack_ms),
                ("release_ms", p.release_ms),
            ],
            Self::Reverb(p) => vec![
                ("room_size", p.room_size),
                ("damping", p.damping),
                ("wet", p.wet),
            ],
            Self::Volume(p) => vec![("delta_db", p.delta_db)],
            Self::StereoWidth(p) => vec![("multiplier", p.multiplier)],
            Self::Master | Self::StyleChange { .. } => Vec::new(),
        };

        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

/// Formats a number with an explicit sign, dropping a zero fraction.
pub(crate) fn signed(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:+}", value as i64)
    } else {
        format!("{:+.1}", value)
    }
}

/// Formats a number without a forced sign, dropping a zero fraction.
pub(crate) fn plain(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_default_for_round_trips_kind() {
        for kind in OperationKind::iter() {
            assert_eq!(Operation::default_for(kind).kind(), kind);
        }
    }

    #[test]
    fn test_describe_eq() {
        let op = Operation::Equalize(EqParams {
            bass_db: 2.0,
            mid_db: 0.0,
            treble_db: -1.0,
        });
        assert_eq!(op.describe(), "EQ: bass=+2dB, mid=+0dB, treble=-1dB");
    }

    #[test]
    fn test_describe_compression_and_volume() {
        assert_eq!(
            Operation::default_for(OperationKind::Compress).describe(),
            "Compression: 4:1 @ -20dB"
        );
        let op = Operation::Volume(VolumeParams { delta_db: -7.0 });
        assert_eq!(op.describe(), "Volume: -7dB");
        let op = Operation::Volume(VolumeParams { delta_db: 1.5 });
        assert_eq!(op.describe(), "Volume: +1.5dB");
    }

    #[test]
    fn test_style_change_is_not_local() {
        let op = Operation::StyleChange {
            prompt: "make it sound like jazz".to_string(),
        };
        assert!(!op.is_local());
        assert!(Operation::Master.is_local());
        assert!(op.params().is_empty());
    }

    #[test]
    fn test_width_never_negative() {
        assert_eq!(WidthParams::new(-2.0).multiplier, 0.0);
    }

    #[test]
    fn test_params_names() {
        let params = Operation::default_for(OperationKind::Reverb).params();
        assert_eq!(params.get("room_size"), Some(&0.5));
        assert_eq!(params.get("wet"), Some(&0.3));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_kind_display_is_snake_case() {
        assert_eq!(OperationKind::StereoWidth.to_string(), "stereo_width");
        assert_eq!(OperationKind::Compress.as_ref(), "compress");
    }
}
