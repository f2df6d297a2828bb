//! Configuration model.
//!
//! All values are "house defaults": a missing `config.toml`, a missing
//! section, or a missing key all resolve to the defaults below.

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct MixConfig {
    pub engine: EngineConfig,
    pub mastering: MasteringDefaults,
    pub export: ExportConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// ffmpeg executable (name on PATH or absolute path)
    pub ffmpeg_bin: String,
    /// ffprobe executable (name on PATH or absolute path)
    pub ffprobe_bin: String,
    /// Upper bound for a single engine invocation
    pub timeout_secs: u64,
    /// Extension of intermediate versioned artifacts
    pub working_extension: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
            timeout_secs: 300,
            working_extension: "wav".to_string(),
        }
    }
}

/// Constants of the five-stage mastering chain.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MasteringDefaults {
    pub highpass_hz: f64,
    pub comp_threshold_db: f64,
    pub comp_ratio: f64,
    pub comp_attack_ms: f64,
    pub comp_release_ms: f64,
    pub eq_low_hz: f64,
    pub eq_low_gain_db: f64,
    pub eq_high_hz: f64,
    pub eq_high_gain_db: f64,
    pub limiter_ceiling_db: f64,
    pub target_lufs: f64,
    pub true_peak_db: f64,
    pub loudness_range: f64,
}

impl Default for MasteringDefaults {
    fn default() -> Self {
        Self {
            highpass_hz: 30.0,
            comp_threshold_db: -18.0,
            comp_ratio: 3.0,
            comp_attack_ms: 10.0,
            comp_release_ms: 100.0,
            eq_low_hz: 100.0,
            eq_low_gain_db: 1.0,
            eq_high_hz: 10_000.0,
            eq_high_gain_db: 1.5,
            limiter_ceiling_db: -1.0,
            target_lufs: -14.0,
            true_peak_db: -1.5,
            loudness_range: 11.0,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// ffmpeg audio codec for the terminal encode
    pub codec: String,
    pub bitrate_kbps: u32,
    /// Appended to export names that have no extension
    pub extension: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            codec: "libmp3lame".to_string(),
            bitrate_kbps: 320,
            extension: "mp3".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: MixConfig = toml::from_str(
            r#"
            [mastering]
            target_lufs = -16.0

            [export]
            bitrate_kbps = 256
            "#,
        )
        .unwrap();

        assert_eq!(config.mastering.target_lufs, -16.0);
        assert_eq!(config.mastering.highpass_hz, 30.0);
        assert_eq!(config.export.bitrate_kbps, 256);
        assert_eq!(config.export.codec, "libmp3lame");
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: MixConfig = toml::from_str("").unwrap();
        assert_eq!(config, MixConfig::default());
    }
}
