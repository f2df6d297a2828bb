//! ffprobe-backed metadata source.

use super::process::run_tool;
use async_trait::async_trait;
use mixr_core::config::EngineConfig;
use mixr_core::engine::{AudioInfo, EngineError, MetadataSource};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

// ffprobe reports most numbers as strings
#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
    bit_rate: Option<String>,
}

pub struct FfprobeMetadataSource {
    ffprobe_bin: String,
    timeout_secs: u64,
}

impl FfprobeMetadataSource {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            ffprobe_bin: config.ffprobe_bin.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

#[async_trait]
impl MetadataSource for FfprobeMetadataSource {
    async fn probe(&self, artifact: &Path) -> Result<AudioInfo, EngineError> {
        let args = vec![
            "-v".to_string(),
            "quiet".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            "-show_format".to_string(),
            "-show_streams".to_string(),
            artifact.to_string_lossy().into_owned(),
        ];
        let output = run_tool(&self.ffprobe_bin, &args, self.timeout_secs).await?;
        parse_probe_json(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Extracts display facts from `ffprobe -print_format json` output.
pub fn parse_probe_json(json: &str) -> Result<AudioInfo, EngineError> {
    let probe: ProbeOutput = serde_json::from_str(json).map_err(|e| EngineError::InvalidOutput {
        message: e.to_string(),
    })?;

    let audio = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"));

    let mut info = AudioInfo::default();
    if let Some(stream) = audio {
        info.sample_rate_hz = stream.sample_rate.as_deref().and_then(|v| v.parse().ok());
        info.channels = stream.channels;
    }
    if let Some(format) = probe.format {
        info.duration_secs = format.duration.as_deref().and_then(|v| v.parse().ok());
        info.bitrate_kbps = format
            .bit_rate
            .as_deref()
            .and_then(|v| v.parse::<u64>().ok())
            .map(|bps| (bps / 1000) as u32);
    }
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_json_picks_audio_stream() {
        let json = r#"{
            "streams": [
                {"codec_type": "video", "width": 600},
                {"codec_type": "audio", "sample_rate": "48000", "channels": 2}
            ],
            "format": {"duration": "182.440000", "bit_rate": "320000"}
        }"#;

        let info = parse_probe_json(json).unwrap();
        assert_eq!(info.sample_rate_hz, Some(48_000));
        assert_eq!(info.channels, Some(2));
        assert_eq!(info.duration_secs, Some(182.44));
        assert_eq!(info.bitrate_kbps, Some(320));
    }

    #[test]
    fn test_parse_probe_json_tolerates_missing_fields() {
        let info = parse_probe_json("{}").unwrap();
        assert_eq!(info, AudioInfo::default());
    }

    #[test]
    fn test_parse_probe_json_rejects_garbage() {
        assert!(matches!(
            parse_probe_json("not json"),
            Err(EngineError::InvalidOutput { .. })
        ));
    }
}
