//! External collaborators at the interface boundary.
//!
//! The audio engine performs the actual signal processing; the metadata
//! source describes artifacts for display. Both are optional to understand:
//! the orchestrator only looks at success/failure and the produced path.

use crate::operation::Operation;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of a single engine invocation.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineError {
    #[error("tool '{tool}' is not available")]
    ToolMissing { tool: String },

    #[error("failed to start engine: {message}")]
    Spawn { message: String },

    #[error("engine exited with status {status}: {stderr}")]
    NonZeroExit { status: i32, stderr: String },

    #[error("engine timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("operation '{operation}' cannot be executed by this engine")]
    Unsupported { operation: String },

    #[error("engine reported success but produced no file at {path}")]
    OutputMissing { path: String },

    #[error("unreadable engine output: {message}")]
    InvalidOutput { message: String },
}

/// Performs audio transformations on artifacts.
///
/// `output` is the slot the ledger reserved for the next version; on success
/// the engine returns the path it actually wrote (normally `output`).
#[async_trait]
pub trait AudioEngine: Send + Sync {
    async fn apply(
        &self,
        input: &Path,
        operation: &Operation,
        output: &Path,
    ) -> Result<PathBuf, EngineError>;

    /// Terminal encode of `input` into the distribution format at `destination`.
    async fn export(&self, input: &Path, destination: &Path) -> Result<(), EngineError>;
}

/// Display facts about an artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioInfo {
    pub duration_secs: Option<f64>,
    pub sample_rate_hz: Option<u32>,
    pub channels: Option<u32>,
    pub bitrate_kbps: Option<u32>,
}

impl AudioInfo {
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(duration) = self.duration_secs {
            lines.push(format!("Duration: {:.1}s", duration));
        }
        if let Some(rate) = self.sample_rate_hz {
            lines.push(format!("Sample Rate: {} Hz", rate));
        }
        if let Some(channels) = self.channels {
            lines.push(format!("Channels: {}", channels));
        }
        if let Some(bitrate) = self.bitrate_kbps {
            lines.push(format!("Bitrate: {} kbps", bitrate));
        }
        lines
    }
}

/// Optional source of audio facts. Failures here never block mixing.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn probe(&self, artifact: &Path) -> Result<AudioInfo, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_info_describe_skips_unknown_fields() {
        let info = AudioInfo {
            duration_secs: Some(182.44),
            sample_rate_hz: Some(44_100),
            channels: None,
            bitrate_kbps: Some(320),
        };
        assert_eq!(
            info.describe(),
            vec![
                "Duration: 182.4s".to_string(),
                "Sample Rate: 44100 Hz".to_string(),
                "Bitrate: 320 kbps".to_string(),
            ]
        );
    }
}
