//! FFmpeg-backed audio engine.
//!
//! Every operation becomes one `ffmpeg -af <filter graph>` invocation from the
//! input artifact to the slot the ledger reserved. Filter graphs are built by
//! pure functions so they can be checked without ffmpeg installed.

use super::process::run_tool;
use async_trait::async_trait;
use mixr_core::config::{EngineConfig, ExportConfig, MixConfig};
use mixr_core::engine::{AudioEngine, EngineError};
use mixr_core::operation::{
    CompressParams, EqParams, MasterStage, MasteringChain, Operation, ReverbParams,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

const EQ_BANDS_HZ: [f64; 3] = [100.0, 1_000.0, 10_000.0];
const TOOL_CHECK_TIMEOUT_SECS: u64 = 10;

/// Availability of one external executable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub available: bool,
}

pub struct FfmpegEngine {
    engine: EngineConfig,
    export: ExportConfig,
    mastering: MasteringChain,
}

impl FfmpegEngine {
    pub fn new(config: &MixConfig) -> Self {
        Self {
            engine: config.engine.clone(),
            export: config.export.clone(),
            mastering: MasteringChain::new(&config.mastering),
        }
    }

    pub fn mastering(&self) -> &MasteringChain {
        &self.mastering
    }

    /// Probes `ffmpeg -version` and `ffprobe -version`.
    pub async fn check_tools(&self) -> Vec<ToolStatus> {
        let mut statuses = Vec::new();
        for bin in [&self.engine.ffmpeg_bin, &self.engine.ffprobe_bin] {
            let available = run_tool(bin, &["-version".to_string()], TOOL_CHECK_TIMEOUT_SECS)
                .await
                .is_ok();
            if !available {
                tracing::warn!(tool = %bin, "[FfmpegEngine] Tool not available");
            }
            statuses.push(ToolStatus {
                name: bin.clone(),
                available,
            });
        }
        statuses
    }

    async fn run_to(&self, args: Vec<String>, output: &Path) -> Result<(), EngineError> {
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| EngineError::Spawn {
                    message: format!("cannot create {}: {}", parent.display(), e),
                })?;
        }

        run_tool(&self.engine.ffmpeg_bin, &args, self.engine.timeout_secs).await?;

        if !tokio::fs::try_exists(output).await.unwrap_or(false) {
            return Err(EngineError::OutputMissing {
                path: output.display().to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AudioEngine for FfmpegEngine {
    async fn apply(
        &self,
        input: &Path,
        operation: &Operation,
        output: &Path,
    ) -> Result<PathBuf, EngineError> {
        let filter = filter_graph(operation, &self.mastering)?;
        self.run_to(apply_args(input, &filter, output), output).await?;
        tracing::info!(
            kind = %operation.kind(),
            output = %output.display(),
            "[FfmpegEngine] Applied operation"
        );
        Ok(output.to_path_buf())
    }

    async fn export(&self, input: &Path, destination: &Path) -> Result<(), EngineError> {
        self.run_to(export_args(input, &self.export, destination), destination)
            .await?;
        tracing::info!(destination = %destination.display(), "[FfmpegEngine] Exported");
        Ok(())
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn apply_args(input: &Path, filter: &str, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-i".to_string(),
        path_arg(input),
        "-af".to_string(),
        filter.to_string(),
        path_arg(output),
    ]
}

fn export_args(input: &Path, export: &ExportConfig, destination: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-i".to_string(),
        path_arg(input),
        "-c:a".to_string(),
        export.codec.clone(),
        "-b:a".to_string(),
        format!("{}k", export.bitrate_kbps),
        path_arg(destination),
    ]
}

/// Builds the `-af` filter graph for one operation.
pub fn filter_graph(operation: &Operation, mastering: &MasteringChain) -> Result<String, EngineError> {
    let graph = match operation {
        Operation::Equalize(p) => equalizer(p),
        Operation::Compress(p) => compressor(p),
        Operation::Reverb(p) => echo(p),
        Operation::Volume(p) => format!("volume={}dB", num(p.delta_db)),
        Operation::StereoWidth(p) => format!("stereotools=slev={}", num(p.multiplier)),
        Operation::Master => mastering
            .stages()
            .iter()
            .map(stage_filter)
            .collect::<Vec<_>>()
            .join(","),
        Operation::StyleChange { .. } => {
            return Err(EngineError::Unsupported {
                operation: operation.kind().to_string(),
            });
        }
    };
    Ok(graph)
}

fn equalizer(p: &EqParams) -> String {
    let bands: Vec<String> = EQ_BANDS_HZ
        .iter()
        .zip([p.bass_db, p.mid_db, p.treble_db])
        .filter(|(_, gain)| *gain != 0.0)
        .map(|(freq, gain)| band(*freq, gain))
        .collect();

    // flat EQ still has to produce the next artifact
    if bands.is_empty() {
        "anull".to_string()
    } else {
        bands.join(",")
    }
}

fn band(freq_hz: f64, gain_db: f64) -> String {
    format!("equalizer=f={}:t=q:w=1:g={}", num(freq_hz), num(gain_db))
}

fn compressor(p: &CompressParams) -> String {
    format!(
        "acompressor=threshold={}dB:ratio={}:attack={}:release={}",
        num(p.threshold_db),
        num(p.ratio),
        num(p.attack_ms),
        num(p.release_ms)
    )
}

/// Echo approximation of reverb: room size sets the delay, damping the output
/// gain, and wetness the echo decay.
fn echo(p: &ReverbParams) -> String {
    let delay_ms = (p.room_size * 100.0).round().max(1.0);
    let decay = (1.0 - p.damping).clamp(0.05, 1.0);
    let reflections = (decay * p.wet).clamp(0.01, 1.0);
    format!(
        "aecho=0.8:{}:{}:{}",
        num(decay),
        num(delay_ms),
        num(reflections)
    )
}

fn stage_filter(stage: &MasterStage) -> String {
    match stage {
        MasterStage::HighPass { cutoff_hz } => format!("highpass=f={}", num(*cutoff_hz)),
        MasterStage::Compress(p) => compressor(p),
        MasterStage::TwoBandEq {
            low_hz,
            low_gain_db,
            high_hz,
            high_gain_db,
        } => format!(
            "{},{}",
            band(*low_hz, *low_gain_db),
            band(*high_hz, *high_gain_db)
        ),
        MasterStage::Limit { ceiling_db } => {
            format!("alimiter=limit={}dB:level=false", num(*ceiling_db))
        }
        MasterStage::Normalize {
            target_lufs,
            true_peak_db,
            loudness_range,
        } => format!(
            "loudnorm=I={}:TP={}:LRA={}",
            num(*target_lufs),
            num(*true_peak_db),
            num(*loudness_range)
        ),
    }
}

/// Compact decimal rendering for filter arguments (`2`, `-1.5`, `0.15`).
fn num(value: f64) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
