//! External audio engine adapters (ffmpeg, ffprobe).

pub mod ffmpeg;
pub mod ffprobe;
mod process;

pub use ffmpeg::{FfmpegEngine, ToolStatus, filter_graph};
pub use ffprobe::{FfprobeMetadataSource, parse_probe_json};
