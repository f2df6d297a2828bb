//! Infrastructure layer for mixr.
//!
//! Concrete adapters for the traits in `mixr-core`: the TOML session store,
//! the ffmpeg audio engine, the ffprobe metadata source, path resolution and
//! configuration loading.

pub mod config_service;
pub mod dto;
pub mod engine;
pub mod paths;
pub mod storage;
pub mod toml_session_store;

pub use config_service::ConfigService;
pub use engine::{FfmpegEngine, FfprobeMetadataSource};
pub use paths::MixrPaths;
pub use toml_session_store::TomlSessionStore;
