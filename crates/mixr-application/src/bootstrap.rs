//! Wires the concrete adapters into a ready-to-use command service.

use crate::command::MixCommandService;
use crate::orchestrator::MixOrchestrator;
use mixr_core::config::MixConfig;
use mixr_core::error::Result;
use mixr_core::interpreter::CommandInterpreter;
use mixr_core::operation::MasteringChain;
use mixr_core::session::SessionLedger;
use mixr_infrastructure::{
    ConfigService, FfmpegEngine, FfprobeMetadataSource, MixrPaths, TomlSessionStore,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a front end needs after startup.
pub struct MixrApp {
    pub paths: MixrPaths,
    pub config: MixConfig,
    pub engine: Arc<FfmpegEngine>,
    pub service: MixCommandService,
}

impl MixrApp {
    /// Resolves paths (explicit home, `MIXR_HOME`, platform dirs), loads the
    /// configuration, and builds the ffmpeg-backed orchestrator.
    pub fn bootstrap(home: Option<PathBuf>) -> Result<Self> {
        let paths = MixrPaths::resolve(home)?;
        paths.ensure_dirs()?;

        let config = ConfigService::new(paths.config_file()).get_config()?;
        let store = Arc::new(TomlSessionStore::new(paths.sessions_dir())?);
        let ledger = SessionLedger::new(
            store,
            paths.artifacts_dir(),
            config.engine.working_extension.clone(),
        );

        let engine = Arc::new(FfmpegEngine::new(&config));
        let metadata = Arc::new(FfprobeMetadataSource::new(&config.engine));

        let orchestrator = MixOrchestrator::new(
            CommandInterpreter::default(),
            ledger,
            engine.clone(),
            paths.exports_dir(),
            config.export.extension.clone(),
        )
        .with_metadata_source(metadata)
        .with_mastering_chain(MasteringChain::new(&config.mastering));

        tracing::info!(
            data_dir = %paths.data_dir().display(),
            config = %paths.config_file().display(),
            "[Bootstrap] mixr ready"
        );

        Ok(Self {
            paths,
            config,
            engine,
            service: MixCommandService::new(orchestrator),
        })
    }
}
