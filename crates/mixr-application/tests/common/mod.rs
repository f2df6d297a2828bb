//! Shared fixtures for orchestrator integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mixr_application::{MixCommandService, MixOrchestrator};
use mixr_core::engine::{AudioEngine, EngineError};
use mixr_core::interpreter::CommandInterpreter;
use mixr_core::operation::{Operation, OperationKind};
use mixr_core::session::SessionLedger;
use mixr_infrastructure::TomlSessionStore;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// One recorded `apply` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyCall {
    pub input: PathBuf,
    pub kind: OperationKind,
    pub output: PathBuf,
}

/// In-memory engine that writes a small marker file per call and fails the
/// kinds it was told to fail.
#[derive(Default)]
pub struct ScriptedEngine {
    failing: Mutex<HashSet<OperationKind>>,
    fail_export: Mutex<bool>,
    calls: Mutex<Vec<ApplyCall>>,
    exports: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl ScriptedEngine {
    pub fn fail_kind(&self, kind: OperationKind) {
        self.failing.lock().unwrap().insert(kind);
    }

    pub fn fail_exports(&self) {
        *self.fail_export.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<ApplyCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn exports(&self) -> Vec<(PathBuf, PathBuf)> {
        self.exports.lock().unwrap().clone()
    }
}

fn write_marker(path: &Path, content: String) -> Result<(), EngineError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| EngineError::Spawn {
            message: e.to_string(),
        })?;
    }
    std::fs::write(path, content).map_err(|e| EngineError::Spawn {
        message: e.to_string(),
    })
}

#[async_trait]
impl AudioEngine for ScriptedEngine {
    async fn apply(
        &self,
        input: &Path,
        operation: &Operation,
        output: &Path,
    ) -> Result<PathBuf, EngineError> {
        let kind = operation.kind();
        self.calls.lock().unwrap().push(ApplyCall {
            input: input.to_path_buf(),
            kind,
            output: output.to_path_buf(),
        });

        if self.failing.lock().unwrap().contains(&kind) {
            return Err(EngineError::NonZeroExit {
                status: 1,
                stderr: "scripted failure".to_string(),
            });
        }

        write_marker(output, format!("{} <- {}", kind, input.display()))?;
        Ok(output.to_path_buf())
    }

    async fn export(&self, input: &Path, destination: &Path) -> Result<(), EngineError> {
        if *self.fail_export.lock().unwrap() {
            return Err(EngineError::ToolMissing {
                tool: "ffmpeg".to_string(),
            });
        }
        write_marker(destination, format!("export <- {}", input.display()))?;
        self.exports
            .lock()
            .unwrap()
            .push((input.to_path_buf(), destination.to_path_buf()));
        Ok(())
    }
}

pub struct Harness {
    pub dir: TempDir,
    pub engine: Arc<ScriptedEngine>,
    pub source: PathBuf,
}

impl Harness {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("song.wav");
        std::fs::write(&source, b"RIFF source").unwrap();
        let source = std::fs::canonicalize(&source).unwrap();
        Self {
            dir,
            engine: Arc::new(ScriptedEngine::default()),
            source,
        }
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.dir.path().join("exports")
    }

    /// A fresh orchestrator over the same store, as a new process would see it.
    pub fn orchestrator(&self) -> MixOrchestrator {
        let store = Arc::new(TomlSessionStore::new(self.dir.path().join("sessions")).unwrap());
        let ledger = SessionLedger::new(store, self.dir.path().join("artifacts"), "wav");
        MixOrchestrator::new(
            CommandInterpreter::default(),
            ledger,
            self.engine.clone(),
            self.exports_dir(),
            "mp3",
        )
    }

    pub fn service(&self) -> MixCommandService {
        MixCommandService::new(self.orchestrator())
    }

    /// Orchestrator with an active session `name` whose source is set.
    pub async fn ready(&self, name: &str) -> MixOrchestrator {
        let mut orchestrator = self.orchestrator();
        orchestrator.start_session(name).await.unwrap();
        orchestrator.set_source(&self.source).await.unwrap();
        orchestrator
    }
}
