//! Transport-neutral command surface.
//!
//! Every command returns a [`CommandResult`] instead of an error so the same
//! service can sit behind the CLI, the REPL, or any RPC layer.

use crate::orchestrator::{MixOrchestrator, guidance_summary};
use crate::summary::Summary;
use mixr_core::error::{MixError, Result};
use mixr_core::preset::{find_preset, get_default_presets};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    /// Session version after the command, when a session is active
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResult {
    pub fn ok(message: impl Into<String>, version: Option<u32>) -> Self {
        Self {
            success: true,
            message: message.into(),
            version,
            data: None,
        }
    }

    pub fn failed(error: &MixError, version: Option<u32>) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            version,
            data: serde_json::to_value(error).ok(),
        }
    }

    fn from_summary(summary: Summary) -> Self {
        Self {
            success: !summary.is_failure(),
            message: summary.to_string().trim_end().to_string(),
            version: summary.version,
            data: serde_json::to_value(&summary).ok(),
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Serializes access to one [`MixOrchestrator`].
pub struct MixCommandService {
    orchestrator: Mutex<MixOrchestrator>,
}

impl MixCommandService {
    pub fn new(orchestrator: MixOrchestrator) -> Self {
        Self {
            orchestrator: Mutex::new(orchestrator),
        }
    }

    fn finish(result: Result<Summary>, version: Option<u32>) -> CommandResult {
        match result {
            Ok(summary) => CommandResult::from_summary(summary),
            Err(e) => {
                tracing::debug!(error = %e, "[Command] Command failed");
                CommandResult::failed(&e, version)
            }
        }
    }

    fn version_of(orchestrator: &MixOrchestrator) -> Option<u32> {
        orchestrator.session().map(|s| s.version)
    }

    pub async fn create_session(&self, name: &str) -> CommandResult {
        let mut orchestrator = self.orchestrator.lock().await;
        let result = orchestrator.start_session(name).await;
        Self::finish(result, Self::version_of(&orchestrator))
    }

    pub async fn sessions(&self) -> CommandResult {
        let orchestrator = self.orchestrator.lock().await;
        let version = Self::version_of(&orchestrator);
        match orchestrator.list_sessions().await {
            Ok(names) => {
                let message = if names.is_empty() {
                    "No sessions yet".to_string()
                } else {
                    names.join("\n")
                };
                CommandResult::ok(message, version).with_data(serde_json::json!(names))
            }
            Err(e) => CommandResult::failed(&e, version),
        }
    }

    pub async fn set_source(&self, path: &str) -> CommandResult {
        let mut orchestrator = self.orchestrator.lock().await;
        let result = orchestrator.set_source(Path::new(path.trim())).await;
        Self::finish(result, Self::version_of(&orchestrator))
    }

    pub async fn mix(&self, text: &str) -> CommandResult {
        let mut orchestrator = self.orchestrator.lock().await;
        let result = orchestrator.process_prompt(text).await;
        Self::finish(result, Self::version_of(&orchestrator))
    }

    /// Runs a preset's instruction through [`Self::mix`].
    pub async fn apply_preset(&self, key: &str) -> CommandResult {
        match find_preset(key) {
            Some(preset) => {
                tracing::info!(preset = %preset.id, "[Command] Applying preset");
                self.mix(&preset.prompt).await
            }
            None => {
                let orchestrator = self.orchestrator.lock().await;
                CommandResult {
                    success: false,
                    message: format!("Unknown preset '{}'. Try 'presets'", key.trim()),
                    version: Self::version_of(&orchestrator),
                    data: None,
                }
            }
        }
    }

    pub async fn undo(&self) -> CommandResult {
        let mut orchestrator = self.orchestrator.lock().await;
        let result = orchestrator.undo().await;
        Self::finish(result, Self::version_of(&orchestrator))
    }

    pub async fn redo(&self) -> CommandResult {
        let mut orchestrator = self.orchestrator.lock().await;
        let result = orchestrator.redo().await;
        Self::finish(result, Self::version_of(&orchestrator))
    }

    pub async fn export(&self, name: &str) -> CommandResult {
        let orchestrator = self.orchestrator.lock().await;
        let result = orchestrator.export(name).await;
        Self::finish(result, Self::version_of(&orchestrator))
    }

    pub async fn history(&self) -> CommandResult {
        let orchestrator = self.orchestrator.lock().await;
        Self::finish(orchestrator.history(), Self::version_of(&orchestrator))
    }

    pub async fn status(&self) -> CommandResult {
        let orchestrator = self.orchestrator.lock().await;
        Self::finish(orchestrator.status(), Self::version_of(&orchestrator))
    }

    /// Dry run. An ambiguous instruction fails and carries the example phrasings.
    pub async fn explain(&self, text: &str) -> CommandResult {
        let orchestrator = self.orchestrator.lock().await;
        let version = Self::version_of(&orchestrator);
        match orchestrator.explain(text) {
            Err(e) if e.is_ambiguous() => {
                let mut result = CommandResult::failed(&e, version);
                result.message = format!("{}\n{}", e, guidance_summary().to_string().trim_end());
                result
            }
            other => Self::finish(other, version),
        }
    }

    pub async fn presets(&self) -> CommandResult {
        let presets = get_default_presets();
        let message = presets
            .iter()
            .map(|p| format!("{:<16} {:<16} \"{}\"", p.id, p.name, p.prompt))
            .collect::<Vec<_>>()
            .join("\n");
        let version = Self::version_of(&*self.orchestrator.lock().await);
        CommandResult::ok(message, version)
            .with_data(serde_json::to_value(&presets).unwrap_or_default())
    }
}
