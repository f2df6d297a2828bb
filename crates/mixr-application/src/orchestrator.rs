//! Mix orchestrator.
//!
//! Composes the command interpreter, the session ledger, and the external
//! audio engine into the user-facing mixing workflow. One orchestrator drives
//! at most one active session at a time.

use crate::summary::{StepReport, StepResult, Summary, SummaryStatus};
use mixr_core::engine::{AudioEngine, MetadataSource};
use mixr_core::error::{MixError, Result};
use mixr_core::interpreter::{CommandInterpreter, ParseResult};
use mixr_core::operation::{MasteringChain, Operation, OperationKind};
use mixr_core::session::{Outcome, Session, SessionLedger};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Example phrasings shown when an instruction is not understood.
const EXAMPLE_PHRASINGS: &[(&str, &[&str])] = &[
    (
        "EQ / Tone",
        &[
            "make it brighter",
            "add more bass",
            "cut the mids, it's muddy",
            "make it warmer",
        ],
    ),
    (
        "Compression / Dynamics",
        &["add some punch", "make it glue together", "heavy compression"],
    ),
    (
        "Reverb / Space",
        &["add hall reverb", "make it sound bigger", "add subtle room ambience"],
    ),
    ("Volume / Levels", &["make it louder", "turn it down 3dB"]),
    ("Stereo / Width", &["make it wider", "narrow the stereo image"]),
    ("Mastering", &["master for streaming", "finalize the mix"]),
];

pub struct MixOrchestrator {
    interpreter: CommandInterpreter,
    ledger: SessionLedger,
    engine: Arc<dyn AudioEngine>,
    metadata: Option<Arc<dyn MetadataSource>>,
    mastering: MasteringChain,
    exports_dir: PathBuf,
    export_extension: String,
    session: Option<Session>,
}

impl MixOrchestrator {
    /// # Arguments
    ///
    /// * `interpreter` - Shared keyword interpreter
    /// * `ledger` - Versioning rules over the session store
    /// * `engine` - Executes operations and exports
    /// * `exports_dir` - Where relative export names are placed
    /// * `export_extension` - Appended to export names without one
    pub fn new(
        interpreter: CommandInterpreter,
        ledger: SessionLedger,
        engine: Arc<dyn AudioEngine>,
        exports_dir: impl Into<PathBuf>,
        export_extension: impl Into<String>,
    ) -> Self {
        Self {
            interpreter,
            ledger,
            engine,
            metadata: None,
            mastering: MasteringChain::default(),
            exports_dir: exports_dir.into(),
            export_extension: export_extension.into(),
            session: None,
        }
    }

    pub fn with_metadata_source(mut self, metadata: Arc<dyn MetadataSource>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Stages listed when a `Master` operation is reported.
    pub fn with_mastering_chain(mut self, mastering: MasteringChain) -> Self {
        self.mastering = mastering;
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    fn active(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(MixError::NoActiveSession)
    }

    /// Names of all stored sessions.
    pub async fn list_sessions(&self) -> Result<Vec<String>> {
        self.ledger.store().list_names().await
    }

    /// Creates or resumes the named session and makes it active.
    pub async fn start_session(&mut self, name: &str) -> Result<Summary> {
        let session = self.ledger.create_or_resume(name).await?;

        let headline = if session.has_source() || !session.history.is_empty() {
            format!("Resumed session '{}' at v{:03}", session.name, session.version)
        } else {
            format!("Started new session '{}'", session.name)
        };

        let mut summary = Summary::info(headline)
            .line(format!(
                "Artifacts: {}",
                self.ledger.session_dir(&session.name).display()
            ))
            .at(session.version, session.current_artifact.clone());
        if !session.has_source() {
            summary = summary.line("No source yet. Set one before mixing");
        }

        self.session = Some(session);
        Ok(summary)
    }

    /// Points the active session at a new source artifact (version 0).
    pub async fn set_source(&mut self, path: &Path) -> Result<Summary> {
        let session = self.session.as_mut().ok_or(MixError::NoActiveSession)?;
        self.ledger.set_source(session, path).await?;

        let mut summary = Summary::new(
            SummaryStatus::Applied,
            format!("Source set: {}", path.display()),
        )
        .at(session.version, session.current_artifact.clone());

        if let Some(metadata) = &self.metadata {
            match metadata.probe(path).await {
                Ok(info) => summary = summary.lines(info.describe()),
                Err(e) => tracing::warn!(
                    source = %path.display(),
                    error = %e,
                    "[Orchestrator] Could not read audio facts"
                ),
            }
        }

        Ok(summary)
    }

    /// Interprets `text` and applies every local operation in order.
    ///
    /// Each operation reads the artifact produced by the last successful one.
    /// A failed engine call is recorded and the batch moves on.
    pub async fn process_prompt(&mut self, text: &str) -> Result<Summary> {
        let session = self.session.as_mut().ok_or(MixError::NoActiveSession)?;
        if !session.has_source() {
            return Err(MixError::NoSourceSet);
        }

        let parsed = self.interpreter.parse(text);
        if !parsed.is_actionable() {
            tracing::debug!(text, "[Orchestrator] Nothing actionable in instruction");
            return Ok(
                guidance_summary().at(session.version, session.current_artifact.clone())
            );
        }

        let start_version = session.version;
        let mut steps = Vec::new();
        let mut lines = Vec::new();

        for (position, operation) in parsed.local_operations().enumerate() {
            let input = session
                .current_artifact
                .clone()
                .ok_or(MixError::NoSourceSet)?;
            let slot = self
                .ledger
                .next_artifact_slot(session, operation.kind().slot_suffix());

            let result = match self.engine.apply(&input, operation, &slot).await {
                Ok(artifact) => {
                    let version = self
                        .ledger
                        .record(session, operation, Outcome::Success { artifact })
                        .await?;
                    lines.push(format!("• {} (v{:03})", operation.describe(), version));
                    if matches!(operation, Operation::Master) {
                        lines.extend(
                            self.mastering
                                .stages()
                                .iter()
                                .map(|stage| format!("    - {}", stage.describe())),
                        );
                    }
                    StepResult::Applied { version }
                }
                Err(err) => {
                    let failure = MixError::engine(operation.kind(), err);
                    tracing::warn!(
                        session = %session.name,
                        version = session.version,
                        kind = %operation.kind(),
                        error = %failure,
                        "[Orchestrator] Operation failed, continuing batch"
                    );
                    let reason = failure.to_string();
                    self.ledger
                        .record(
                            session,
                            operation,
                            Outcome::Failure {
                                reason: reason.clone(),
                            },
                        )
                        .await?;
                    lines.push(format!("⚠ {} (v{:03})", reason, session.version));
                    StepResult::Failed {
                        reason,
                        version: session.version,
                    }
                }
            };

            steps.push(StepReport {
                index: position + 1,
                kind: operation.kind(),
                description: operation.describe(),
                result,
            });
        }

        let status = Summary::status_for(&steps);
        let attempted = steps.len();
        let applied = steps.iter().filter(|s| s.is_applied()).count();

        if let Some(prompt) = parsed.style_prompt() {
            lines.push("Style change requested: this requires external regeneration".to_string());
            lines.push(format!("Prompt: {}", prompt));
            steps.push(StepReport {
                index: steps.len() + 1,
                kind: OperationKind::StyleChange,
                description: format!("Style change: {}", prompt),
                result: StepResult::Deferred,
            });
        }

        tracing::info!(
            session = %session.name,
            from = start_version,
            to = session.version,
            applied,
            attempted,
            "[Orchestrator] Instruction processed"
        );

        let headline = if attempted == 0 {
            "No local operations to apply".to_string()
        } else {
            format!("Applied {} of {} operation(s)", applied, attempted)
        };

        let mut summary = Summary::new(status, headline)
            .lines(lines)
            .at(session.version, session.current_artifact.clone());
        summary.steps = steps;
        Ok(summary)
    }

    /// Moves back one version. Version 0 (the source) cannot be undone.
    pub async fn undo(&mut self) -> Result<Summary> {
        let session = self.session.as_mut().ok_or(MixError::NoActiveSession)?;
        if session.version < 1 {
            return Err(MixError::NothingToUndo {
                version: session.version,
            });
        }

        let target = session.version - 1;
        self.ledger.move_to(session, target).await?;

        Ok(
            Summary::new(SummaryStatus::Applied, format!("Undone to v{:03}", target))
                .at(session.version, session.current_artifact.clone()),
        )
    }

    /// Moves forward one version along the current branch.
    pub async fn redo(&mut self) -> Result<Summary> {
        let session = self.session.as_mut().ok_or(MixError::NoActiveSession)?;
        let latest = session.latest_indexed_version().unwrap_or(0);
        if latest <= session.version {
            return Err(MixError::NothingToRedo {
                version: session.version,
            });
        }

        let target = session.version + 1;
        self.ledger.move_to(session, target).await?;

        Ok(
            Summary::new(SummaryStatus::Applied, format!("Redone to v{:03}", target))
                .at(session.version, session.current_artifact.clone()),
        )
    }

    /// Encodes the current artifact to `destination`.
    ///
    /// An empty name exports as `<session>_v<version>`; any other name must be
    /// a bare file name and lands in the exports directory. Version and
    /// history are untouched.
    pub async fn export(&self, destination: &str) -> Result<Summary> {
        let session = self.active()?;
        let artifact = session
            .current_artifact
            .clone()
            .ok_or(MixError::NoArtifactToExport)?;

        let target = self.export_destination(session, destination)?;
        self.engine
            .export(&artifact, &target)
            .await
            .map_err(MixError::export_failed)?;

        tracing::info!(
            session = %session.name,
            version = session.version,
            destination = %target.display(),
            "[Orchestrator] Exported"
        );

        Ok(
            Summary::new(SummaryStatus::Applied, format!("Exported to {}", target.display()))
                .line(format!("From v{:03}: {}", session.version, artifact.display()))
                .at(session.version, session.current_artifact.clone()),
        )
    }

    fn export_destination(&self, session: &Session, destination: &str) -> Result<PathBuf> {
        let name = destination.trim();
        let file_name = if name.is_empty() {
            format!("{}_v{:03}", session.name, session.version)
        } else {
            let mut components = Path::new(name).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(_)), None) => name.to_string(),
                _ => {
                    return Err(MixError::invalid_export_name(
                        name,
                        "must be a bare file name",
                    ));
                }
            }
        };

        let mut target = self.exports_dir.join(file_name);
        if target.extension().is_none() {
            target.set_extension(&self.export_extension);
        }
        Ok(target)
    }

    /// Full action history of the active session.
    pub fn history(&self) -> Result<Summary> {
        let session = self.active()?;

        let mut summary = Summary::info(format!("Session History: {}", session.name));
        if session.history.is_empty() {
            summary = summary.line("No actions recorded yet");
        }
        for record in &session.history {
            let marker = if record.is_success() { "✓" } else { "✗" };
            summary = summary.line(format!(
                "{} v{:03} {} [{}]",
                marker, record.version, record.description, record.timestamp
            ));
            if let Some(error) = &record.error {
                summary = summary.line(format!("    {}", error));
            }
        }

        Ok(summary.at(session.version, session.current_artifact.clone()))
    }

    /// Snapshot of the active session.
    pub fn status(&self) -> Result<Summary> {
        let session = self.active()?;

        let source = session
            .artifacts
            .get(&0)
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "(none)".to_string());
        let latest = session.latest_indexed_version().unwrap_or(0);

        Ok(Summary::info(format!("Session: {}", session.name))
            .line(format!("Source: {}", source))
            .line(format!(
                "Version: v{:03} (latest v{:03})",
                session.version, latest
            ))
            .line(format!("Actions recorded: {}", session.history.len()))
            .line(format!("Updated: {}", session.updated_at))
            .at(session.version, session.current_artifact.clone()))
    }

    /// Dry run: what `text` would do, without touching any session.
    ///
    /// Fails with `AmbiguousInstruction` when nothing would happen.
    pub fn explain(&self, text: &str) -> Result<Summary> {
        let parsed = self.interpreter.parse(text);
        parsed.require_actionable()?;
        Ok(self.plan(&parsed))
    }

    fn plan(&self, parsed: &ParseResult) -> Summary {
        let mut summary = Summary::info(format!("Plan for \"{}\"", parsed.original_text));

        for (position, operation) in parsed.operations.iter().enumerate() {
            let result = if operation.is_local() {
                StepResult::Planned
            } else {
                StepResult::Deferred
            };
            summary.lines.push(format!("{}. {}", position + 1, operation.describe()));
            if matches!(operation, Operation::Master) {
                summary.lines.extend(
                    self.mastering
                        .stages()
                        .iter()
                        .map(|stage| format!("    - {}", stage.describe())),
                );
            }
            summary.steps.push(StepReport {
                index: position + 1,
                kind: operation.kind(),
                description: operation.describe(),
                result,
            });
        }

        summary
    }
}

/// Example phrasings per family, returned for instructions with no actionable meaning.
pub fn guidance_summary() -> Summary {
    let mut summary = Summary::new(
        SummaryStatus::Guidance,
        "I'm not sure what mixing operation you want. Here are some examples:",
    );
    for (family, phrasings) in EXAMPLE_PHRASINGS {
        summary.lines.push(format!("{}:", family));
        summary
            .lines
            .extend(phrasings.iter().map(|p| format!("    \"{}\"", p)));
    }
    summary
}
