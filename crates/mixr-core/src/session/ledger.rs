//! Session ledger.
//!
//! Owns the versioning rules of a session: version counter, version→artifact
//! index, append-only history, and artifact slot naming. Every mutating call
//! persists the updated record before the caller's copy is changed, so an
//! error leaves both the stored and in-memory session at the prior state.

use super::model::{HistoryRecord, RecordOutcome, Session};
use super::repository::SessionStore;
use crate::error::{MixError, Result};
use crate::operation::Operation;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const MAX_SESSION_NAME_LEN: usize = 128;

/// Result of one engine call, as reported to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { artifact: PathBuf },
    Failure { reason: String },
}

pub struct SessionLedger {
    store: Arc<dyn SessionStore>,
    artifacts_root: PathBuf,
    extension: String,
}

impl SessionLedger {
    /// # Arguments
    ///
    /// * `store` - Durable session persistence
    /// * `artifacts_root` - Directory under which each session gets its own artifact folder
    /// * `extension` - File extension of intermediate artifacts (e.g. `wav`)
    pub fn new(
        store: Arc<dyn SessionStore>,
        artifacts_root: impl Into<PathBuf>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            store,
            artifacts_root: artifacts_root.into(),
            extension: extension.into(),
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Directory holding the artifacts of the named session.
    pub fn session_dir(&self, name: &str) -> PathBuf {
        self.artifacts_root.join(name)
    }

    /// Loads the named session, or creates and persists a fresh one.
    pub async fn create_or_resume(&self, name: &str) -> Result<Session> {
        validate_session_name(name)?;

        if let Some(session) = self.store.load(name).await? {
            tracing::info!(
                session = name,
                version = session.version,
                "[Ledger] Resumed session"
            );
            return Ok(session);
        }

        let session = Session::new(name);
        self.store.save(&session).await?;
        tracing::info!(session = name, "[Ledger] Created session");
        Ok(session)
    }

    /// Cuts the session over to a new source artifact at version 0.
    ///
    /// History is kept; the version index restarts with the source as version 0.
    /// The source is stored as an absolute, canonical path so the session can
    /// be resumed from any working directory.
    pub async fn set_source(&self, session: &mut Session, artifact: &Path) -> Result<()> {
        if !artifact.is_file() {
            return Err(MixError::invalid_source(artifact.display().to_string()));
        }
        let artifact = std::fs::canonicalize(artifact)
            .map_err(|_| MixError::invalid_source(artifact.display().to_string()))?;

        let mut updated = session.clone();
        updated.current_artifact = Some(artifact.clone());
        updated.version = 0;
        updated.epoch += 1;
        updated.artifacts.clear();
        updated.artifacts.insert(0, artifact.clone());
        updated.touch();

        self.commit(session, updated).await?;
        tracing::info!(
            session = %session.name,
            source = %artifact.display(),
            "[Ledger] Source set"
        );
        Ok(())
    }

    /// Appends a history record for `operation` and returns the resulting version.
    ///
    /// On success the version is bumped, the artifact indexed and made current,
    /// and any index entries above the new version are dropped. On failure
    /// only the record is appended.
    pub async fn record(
        &self,
        session: &mut Session,
        operation: &Operation,
        outcome: Outcome,
    ) -> Result<u32> {
        let mut updated = session.clone();

        let record = match outcome {
            Outcome::Success { artifact } => {
                updated.version += 1;
                let version = updated.version;
                updated.artifacts.retain(|v, _| *v < version);
                updated.artifacts.insert(version, artifact.clone());
                updated.current_artifact = Some(artifact.clone());

                let mut record =
                    HistoryRecord::new(operation, RecordOutcome::Success, version, updated.epoch);
                record.artifact = Some(artifact);
                record
            }
            Outcome::Failure { reason } => {
                let mut record = HistoryRecord::new(
                    operation,
                    RecordOutcome::Failure,
                    updated.version,
                    updated.epoch,
                );
                record.error = Some(reason);
                record
            }
        };

        tracing::debug!(
            session = %updated.name,
            kind = %record.kind,
            outcome = record.outcome.as_str(),
            version = record.version,
            "[Ledger] Recording action"
        );
        updated.history.push(record);
        updated.touch();

        self.commit(session, updated).await?;
        Ok(session.version)
    }

    /// Path for the artifact the next successful operation will produce.
    ///
    /// The history length prefix only ever grows, so a slot is never reused
    /// across undo, redo, or source resets.
    pub fn next_artifact_slot(&self, session: &Session, suffix: &str) -> PathBuf {
        let file_name = format!(
            "h{:04}_v{:03}_{}.{}",
            session.history.len(),
            session.version + 1,
            suffix,
            self.extension
        );
        self.session_dir(&session.name).join(file_name)
    }

    /// Artifact indexed for `version`, if it is still present on disk.
    pub fn locate_version(&self, session: &Session, version: u32) -> Option<PathBuf> {
        session
            .artifacts
            .get(&version)
            .filter(|path| path.exists())
            .cloned()
    }

    /// Moves the session pointer to an indexed version without recording an action.
    pub async fn move_to(&self, session: &mut Session, version: u32) -> Result<PathBuf> {
        let artifact = self
            .locate_version(session, version)
            .ok_or(MixError::VersionArtifactMissing { version })?;

        let mut updated = session.clone();
        updated.version = version;
        updated.current_artifact = Some(artifact.clone());
        updated.touch();

        self.commit(session, updated).await?;
        tracing::info!(session = %session.name, version, "[Ledger] Moved to version");
        Ok(artifact)
    }

    async fn commit(&self, session: &mut Session, updated: Session) -> Result<()> {
        self.store.save(&updated).await?;
        *session = updated;
        Ok(())
    }
}

/// Session names double as file names, so they must be a single plain path segment.
pub fn validate_session_name(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("name is empty")
    } else if name.len() > MAX_SESSION_NAME_LEN {
        Some("name is too long")
    } else if name.starts_with('.') {
        Some("name must not start with '.'")
    } else if name.contains(['/', '\\', ':']) || name.chars().any(char::is_control) {
        Some("name contains a path separator or control character")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(MixError::invalid_session_name(name, reason)),
        None => Ok(()),
    }
}
