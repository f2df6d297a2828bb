//! Session domain model.
//!
//! This module contains the durable, named, versioned record of one mixing
//! conversation.

use crate::operation::{Operation, OperationKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Outcome of one recorded action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordOutcome {
    Success,
    Failure,
}

impl RecordOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// One immutable entry in a session's append-only history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub kind: OperationKind,
    /// Resolved numeric parameters
    pub params: BTreeMap<String, f64>,
    /// Rendered description of the operation
    pub description: String,
    pub outcome: RecordOutcome,
    /// Session version right after this action
    pub version: u32,
    /// Source epoch this action belongs to (bumped by every `set_source`)
    pub epoch: u32,
    /// Artifact produced, for successful actions
    pub artifact: Option<PathBuf>,
    /// Engine failure reason, for failed actions
    pub error: Option<String>,
    /// When the action was recorded (RFC 3339)
    pub timestamp: String,
}

impl HistoryRecord {
    pub(crate) fn new(
        operation: &Operation,
        outcome: RecordOutcome,
        version: u32,
        epoch: u32,
    ) -> Self {
        Self {
            kind: operation.kind(),
            params: operation.params(),
            description: operation.describe(),
            outcome,
            version,
            epoch,
            artifact: None,
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == RecordOutcome::Success
    }
}

/// A named mixing session.
///
/// `artifacts` is the explicit version→artifact index for the current source
/// epoch: version 0 is the source itself, and each successful operation
/// indexes the artifact it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session name, also the storage key
    pub name: String,
    /// Latest artifact, or `None` until a source is set
    pub current_artifact: Option<PathBuf>,
    pub version: u32,
    /// Append-only action history across all epochs
    pub history: Vec<HistoryRecord>,
    pub artifacts: BTreeMap<u32, PathBuf>,
    /// Number of `set_source` calls so far
    pub epoch: u32,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
}

impl Session {
    pub fn new(name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            name: name.into(),
            current_artifact: None,
            version: 0,
            history: Vec::new(),
            artifacts: BTreeMap::new(),
            epoch: 0,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn has_source(&self) -> bool {
        self.current_artifact.is_some()
    }

    /// Count of successful records since the last `set_source`.
    pub fn successes_in_epoch(&self) -> usize {
        self.history
            .iter()
            .filter(|record| record.epoch == self.epoch && record.is_success())
            .count()
    }

    /// Highest indexed version (the end of the current redo branch).
    pub fn latest_indexed_version(&self) -> Option<u32> {
        self.artifacts.keys().next_back().copied()
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_uninitialized() {
        let session = Session::new("demo");
        assert_eq!(session.name, "demo");
        assert_eq!(session.version, 0);
        assert!(!session.has_source());
        assert!(session.history.is_empty());
        assert_eq!(session.latest_indexed_version(), None);
    }

    #[test]
    fn test_successes_only_count_current_epoch() {
        let mut session = Session::new("demo");
        let op = Operation::Master;
        session
            .history
            .push(HistoryRecord::new(&op, RecordOutcome::Success, 1, 0));
        session.epoch = 1;
        session
            .history
            .push(HistoryRecord::new(&op, RecordOutcome::Success, 1, 1));
        session
            .history
            .push(HistoryRecord::new(&op, RecordOutcome::Failure, 1, 1));
        assert_eq!(session.successes_in_epoch(), 1);
    }

    #[test]
    fn test_outcome_serializes_lowercase() {
        let json = serde_json::to_string(&RecordOutcome::Failure).unwrap();
        assert_eq!(json, "\"failure\"");
    }
}
