//! Error types for the mixr application.

use crate::engine::EngineError;
use crate::operation::OperationKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire mixr application.
///
/// Every variant is a reported condition: none of them leave a session
/// unusable, and callers always get one of these back instead of a panic.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum MixError {
    /// The source artifact is absent or not a regular file
    #[error("Invalid source: '{path}' does not exist or is not a file")]
    InvalidSource { path: String },

    /// No session has been started or resumed yet
    #[error("No session active. Start or resume a session first")]
    NoActiveSession,

    /// The session exists but has no source artifact
    #[error("No source file set. Set a source before mixing")]
    NoSourceSet,

    /// The instruction produced no actionable interpretation
    #[error("Could not interpret instruction: '{text}'")]
    AmbiguousInstruction { text: String },

    /// A single external engine call failed (an operation kind or "export")
    #[error("{operation} failed: {source}")]
    EngineFailure {
        operation: String,
        #[source]
        source: EngineError,
    },

    /// The session is already at its original source (version 0)
    #[error("Nothing to undo (already at version {version})")]
    NothingToUndo { version: u32 },

    /// No later version is indexed for the current branch
    #[error("Nothing to redo (version {version} is the latest)")]
    NothingToRedo { version: u32 },

    /// The artifact for the requested version vanished from storage
    #[error("Artifact for version {version} is missing from storage")]
    VersionArtifactMissing { version: u32 },

    /// Export requested while the session has no current artifact
    #[error("No artifact to export")]
    NoArtifactToExport,

    /// Export destinations are bare file names inside the exports directory
    #[error("Invalid export name '{name}': {reason}")]
    InvalidExportName { name: String, reason: String },

    /// Session names are used as storage keys and directory names
    #[error("Invalid session name '{name}': {reason}")]
    InvalidSessionName { name: String, reason: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Session store error (locking, atomic write)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MixError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidSource error
    pub fn invalid_source(path: impl Into<String>) -> Self {
        Self::InvalidSource { path: path.into() }
    }

    /// Creates an AmbiguousInstruction error
    pub fn ambiguous(text: impl Into<String>) -> Self {
        Self::AmbiguousInstruction { text: text.into() }
    }

    /// Creates an EngineFailure error for the given operation kind
    pub fn engine(operation: OperationKind, source: EngineError) -> Self {
        Self::EngineFailure {
            operation: operation.to_string(),
            source,
        }
    }

    /// Creates an EngineFailure error for the terminal export encode
    pub fn export_failed(source: EngineError) -> Self {
        Self::EngineFailure {
            operation: "export".to_string(),
            source,
        }
    }

    /// Creates an InvalidSessionName error
    pub fn invalid_session_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSessionName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an InvalidExportName error
    pub fn invalid_export_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidExportName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a per-operation engine failure
    pub fn is_engine_failure(&self) -> bool {
        matches!(self, Self::EngineFailure { .. })
    }

    /// Check if this is the guidance condition rather than a failure
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::AmbiguousInstruction { .. })
    }

    /// Check if this error concerns session preconditions
    /// (no session, no source, invalid name).
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NoActiveSession | Self::NoSourceSet | Self::InvalidSessionName { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for MixError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for MixError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MixError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for MixError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, MixError>`.
pub type Result<T> = std::result::Result<T, MixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_failure_message_names_operation() {
        let err = MixError::engine(OperationKind::Reverb, EngineError::Timeout { seconds: 5 });
        assert!(err.is_engine_failure());
        assert_eq!(err.to_string(), "reverb failed: engine timed out after 5s");
    }

    #[test]
    fn test_precondition_predicates() {
        assert!(MixError::NoActiveSession.is_precondition());
        assert!(MixError::NoSourceSet.is_precondition());
        assert!(!MixError::NoArtifactToExport.is_precondition());
        assert!(MixError::ambiguous("hello there").is_ambiguous());
    }

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: MixError = io.into();
        match err {
            MixError::Io { message } => assert!(message.contains("NotFound")),
            other => panic!("unexpected variant: {:?}", other),
        }
    }
}
