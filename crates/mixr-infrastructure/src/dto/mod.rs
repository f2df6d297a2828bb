//! Data Transfer Objects for persistence.

pub mod session;

pub use session::{ArtifactEntryV1, HistoryRecordV1, SESSION_SCHEMA_VERSION, SessionRecordV1};
