//! Session DTOs (anti-corruption layer between the domain model and TOML).

use mixr_core::MixError;
use mixr_core::operation::OperationKind;
use mixr_core::session::{HistoryRecord, RecordOutcome, Session};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Schema version written into every session file.
pub const SESSION_SCHEMA_VERSION: &str = "1.0.0";

/// V1.0.0: one history entry.
///
/// `params` stays last so it serializes as a sub-table after the plain keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecordV1 {
    pub kind: OperationKind,
    pub description: String,
    pub outcome: RecordOutcome,
    pub version: u32,
    #[serde(default)]
    pub epoch: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

/// V1.0.0: one entry of the version→artifact index.
///
/// TOML tables need string keys, so the index is stored as a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactEntryV1 {
    pub version: u32,
    pub path: String,
}

/// V1.0.0: the persisted session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecordV1 {
    pub schema_version: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_artifact: Option<String>,
    pub version: u32,
    #[serde(default)]
    pub epoch: u32,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub artifacts: Vec<ArtifactEntryV1>,
    #[serde(default)]
    pub history: Vec<HistoryRecordV1>,
}

fn path_string(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}

impl From<&HistoryRecord> for HistoryRecordV1 {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            kind: record.kind,
            description: record.description.clone(),
            outcome: record.outcome,
            version: record.version,
            epoch: record.epoch,
            artifact: record.artifact.as_deref().map(path_string),
            error: record.error.clone(),
            timestamp: record.timestamp.clone(),
            params: record.params.clone(),
        }
    }
}

impl From<HistoryRecordV1> for HistoryRecord {
    fn from(dto: HistoryRecordV1) -> Self {
        HistoryRecord {
            kind: dto.kind,
            params: dto.params,
            description: dto.description,
            outcome: dto.outcome,
            version: dto.version,
            epoch: dto.epoch,
            artifact: dto.artifact.map(PathBuf::from),
            error: dto.error,
            timestamp: dto.timestamp,
        }
    }
}

impl From<&Session> for SessionRecordV1 {
    fn from(session: &Session) -> Self {
        Self {
            schema_version: SESSION_SCHEMA_VERSION.to_string(),
            name: session.name.clone(),
            current_artifact: session.current_artifact.as_deref().map(path_string),
            version: session.version,
            epoch: session.epoch,
            created_at: session.created_at.clone(),
            updated_at: session.updated_at.clone(),
            artifacts: session
                .artifacts
                .iter()
                .map(|(version, path)| ArtifactEntryV1 {
                    version: *version,
                    path: path_string(path),
                })
                .collect(),
            history: session.history.iter().map(HistoryRecordV1::from).collect(),
        }
    }
}

impl TryFrom<SessionRecordV1> for Session {
    type Error = MixError;

    fn try_from(dto: SessionRecordV1) -> Result<Self, Self::Error> {
        let major = dto.schema_version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(MixError::Serialization {
                format: "TOML".to_string(),
                message: format!(
                    "session '{}' has unsupported schema version {}",
                    dto.name, dto.schema_version
                ),
            });
        }

        Ok(Session {
            name: dto.name,
            current_artifact: dto.current_artifact.map(PathBuf::from),
            version: dto.version,
            history: dto.history.into_iter().map(HistoryRecord::from).collect(),
            artifacts: dto
                .artifacts
                .into_iter()
                .map(|entry| (entry.version, PathBuf::from(entry.path)))
                .collect(),
            epoch: dto.epoch,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixr_core::operation::{Operation, VolumeParams};

    fn sample_session() -> Session {
        let mut session = Session::new("demo");
        session.current_artifact = Some(PathBuf::from("/tmp/demo/h0000_v001_volume.wav"));
        session.version = 1;
        session.epoch = 1;
        session.artifacts.insert(0, PathBuf::from("/music/song.wav"));
        session
            .artifacts
            .insert(1, PathBuf::from("/tmp/demo/h0000_v001_volume.wav"));

        let op = Operation::Volume(VolumeParams { delta_db: -7.0 });
        session.history.push(HistoryRecord {
            kind: op.kind(),
            params: op.params(),
            description: op.describe(),
            outcome: RecordOutcome::Success,
            version: 1,
            epoch: 1,
            artifact: Some(PathBuf::from("/tmp/demo/h0000_v001_volume.wav")),
            error: None,
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
        });
        session
    }

    #[test]
    fn test_session_survives_toml() {
        let session = sample_session();
        let text = toml::to_string_pretty(&SessionRecordV1::from(&session)).unwrap();
        assert!(text.contains("schema_version = \"1.0.0\""));
        assert!(text.contains("kind = \"volume\""));

        let dto: SessionRecordV1 = toml::from_str(&text).unwrap();
        let restored = Session::try_from(dto).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_unknown_major_version_rejected() {
        let mut dto = SessionRecordV1::from(&Session::new("demo"));
        dto.schema_version = "2.0.0".to_string();
        let err = Session::try_from(dto).unwrap_err();
        assert!(matches!(err, MixError::Serialization { .. }));
    }
}
