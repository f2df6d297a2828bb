//! TOML-based SessionStore implementation

use crate::dto::SessionRecordV1;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use mixr_core::error::Result;
use mixr_core::session::{Session, SessionStore, validate_session_name};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each session as its own TOML file.
///
/// ```text
/// sessions_dir/
/// ├── demo.toml
/// └── album-master.toml
/// ```
///
/// Writes go through [`AtomicTomlFile::replace`], so a crash mid-save leaves
/// the previous record in place.
pub struct TomlSessionStore {
    sessions_dir: PathBuf,
}

impl TomlSessionStore {
    /// Creates the store, creating `sessions_dir` if it doesn't exist.
    pub fn new(sessions_dir: impl AsRef<Path>) -> Result<Self> {
        let sessions_dir = sessions_dir.as_ref().to_path_buf();
        fs::create_dir_all(&sessions_dir)?;
        Ok(Self { sessions_dir })
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    fn session_file(&self, name: &str) -> Result<AtomicTomlFile<SessionRecordV1>> {
        validate_session_name(name)?;
        Ok(AtomicTomlFile::new(
            self.sessions_dir.join(format!("{}.toml", name)),
        ))
    }
}

#[async_trait]
impl SessionStore for TomlSessionStore {
    async fn load(&self, name: &str) -> Result<Option<Session>> {
        let file = self.session_file(name)?;
        match file.load()? {
            Some(dto) => Ok(Some(Session::try_from(dto)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let file = self.session_file(&session.name)?;
        file.replace(&SessionRecordV1::from(session))?;
        tracing::debug!(
            session = %session.name,
            version = session.version,
            path = %file.path().display(),
            "[SessionStore] Saved session"
        );
        Ok(())
    }

    async fn list_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.sessions_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !stem.starts_with('.') {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixr_core::MixError;
    use tempfile::TempDir;

    fn session_with_source(name: &str, source: &Path) -> Session {
        let mut session = Session::new(name);
        session.current_artifact = Some(source.to_path_buf());
        session.epoch = 1;
        session.artifacts.insert(0, source.to_path_buf());
        session
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlSessionStore::new(temp_dir.path().join("sessions")).unwrap();

        let session = session_with_source("demo", &temp_dir.path().join("song.wav"));
        store.save(&session).await.unwrap();

        let loaded = store.load("demo").await.unwrap().unwrap();
        assert_eq!(loaded, session);
    }

    #[tokio::test]
    async fn test_load_missing_session_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlSessionStore::new(temp_dir.path()).unwrap();
        assert!(store.load("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlSessionStore::new(temp_dir.path()).unwrap();

        let mut session = session_with_source("demo", &temp_dir.path().join("song.wav"));
        store.save(&session).await.unwrap();
        session.version = 4;
        store.save(&session).await.unwrap();

        assert_eq!(store.load("demo").await.unwrap().unwrap().version, 4);
    }

    #[tokio::test]
    async fn test_list_names_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlSessionStore::new(temp_dir.path()).unwrap();

        store.save(&Session::new("zeta")).await.unwrap();
        store.save(&Session::new("alpha")).await.unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.list_names().await.unwrap(), vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn test_rejects_path_like_names() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlSessionStore::new(temp_dir.path()).unwrap();

        let err = store.load("../outside").await.unwrap_err();
        assert!(matches!(err, MixError::InvalidSessionName { .. }));
    }

    #[tokio::test]
    async fn test_corrupt_record_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlSessionStore::new(temp_dir.path()).unwrap();
        fs::write(temp_dir.path().join("broken.toml"), "name = [").unwrap();

        let err = store.load("broken").await.unwrap_err();
        assert!(matches!(err, MixError::Serialization { .. }));
    }
}
