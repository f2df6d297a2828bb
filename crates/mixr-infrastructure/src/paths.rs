//! Unified path management for mixr files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/mixr/              # Config directory
//! └── config.toml              # House defaults (written on first run)
//!
//! ~/.local/share/mixr/         # Data directory
//! ├── sessions/                # One TOML record per session
//! ├── artifacts/<session>/     # Versioned intermediate artifacts
//! ├── exports/                 # Final exports with relative names
//! └── logs/                    # REPL log files
//! ```
//!
//! Setting `MIXR_HOME` (or passing an explicit home) puts both trees under
//! that single directory.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the mixr home directory.
pub const MIXR_HOME_ENV: &str = "MIXR_HOME";

const APP_DIR: &str = "mixr";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
    /// A directory could not be created.
    CreateFailed(PathBuf, std::io::Error),
    /// A relative home could not be made absolute.
    Unresolvable(PathBuf, std::io::Error),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
            PathError::CreateFailed(path, e) => {
                write!(f, "Cannot create directory {}: {}", path.display(), e)
            }
            PathError::Unresolvable(path, e) => {
                write!(f, "Cannot resolve {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for mixr_core::MixError {
    fn from(err: PathError) -> Self {
        mixr_core::MixError::config(err.to_string())
    }
}

/// Resolved locations of every file mixr reads or writes.
#[derive(Debug, Clone, PartialEq)]
pub struct MixrPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl MixrPaths {
    /// Resolves paths from an explicit home, then `MIXR_HOME`, then the platform dirs.
    pub fn resolve(home: Option<PathBuf>) -> Result<Self, PathError> {
        let home = home.or_else(|| {
            std::env::var_os(MIXR_HOME_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        });

        match home {
            Some(root) => Self::with_root(root),
            None => {
                let config_dir = dirs::config_dir().ok_or(PathError::HomeDirNotFound)?;
                let data_dir = dirs::data_dir().ok_or(PathError::HomeDirNotFound)?;
                Ok(Self {
                    config_dir: config_dir.join(APP_DIR),
                    data_dir: data_dir.join(APP_DIR),
                })
            }
        }
    }

    /// Places config and data under a single root, made absolute against
    /// the current directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Result<Self, PathError> {
        let root = root.into();
        let root = std::path::absolute(&root).map_err(|e| PathError::Unresolvable(root, e))?;
        Ok(Self {
            config_dir: root.clone(),
            data_dir: root,
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.data_dir.join("sessions")
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.data_dir.join("artifacts")
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Creates every directory mixr writes into.
    pub fn ensure_dirs(&self) -> Result<(), PathError> {
        for dir in [
            self.config_dir.clone(),
            self.sessions_dir(),
            self.artifacts_dir(),
            self.exports_dir(),
            self.logs_dir(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| PathError::CreateFailed(dir.clone(), e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_home_wins() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MixrPaths::resolve(Some(temp_dir.path().to_path_buf())).unwrap();

        assert_eq!(paths.config_file(), temp_dir.path().join("config.toml"));
        assert_eq!(paths.sessions_dir(), temp_dir.path().join("sessions"));
        assert_eq!(paths.artifacts_dir(), temp_dir.path().join("artifacts"));
    }

    #[test]
    fn test_ensure_dirs_creates_tree() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MixrPaths::with_root(temp_dir.path().join("home")).unwrap();
        paths.ensure_dirs().unwrap();

        assert!(paths.sessions_dir().is_dir());
        assert!(paths.artifacts_dir().is_dir());
        assert!(paths.exports_dir().is_dir());
        assert!(paths.logs_dir().is_dir());
    }

    #[test]
    fn test_relative_home_is_made_absolute() {
        let paths = MixrPaths::with_root("mixr-home").unwrap();
        let cwd = std::env::current_dir().unwrap();

        assert!(paths.data_dir().is_absolute());
        assert_eq!(paths.data_dir(), cwd.join("mixr-home"));
        assert!(paths.artifacts_dir().is_absolute());
    }

    #[test]
    fn test_empty_home_is_rejected() {
        let err = MixrPaths::with_root("").unwrap_err();
        assert!(matches!(err, PathError::Unresolvable(..)));
    }
}
