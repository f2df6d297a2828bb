//! Configuration service implementation.
//!
//! Loads `MixConfig` from `config.toml`, writing a commented default file on
//! first run, and caches the result.

use mixr_core::config::MixConfig;
use mixr_core::error::{MixError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

const CONFIG_HEADER: &str = "\
# mixr configuration
#
# Every key is optional; removed keys fall back to the built-in defaults.

";

/// Configuration service that loads and caches the mixr configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<MixConfig>>>,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<MixConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_or_create()?;

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn load_or_create(&self) -> Result<MixConfig> {
        if !self.path.exists() {
            let config = MixConfig::default();
            self.write_template(&config)?;
            tracing::info!(path = %self.path.display(), "[Config] Wrote default configuration");
            return Ok(config);
        }

        let content = std::fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            MixError::config(format!("{}: {}", self.path.display(), e))
        })
    }

    fn write_template(&self, config: &MixConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let body = toml::to_string_pretty(config)?;
        std::fs::write(&self.path, format!("{}{}", CONFIG_HEADER, body))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_writes_template() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::new(&path);

        let config = service.get_config().unwrap();
        assert_eq!(config, MixConfig::default());
        assert!(path.exists());

        // The template parses back to the same defaults
        let reread: MixConfig = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reread, config);
    }

    #[test]
    fn test_reads_overrides_and_caches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[engine]\ntimeout_secs = 42\n").unwrap();
        let service = ConfigService::new(&path);

        assert_eq!(service.get_config().unwrap().engine.timeout_secs, 42);

        std::fs::write(&path, "[engine]\ntimeout_secs = 7\n").unwrap();
        assert_eq!(service.get_config().unwrap().engine.timeout_secs, 42);

        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().engine.timeout_secs, 7);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[engine\n").unwrap();

        let err = ConfigService::new(&path).get_config().unwrap_err();
        assert!(matches!(err, MixError::Config(_)));
    }
}
