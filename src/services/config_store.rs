// Configuration Storage Service
// Handles config file read/write and version backup

use crate::models::DetectionOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub detection: DetectionOptions,
}

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self {
            config_dir,
            config_file,
        }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("piishield"))
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir)?;
        Ok(())
    }

    /// Load configuration from file, falling back to defaults when absent
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }
        let content = fs::read_to_string(&self.config_file)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.ensure_dir()?;

        // Back up the previous file before overwriting it.
        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_file, content)?;
        Ok(())
    }

    fn create_backup(&self) -> Result<(), ConfigError> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir)?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));
        fs::copy(&self.config_file, &backup_file)?;

        self.cleanup_old_backups(&backup_dir, 10)
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &PathBuf, keep: usize) -> Result<(), ConfigError> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        entries.sort_by_key(|e| {
            e.metadata()
                .and_then(|m| m.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
        });

        for entry in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> ConfigStore {
        let dir = std::env::temp_dir().join(format!("piishield-test-{}", Uuid::new_v4()));
        ConfigStore::new(dir)
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let store = temp_store();
        let config = store.load().unwrap();
        assert_eq!(config.detection.max_chunk_chars, 480);
    }

    #[test]
    fn test_save_load_round_trip() {
        let store = temp_store();
        let config = AppConfig {
            version: "1.0.0".to_string(),
            detection: DetectionOptions {
                max_chunk_chars: 256,
                ..DetectionOptions::default()
            },
        };

        store.save(&config).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.version, "1.0.0");
        assert_eq!(loaded.detection.max_chunk_chars, 256);
    }

    #[test]
    fn test_second_save_creates_backup() {
        let store = temp_store();
        let config = AppConfig::default();
        store.save(&config).unwrap();
        store.save(&config).unwrap();

        let backups = store.config_dir.join("backups");
        let count = fs::read_dir(backups).unwrap().count();
        assert!(count >= 1);
    }
}
