use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::audio::DEFAULT_DURATION_SECS;
use crate::model::note::ClefMode;
use crate::stats::StatisticsStore;

const CONFIG_FILE: &str = "config.json";

/// User preferences. Missing keys in the file fall back to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub clef_mode: ClefMode,
    pub sound_enabled: bool,
    pub tone_duration_secs: f64,
    /// Statistics file; the platform data directory when unset.
    pub stats_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            clef_mode: ClefMode::Mixed,
            sound_enabled: true,
            tone_duration_secs: DEFAULT_DURATION_SECS,
            stats_path: None,
        }
    }
}

impl AppConfig {
    /// Platform config location, or `config.json` in the working directory.
    pub fn default_path() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("org", "staffquiz", "staffquiz") {
            proj_dirs.config_dir().join(CONFIG_FILE)
        } else {
            PathBuf::from(CONFIG_FILE)
        }
    }

    /// Loads config from the default location.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Loads config from a specified path.
    /// Returns default config if the file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Saves config to a specified path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Statistics store for the configured path.
    pub fn stats_store(&self) -> StatisticsStore {
        match &self.stats_path {
            Some(path) => StatisticsStore::new(path),
            None => StatisticsStore::at_default_location(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.clef_mode, ClefMode::Mixed);
        assert!(config.sound_enabled);
        assert_eq!(config.tone_duration_secs, 0.5);
        assert_eq!(config.stats_path, None);
    }

    #[test]
    fn test_json_serialization() {
        let config = AppConfig {
            clef_mode: ClefMode::Bass,
            sound_enabled: false,
            tone_duration_secs: 0.75,
            stats_path: Some(PathBuf::from("/tmp/stats.json")),
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"bass\""));
        let deserialized: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{ "clef_mode": "treble" }"#).unwrap();
        assert_eq!(config.clef_mode, ClefMode::Treble);
        assert!(config.sound_enabled);
        assert_eq!(config.tone_duration_secs, 0.5);
    }

    #[test]
    fn test_file_io() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("nested").join("config.json");

        let config = AppConfig {
            clef_mode: ClefMode::Treble,
            sound_enabled: true,
            tone_duration_secs: 0.3,
            stats_path: Some(dir.path().join("stats.json")),
        };

        config.save_to(&file_path).unwrap();
        let loaded = AppConfig::load_from(&file_path).unwrap();

        assert_eq!(config, loaded);
        assert_eq!(loaded.stats_store().path(), dir.path().join("stats.json"));
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("nonexistent.json");

        let config = AppConfig::load_from(&file_path).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.json");
        fs::write(&file_path, "not json").unwrap();
        assert!(AppConfig::load_from(&file_path).is_err());
    }
}
