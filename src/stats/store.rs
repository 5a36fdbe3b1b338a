//! Statistics file storage.
//!
//! Loading never fails from the caller's point of view: a missing or
//! malformed file yields [`StatisticsRecord::default`]. Saving reports
//! failure through the log and a `false` return, never an error.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, warn};

use super::error::StatsError;
use super::record::StatisticsRecord;

/// File name used when no explicit path is configured.
pub const STATS_FILE: &str = "staffquiz_stats.json";

/// JSON-file backed statistics storage.
#[derive(Debug, Clone)]
pub struct StatisticsStore {
    path: PathBuf,
}

impl StatisticsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory, or the working directory when
    /// no home directory can be resolved.
    pub fn at_default_location() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("org", "staffquiz", "staffquiz") {
            proj_dirs.data_dir().join(STATS_FILE)
        } else {
            PathBuf::from(STATS_FILE)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record. `Ok(None)` when the file does not exist.
    pub fn try_load(&self) -> Result<Option<StatisticsRecord>, StatsError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|source| StatsError::Read {
            path: self.path.clone(),
            source,
        })?;
        let record = serde_json::from_str(&content).map_err(|source| StatsError::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(record))
    }

    /// Read the record, substituting the zero record on any problem.
    pub fn load(&self) -> StatisticsRecord {
        match self.try_load() {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("no statistics at {}, starting fresh", self.path.display());
                StatisticsRecord::default()
            }
            Err(e) => {
                warn!("{e}: {}; starting fresh", source_message(&e));
                StatisticsRecord::default()
            }
        }
    }

    /// Write the record as indented JSON, creating parent directories.
    pub fn try_save(&self, record: &StatisticsRecord) -> Result<(), StatsError> {
        let content = serde_json::to_string_pretty(record)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StatsError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::write(&self.path, content).map_err(|source| StatsError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Write the record. Failures are logged and reported as `false`.
    pub fn save(&self, record: &StatisticsRecord) -> bool {
        match self.try_save(record) {
            Ok(()) => {
                debug!("statistics saved to {}", self.path.display());
                true
            }
            Err(e) => {
                warn!("{e}: {}", source_message(&e));
                false
            }
        }
    }
}

fn source_message(e: &StatsError) -> String {
    std::error::Error::source(e)
        .map(|s| s.to_string())
        .unwrap_or_default()
}
