//! Persisted record of recent successful submissions, used for rate limiting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Lowercased email
    pub email: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn new(email: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            email: email.into(),
            timestamp,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when reading or writing the submission log
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to access submission log: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize submission log: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key-value persistence for the submission log.
///
/// The whole ordered list is read and rewritten on every use.
pub trait SubmissionStore: Send + Sync {
    fn read(&self) -> StoreResult<Vec<SubmissionRecord>>;
    fn write(&self, records: &[SubmissionRecord]) -> StoreResult<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SubmissionLog {
    submissions: Vec<SubmissionRecord>,
}

/// Submission log kept in a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SubmissionStore for JsonFileStore {
    /// A missing file is an empty log. A malformed one is backed up and
    /// treated as empty so a corrupt file never locks guests out.
    fn read(&self) -> StoreResult<Vec<SubmissionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;

        match serde_json::from_str::<SubmissionLog>(&content) {
            Ok(log) => Ok(log.submissions),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to parse submission log, backing up and starting fresh"
                );

                let backup_path = self.path.with_extension("json.bak");
                if let Err(backup_err) = fs::rename(&self.path, &backup_path) {
                    tracing::warn!(error = %backup_err, "failed to back up corrupt submission log");
                }

                Ok(Vec::new())
            }
        }
    }

    /// Atomic write: temp file in the same directory, then persist over the target
    fn write(&self, records: &[SubmissionRecord]) -> StoreResult<()> {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let log = SubmissionLog {
            submissions: records.to_vec(),
        };
        let content = serde_json::to_string_pretty(&log)?;

        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let mut temp_file = NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.flush()?;

        temp_file
            .persist(&self.path)
            .map_err(|e| StoreError::Io(e.error))?;

        Ok(())
    }
}

/// Submission log held in memory, for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<SubmissionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<SubmissionRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Snapshot of the current contents
    pub fn records(&self) -> Vec<SubmissionRecord> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl SubmissionStore for MemoryStore {
    fn read(&self) -> StoreResult<Vec<SubmissionRecord>> {
        Ok(self.records())
    }

    fn write(&self, records: &[SubmissionRecord]) -> StoreResult<()> {
        *self.records.lock().unwrap_or_else(|e| e.into_inner()) = records.to_vec();
        Ok(())
    }
}
