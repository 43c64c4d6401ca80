//! Filesystem snapshot store.
//!
//! The snapshot is one pretty-printed JSON file. Writes go to a sibling
//! temporary file that is then renamed over the target, so a crash mid-write
//! leaves the previous snapshot intact.

use super::StateStore;
use crate::models::AppState;
use crate::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Fixed storage key; the file is `<key>.json`.
pub const STATE_KEY: &str = "aiveno_state";

/// Maximum snapshot size accepted on load (4 MiB).
pub const MAX_STATE_FILE_SIZE: u64 = 4 * 1024 * 1024;

/// Stores the snapshot as `aiveno_state.json` in a data directory.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    base_path: PathBuf,
}

impl FileStateStore {
    /// Creates a store rooted at `base_path`.
    ///
    /// The directory is created lazily on first save.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Returns the base directory.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the snapshot file path.
    #[must_use]
    pub fn state_path(&self) -> PathBuf {
        self.base_path.join(format!("{STATE_KEY}.json"))
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path.join(format!(".{STATE_KEY}.json.tmp"))
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<Option<AppState>> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(None);
        }

        let metadata = fs::metadata(&path).map_err(|e| Error::OperationFailed {
            operation: "read_state_metadata".to_string(),
            cause: e.to_string(),
        })?;

        if metadata.len() > MAX_STATE_FILE_SIZE {
            return Err(Error::InvalidInput(format!(
                "State file exceeds maximum size of {MAX_STATE_FILE_SIZE} bytes: {}",
                path.display()
            )));
        }

        let json = fs::read_to_string(&path).map_err(|e| Error::OperationFailed {
            operation: "read_state_file".to_string(),
            cause: e.to_string(),
        })?;

        let state = serde_json::from_str(&json).map_err(|e| Error::OperationFailed {
            operation: "deserialize_state".to_string(),
            cause: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), "Loaded state snapshot");
        Ok(Some(state))
    }

    fn save(&mut self, state: &AppState) -> Result<()> {
        fs::create_dir_all(&self.base_path).map_err(|e| Error::OperationFailed {
            operation: "create_data_dir".to_string(),
            cause: e.to_string(),
        })?;

        let json = serde_json::to_string_pretty(state).map_err(|e| Error::OperationFailed {
            operation: "serialize_state".to_string(),
            cause: e.to_string(),
        })?;

        let temp = self.temp_path();
        let mut file = fs::File::create(&temp).map_err(|e| Error::OperationFailed {
            operation: "write_state_file".to_string(),
            cause: e.to_string(),
        })?;
        file.write_all(json.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| Error::OperationFailed {
                operation: "write_state_file".to_string(),
                cause: e.to_string(),
            })?;
        drop(file);

        fs::rename(&temp, self.state_path()).map_err(|e| Error::OperationFailed {
            operation: "replace_state_file".to_string(),
            cause: e.to_string(),
        })?;

        tracing::debug!(
            path = %self.state_path().display(),
            reminders = state.reminders.len(),
            expenses = state.expenses.len(),
            "Saved state snapshot"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.state_path().display().to_string()
    }
}
