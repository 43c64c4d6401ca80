//! State persistence.
//!
//! The whole [`AppState`](crate::models::AppState) is stored as one JSON
//! snapshot under a fixed key and rewritten after every change:
//! - [`FileStateStore`]: `<data_dir>/aiveno_state.json`, written atomically
//! - [`MemoryStateStore`]: in-process snapshot for tests and ephemeral runs

mod filesystem;
mod memory;
mod store;

pub use filesystem::{FileStateStore, MAX_STATE_FILE_SIZE, STATE_KEY};
pub use memory::MemoryStateStore;
pub use store::StateStore;

use crate::{Error, Result};
use std::path::PathBuf;

/// Returns the per-user data directory for aiveno.
///
/// # Errors
///
/// Returns an error if the platform data directory cannot be determined.
pub fn get_user_data_dir() -> Result<PathBuf> {
    directories::BaseDirs::new()
        .map(|b| b.data_local_dir().join("aiveno"))
        .ok_or_else(|| Error::OperationFailed {
            operation: "get_user_data_dir".to_string(),
            cause: "Could not determine user data directory".to_string(),
        })
}
