//! In-process snapshot store.

use super::StateStore;
use crate::models::AppState;
use crate::{Error, Result};

/// Keeps the snapshot as serialized JSON in memory.
///
/// Going through JSON keeps load/save semantics identical to the file store.
/// Writes can be made to fail to exercise degraded persistence.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    snapshot: Option<String>,
    fail_writes: bool,
    write_count: usize,
}

impl MemoryStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be serialized.
    pub fn with_state(state: &AppState) -> Result<Self> {
        let mut store = Self::new();
        store.save(state)?;
        store.write_count = 0;
        Ok(store)
    }

    /// Creates a store holding raw snapshot text, which need not be valid.
    #[must_use]
    pub fn with_raw(snapshot: impl Into<String>) -> Self {
        Self {
            snapshot: Some(snapshot.into()),
            ..Self::default()
        }
    }

    /// Makes every subsequent save fail.
    #[must_use]
    pub const fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Number of successful saves.
    #[must_use]
    pub const fn write_count(&self) -> usize {
        self.write_count
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<AppState>> {
        self.snapshot
            .as_deref()
            .map(|json| {
                serde_json::from_str(json).map_err(|e| Error::OperationFailed {
                    operation: "deserialize_state".to_string(),
                    cause: e.to_string(),
                })
            })
            .transpose()
    }

    fn save(&mut self, state: &AppState) -> Result<()> {
        if self.fail_writes {
            return Err(Error::OperationFailed {
                operation: "write_state".to_string(),
                cause: "storage unavailable".to_string(),
            });
        }
        let json = serde_json::to_string(state).map_err(|e| Error::OperationFailed {
            operation: "serialize_state".to_string(),
            cause: e.to_string(),
        })?;
        self.snapshot = Some(json);
        self.write_count += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory (not persisted)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_loads_none() {
        assert!(MemoryStateStore::new().load().unwrap().is_none());
    }

    #[test]
    fn test_round_trip_and_count() {
        let mut store = MemoryStateStore::new();
        let mut state = AppState::default();
        state.memory.name = "Kavya".to_string();
        store.save(&state).unwrap();
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.load().unwrap(), Some(state));
    }

    #[test]
    fn test_failing_writes() {
        let mut store = MemoryStateStore::new().failing_writes();
        assert!(store.save(&AppState::default()).is_err());
        assert_eq!(store.write_count(), 0);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_raw_garbage_fails_to_load() {
        let store = MemoryStateStore::with_raw("[1, 2");
        assert!(store.load().is_err());
    }
}
