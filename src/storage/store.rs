//! State store trait.

use crate::Result;
use crate::models::AppState;

/// Trait for snapshot stores.
///
/// A store holds at most one snapshot. Loading never mutates it and saving
/// replaces it wholesale.
pub trait StateStore: Send {
    /// Loads the stored snapshot.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<AppState>>;

    /// Replaces the stored snapshot.
    fn save(&mut self, state: &AppState) -> Result<()>;

    /// Describes where the snapshot lives, for status output.
    fn describe(&self) -> String;
}

impl<S: StateStore + ?Sized> StateStore for Box<S> {
    fn load(&self) -> Result<Option<AppState>> {
        (**self).load()
    }

    fn save(&mut self, state: &AppState) -> Result<()> {
        (**self).save(state)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
