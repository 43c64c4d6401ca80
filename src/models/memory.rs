//! What the assistant remembers about the user.

use serde::{Deserialize, Serialize};

/// Long-lived facts about the user.
///
/// Key facts are append-only: later facts never replace earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMemory {
    /// Display name.
    pub name: String,
    /// Free-text preferences.
    #[serde(default)]
    pub preferences: Vec<String>,
    /// Facts accumulated over time, oldest first.
    #[serde(default)]
    pub key_facts: Vec<String>,
}

impl UserMemory {
    /// Name used until the user tells us theirs.
    pub const DEFAULT_NAME: &'static str = "User";
}

impl Default for UserMemory {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            preferences: Vec::new(),
            key_facts: Vec::new(),
        }
    }
}
