//! Data models for aiveno.
//!
//! This module contains the persisted application state and the typed
//! actions that mutate it.

mod action;
mod document;
mod expense;
mod memory;
mod reminder;
mod state;
mod transcript;

pub use action::{Action, ActionRejection, ActionRequest, RejectionReason};
pub use document::Document;
pub use expense::{Category, Expense};
pub use memory::UserMemory;
pub use reminder::{Priority, Reminder, parse_schedule};
pub use state::{AppState, RECENT_EXPENSE_LIMIT};
pub use transcript::{ChatMessage, GREETING, Role};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque unique identifier for reminders, expenses, and documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Creates an identifier from an existing string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_differ() {
        let a = EntityId::generate();
        let b = EntityId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_entity_id_serializes_transparently() {
        let id = EntityId::new("abc123");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"abc123\"");
    }
}
