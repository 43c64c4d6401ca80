//! Important documents with expiry dates.

use super::EntityId;
use serde::{Deserialize, Serialize};

/// A document the user wants to keep track of (passport, insurance, licence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier.
    pub id: EntityId,
    /// Document name.
    pub name: String,
    /// Expiry date as provided.
    #[serde(rename = "expiryDate")]
    pub expiry_date: String,
    /// Free-text type tag.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Document {
    /// Type tag used when none is given.
    pub const DEFAULT_KIND: &'static str = "General";

    /// Creates a document with a fresh identifier.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        expiry_date: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id: EntityId::generate(),
            name: name.into(),
            expiry_date: expiry_date.into(),
            kind: kind.into(),
        }
    }

    /// Returns the parsed expiry date, if recognised.
    #[must_use]
    pub fn expires_at(&self) -> Option<chrono::NaiveDateTime> {
        super::parse_schedule(&self.expiry_date)
    }
}
