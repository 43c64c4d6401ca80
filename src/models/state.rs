//! The persisted application aggregate.

use super::{Document, EntityId, Expense, Reminder, UserMemory};
use serde::{Deserialize, Serialize};

/// Number of most recent expenses shared with the model.
pub const RECENT_EXPENSE_LIMIT: usize = 5;

/// Everything the assistant knows, persisted as one snapshot.
///
/// Identifiers are unique within each list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppState {
    /// Reminders in creation order.
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    /// Expenses in creation order.
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Documents in creation order.
    #[serde(default)]
    pub documents: Vec<Document>,
    /// User memory.
    #[serde(default)]
    pub memory: UserMemory,
}

impl AppState {
    /// Looks up a reminder by identifier.
    #[must_use]
    pub fn reminder(&self, id: &EntityId) -> Option<&Reminder> {
        self.reminders.iter().find(|r| &r.id == id)
    }

    /// Returns reminders that are not yet completed.
    pub fn open_reminders(&self) -> impl Iterator<Item = &Reminder> {
        self.reminders.iter().filter(|r| !r.completed)
    }

    /// Returns the last `limit` expenses, oldest first.
    #[must_use]
    pub fn recent_expenses(&self, limit: usize) -> &[Expense] {
        let start = self.expenses.len().saturating_sub(limit);
        &self.expenses[start..]
    }

    /// Returns true when no entity in any list shares an identifier.
    #[must_use]
    pub fn has_unique_ids(&self) -> bool {
        fn unique<'a>(mut ids: impl Iterator<Item = &'a EntityId>) -> bool {
            let mut seen = std::collections::HashSet::new();
            ids.all(|id| seen.insert(id))
        }
        unique(self.reminders.iter().map(|r| &r.id))
            && unique(self.expenses.iter().map(|e| &e.id))
            && unique(self.documents.iter().map(|d| &d.id))
    }

    /// Returns true if the identifier is already used by any entity.
    #[must_use]
    pub fn contains_id(&self, id: &EntityId) -> bool {
        self.reminders.iter().any(|r| &r.id == id)
            || self.expenses.iter().any(|e| &e.id == id)
            || self.documents.iter().any(|d| &d.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Priority};
    use chrono::Utc;

    #[test]
    fn test_default_state_is_empty() {
        let state = AppState::default();
        assert!(state.reminders.is_empty());
        assert!(state.expenses.is_empty());
        assert!(state.documents.is_empty());
        assert_eq!(state.memory.name, "User");
    }

    #[test]
    fn test_recent_expenses_takes_tail() {
        let mut state = AppState::default();
        for i in 0..8 {
            state.expenses.push(Expense::new(
                f64::from(i),
                format!("item {i}"),
                Category::Other,
                Utc::now(),
            ));
        }
        let recent = state.recent_expenses(RECENT_EXPENSE_LIMIT);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].description, "item 3");
        assert_eq!(recent[4].description, "item 7");
    }

    #[test]
    fn test_recent_expenses_with_fewer_entries() {
        let state = AppState::default();
        assert!(state.recent_expenses(5).is_empty());
    }

    #[test]
    fn test_open_reminders_skips_completed() {
        let mut state = AppState::default();
        let mut done = Reminder::new("done", "2024-01-01", Priority::Low);
        done.completed = true;
        state.reminders.push(done);
        state
            .reminders
            .push(Reminder::new("open", "2024-01-02", Priority::Low));
        assert_eq!(state.open_reminders().count(), 1);
    }

    #[test]
    fn test_deserializes_original_storage_blob() {
        let blob = r#"{
            "reminders": [{"id": "k3j2h1g0f", "title": "Pay rent", "dueDate": "2024-05-01 10:00", "completed": false, "priority": "high"}],
            "expenses": [{"id": "a1b2c3d4e", "amount": 500, "category": "Food", "description": "dinner", "date": "2024-04-30T19:00:00.000Z"}],
            "documents": [],
            "memory": {"name": "Priya", "preferences": [], "keyFacts": ["Pays rent monthly"]}
        }"#;
        let state: AppState = serde_json::from_str(blob).unwrap_or_default();
        assert_eq!(state.reminders.len(), 1);
        assert_eq!(state.expenses[0].category, Category::Food);
        assert_eq!(state.memory.key_facts, vec!["Pays rent monthly"]);
        assert!(state.has_unique_ids());
    }
}
