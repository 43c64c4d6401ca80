//! State reducer.
//!
//! Applies one [`Action`] to an [`AppState`] and returns the new state. The
//! reducer performs no I/O and does not care whether the action came from
//! the model or from the user. Actions are validated before they get here,
//! so every well-typed action applies cleanly; toggles and deletes that name
//! an unknown reminder are silent no-ops.

use crate::models::{Action, AppState, Document, EntityId, Expense, Reminder};
use chrono::{DateTime, Utc};

/// Applies `action` to `state`, stamping new expenses with `now`.
#[must_use]
pub fn reduce(mut state: AppState, action: Action, now: DateTime<Utc>) -> AppState {
    match action {
        Action::AddReminder {
            title,
            due_date,
            priority,
        } => {
            let mut reminder = Reminder::new(title, due_date, priority);
            reminder.id = fresh_id(&state, reminder.id);
            state.reminders.push(reminder);
        },
        Action::AddExpense {
            amount,
            description,
            category,
        } => {
            let mut expense = Expense::new(amount, description, category, now);
            expense.id = fresh_id(&state, expense.id);
            state.expenses.push(expense);
        },
        Action::UpdateMemory { fact } => {
            state.memory.key_facts.push(fact);
        },
        Action::AddDocument {
            name,
            expiry_date,
            kind,
        } => {
            let mut document = Document::new(name, expiry_date, kind);
            document.id = fresh_id(&state, document.id);
            state.documents.push(document);
        },
        Action::ToggleReminder { id } => {
            if let Some(reminder) = state.reminders.iter_mut().find(|r| r.id == id) {
                reminder.completed = !reminder.completed;
            }
        },
        Action::DeleteReminder { id } => {
            state.reminders.retain(|r| r.id != id);
        },
    }
    state
}

/// Applies `action` using the wall clock for timestamps.
#[must_use]
pub fn apply(state: AppState, action: Action) -> AppState {
    reduce(state, action, Utc::now())
}

// Regenerates until the identifier is unused.
fn fresh_id(state: &AppState, candidate: EntityId) -> EntityId {
    let mut id = candidate;
    while state.contains_id(&id) {
        id = EntityId::generate();
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Priority};

    fn add_reminder(title: &str) -> Action {
        Action::AddReminder {
            title: title.to_string(),
            due_date: "2024-05-01 10:00".to_string(),
            priority: Priority::Medium,
        }
    }

    #[test]
    fn test_add_reminder_appends_open_entry() {
        let state = apply(AppState::default(), add_reminder("Pay rent"));
        assert_eq!(state.reminders.len(), 1);
        assert_eq!(state.reminders[0].title, "Pay rent");
        assert!(!state.reminders[0].completed);
    }

    #[test]
    fn test_add_reminder_allows_duplicates() {
        let state = apply(AppState::default(), add_reminder("Pay rent"));
        let state = apply(state, add_reminder("Pay rent"));
        assert_eq!(state.reminders.len(), 2);
        assert_ne!(state.reminders[0].id, state.reminders[1].id);
    }

    #[test]
    fn test_add_expense_uses_apply_time() {
        let now = Utc::now();
        let state = reduce(
            AppState::default(),
            Action::AddExpense {
                amount: 500.0,
                description: "dinner".to_string(),
                category: Category::Other,
            },
            now,
        );
        assert_eq!(state.expenses.len(), 1);
        assert_eq!(state.expenses[0].date, now);
        assert_eq!(state.expenses[0].category, Category::Other);
    }

    #[test]
    fn test_update_memory_appends() {
        let state = apply(
            AppState::default(),
            Action::UpdateMemory {
                fact: "Vegetarian".to_string(),
            },
        );
        let state = apply(
            state,
            Action::UpdateMemory {
                fact: "Eats chicken now".to_string(),
            },
        );
        assert_eq!(state.memory.key_facts, vec!["Vegetarian", "Eats chicken now"]);
    }

    #[test]
    fn test_add_document() {
        let state = apply(
            AppState::default(),
            Action::AddDocument {
                name: "Passport".to_string(),
                expiry_date: "2030-01-31".to_string(),
                kind: "ID".to_string(),
            },
        );
        assert_eq!(state.documents.len(), 1);
        assert_eq!(state.documents[0].kind, "ID");
    }

    #[test]
    fn test_toggle_flips_only_target() {
        let state = apply(AppState::default(), add_reminder("a"));
        let state = apply(state, add_reminder("b"));
        let target = state.reminders[1].id.clone();

        let state = apply(state, Action::ToggleReminder { id: target });
        assert!(!state.reminders[0].completed);
        assert!(state.reminders[1].completed);
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let before = apply(AppState::default(), add_reminder("a"));
        let after = apply(
            before.clone(),
            Action::ToggleReminder {
                id: EntityId::new("missing"),
            },
        );
        assert_eq!(before, after);
    }

    #[test]
    fn test_delete_removes_target() {
        let state = apply(AppState::default(), add_reminder("a"));
        let id = state.reminders[0].id.clone();
        let state = apply(state, Action::DeleteReminder { id });
        assert!(state.reminders.is_empty());
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let before = apply(AppState::default(), add_reminder("a"));
        let after = apply(
            before.clone(),
            Action::DeleteReminder {
                id: EntityId::new("missing"),
            },
        );
        assert_eq!(before, after);
    }
}
