//! Context summary builder.
//!
//! Summarises the current state for the model: who the user is, what we
//! remember about them, their reminders, recent spending and documents.

use crate::models::{AppState, RECENT_EXPENSE_LIMIT};
use serde::Serialize;

/// Builds the context summary embedded in the system instruction.
#[must_use]
pub fn build_context(state: &AppState) -> String {
    let memory = &state.memory;
    format!(
        "User Name: {name}\n\
         Key Facts: {facts}\n\
         Current State:\n\
         - Reminders: {reminders}\n\
         - Recent Expenses: {expenses}\n\
         - Important Docs: {documents}",
        name = memory.name,
        facts = memory.key_facts.join(", "),
        reminders = to_json(&state.reminders),
        expenses = to_json(state.recent_expenses(RECENT_EXPENSE_LIMIT)),
        documents = to_json(&state.documents),
    )
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to serialize context section");
        "[]".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, Category};
    use crate::services::apply;

    #[test]
    fn test_context_for_empty_state() {
        let context = build_context(&AppState::default());
        assert!(context.contains("User Name: User"));
        assert!(context.contains("- Reminders: []"));
        assert!(context.contains("- Recent Expenses: []"));
        assert!(context.contains("- Important Docs: []"));
    }

    #[test]
    fn test_context_includes_facts_and_reminders() {
        let mut state = AppState::default();
        state.memory.name = "Priya".to_string();
        state = apply(
            state,
            Action::UpdateMemory {
                fact: "Lives in Pune".to_string(),
            },
        );
        state = apply(
            state,
            Action::UpdateMemory {
                fact: "Has a cat".to_string(),
            },
        );
        state = apply(
            state,
            Action::add_reminder("Vet visit", "2024-06-01 09:00", Some("high"))
                .unwrap_or(Action::UpdateMemory { fact: String::new() }),
        );

        let context = build_context(&state);
        assert!(context.contains("User Name: Priya"));
        assert!(context.contains("Key Facts: Lives in Pune, Has a cat"));
        assert!(context.contains("\"title\":\"Vet visit\""));
    }

    #[test]
    fn test_context_limits_expenses_to_recent() {
        let mut state = AppState::default();
        for i in 0..7 {
            state = apply(
                state,
                Action::AddExpense {
                    amount: 10.0,
                    description: format!("coffee {i}"),
                    category: Category::Food,
                },
            );
        }
        let context = build_context(&state);
        assert!(!context.contains("coffee 1\""));
        assert!(context.contains("coffee 2\""));
        assert!(context.contains("coffee 6\""));
    }
}
