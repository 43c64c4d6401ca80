//! Home summary over the current state.

use crate::models::{AppState, Category, Reminder};
use chrono::{Local, NaiveDate};

/// At-a-glance numbers for the home screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Sum of expenses recorded today, local time.
    pub spent_today: f64,
    /// Number of reminders not yet completed.
    pub open_reminders: usize,
    /// Open reminders ordered by due date; unparseable dates come last.
    pub upcoming: Vec<Reminder>,
    /// Total spent per category, in category order, omitting empty ones.
    pub by_category: Vec<(Category, f64)>,
}

impl Dashboard {
    /// Summarises `state` as of the local calendar day `today`.
    #[must_use]
    pub fn from_state(state: &AppState, today: NaiveDate) -> Self {
        let spent_today = state
            .expenses
            .iter()
            .filter(|e| e.date.with_timezone(&Local).date_naive() == today)
            .map(|e| e.amount)
            .sum();

        let mut upcoming: Vec<Reminder> = state.open_reminders().cloned().collect();
        upcoming.sort_by_key(|r| {
            let due = r.due_at();
            (due.is_none(), due)
        });

        let by_category = Category::all()
            .iter()
            .filter_map(|category| {
                let mut entries = state
                    .expenses
                    .iter()
                    .filter(|e| e.category == *category)
                    .peekable();
                entries.peek()?;
                Some((*category, entries.map(|e| e.amount).sum()))
            })
            .collect();

        Self {
            spent_today,
            open_reminders: upcoming.len(),
            upcoming,
            by_category,
        }
    }

    /// Summarises `state` as of today.
    #[must_use]
    pub fn now(state: &AppState) -> Self {
        Self::from_state(state, Local::now().date_naive())
    }

    /// Total across all categories.
    #[must_use]
    pub fn total_spent(&self) -> f64 {
        self.by_category.iter().map(|(_, amount)| amount).sum()
    }
}
