//! Terminal rendering.
//!
//! Amounts are shown in rupees with Indian digit grouping (`₹1,23,456.50`)
//! and dates as `DD/MM/YYYY`.

use crate::models::{Document, EntityId, Expense, Reminder, UserMemory, parse_schedule};
use crate::services::Dashboard;
use chrono::Local;
use std::fmt::Write;

/// Characters of an identifier shown in listings.
pub const SHORT_ID_LEN: usize = 8;

/// Returns the leading characters of an identifier.
#[must_use]
pub fn short_id(id: &EntityId) -> &str {
    let s = id.as_str();
    s.char_indices()
        .nth(SHORT_ID_LEN)
        .map_or(s, |(end, _)| &s[..end])
}

/// Formats an amount as rupees with lakh/crore grouping.
#[must_use]
pub fn format_inr(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let grouped = if whole.len() <= 3 {
        whole.to_string()
    } else {
        let (head, last_three) = whole.split_at(whole.len() - 3);
        let mut pairs: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (left, right) = rest.split_at(rest.len() - 2);
            pairs.push(right);
            rest = left;
        }
        pairs.push(rest);
        pairs.reverse();
        format!("{},{last_three}", pairs.join(","))
    };

    if fraction == "00" {
        format!("{sign}₹{grouped}")
    } else {
        format!("{sign}₹{grouped}.{fraction}")
    }
}

/// Formats a stored schedule string for display.
///
/// Recognised dates are shown as `DD/MM/YYYY` (with `HH:MM` unless
/// midnight); anything else is shown verbatim.
#[must_use]
pub fn format_schedule(value: &str) -> String {
    parse_schedule(value).map_or_else(
        || value.trim().to_string(),
        |dt| {
            if dt.time() == chrono::NaiveTime::MIN {
                dt.format("%d/%m/%Y").to_string()
            } else {
                dt.format("%d/%m/%Y %H:%M").to_string()
            }
        },
    )
}

/// One-line reminder summary.
#[must_use]
pub fn format_reminder(reminder: &Reminder) -> String {
    format!(
        "[{}] {}  {}  (due {}, {})",
        if reminder.completed { "x" } else { " " },
        short_id(&reminder.id),
        reminder.title,
        format_schedule(&reminder.due_date),
        reminder.priority.as_str()
    )
}

/// One-line expense summary.
#[must_use]
pub fn format_expense(expense: &Expense) -> String {
    format!(
        "{}  {:>12}  {:<13}  {}  ({})",
        short_id(&expense.id),
        format_inr(expense.amount),
        expense.category.as_str(),
        expense.description,
        expense.date.with_timezone(&Local).format("%d/%m/%Y")
    )
}

/// One-line document summary.
#[must_use]
pub fn format_document(document: &Document) -> String {
    format!(
        "{}  {}  [{}]  expires {}",
        short_id(&document.id),
        document.name,
        document.kind,
        format_schedule(&document.expiry_date)
    )
}

/// Documents ordered by expiry, soonest first; unrecognised dates last.
#[must_use]
pub fn documents_by_expiry(documents: &[Document]) -> Vec<&Document> {
    let mut sorted: Vec<&Document> = documents.iter().collect();
    sorted.sort_by_key(|document| {
        let expires = document.expires_at();
        (expires.is_none(), expires)
    });
    sorted
}

/// Multi-line memory summary.
#[must_use]
pub fn format_memory(memory: &UserMemory) -> String {
    let mut out = format!("Name: {}\n", memory.name);
    if !memory.preferences.is_empty() {
        let _ = writeln!(out, "Preferences: {}", memory.preferences.join(", "));
    }
    if memory.key_facts.is_empty() {
        out.push_str("Key facts: (none yet)\n");
    } else {
        out.push_str("Key facts:\n");
        for fact in &memory.key_facts {
            let _ = writeln!(out, "  - {fact}");
        }
    }
    out
}

/// Multi-line home summary, listing at most `upcoming_limit` reminders.
#[must_use]
pub fn format_dashboard(dashboard: &Dashboard, upcoming_limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Spent today: {}", format_inr(dashboard.spent_today));
    let _ = writeln!(out, "Open reminders: {}", dashboard.open_reminders);

    if dashboard.upcoming.is_empty() {
        out.push_str("Upcoming: Clear!\n");
    } else {
        out.push_str("Upcoming:\n");
        for reminder in dashboard.upcoming.iter().take(upcoming_limit) {
            let _ = writeln!(out, "  {}", format_reminder(reminder));
        }
    }

    if !dashboard.by_category.is_empty() {
        out.push_str("Spending by category:\n");
        for (category, amount) in &dashboard.by_category {
            let _ = writeln!(out, "  {:<13} {}", category.as_str(), format_inr(*amount));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppState, Priority};
    use test_case::test_case;

    #[test_case(0.0, "₹0" ; "zero")]
    #[test_case(250.0, "₹250" ; "hundreds")]
    #[test_case(1234.5, "₹1,234.50" ; "thousands")]
    #[test_case(123_456.0, "₹1,23,456" ; "lakh")]
    #[test_case(12_345_678.9, "₹1,23,45,678.90" ; "crore")]
    fn test_format_inr(amount: f64, expected: &str) {
        assert_eq!(format_inr(amount), expected);
    }

    #[test]
    fn test_format_schedule() {
        assert_eq!(format_schedule("2024-05-01 10:00"), "01/05/2024 10:00");
        assert_eq!(format_schedule("2024-05-01"), "01/05/2024");
        assert_eq!(format_schedule(" next week "), "next week");
    }

    #[test]
    fn test_short_id() {
        let id = EntityId::new("0123456789abcdef");
        assert_eq!(short_id(&id), "01234567");
        assert_eq!(short_id(&EntityId::new("abc")), "abc");
    }

    #[test]
    fn test_format_reminder() {
        let mut reminder = Reminder::new("Pay rent", "2024-05-01 10:00", Priority::High);
        reminder.id = EntityId::new("deadbeefcafe");
        assert_eq!(
            format_reminder(&reminder),
            "[ ] deadbeef  Pay rent  (due 01/05/2024 10:00, high)"
        );
    }

    #[test]
    fn test_documents_by_expiry() {
        let documents = vec![
            Document::new("Insurance", "sometime next year", "Policy"),
            Document::new("Passport", "2031-02-10", "ID"),
            Document::new("Licence", "2026-11-30 00:00", "ID"),
        ];
        let names: Vec<&str> = documents_by_expiry(&documents)
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["Licence", "Passport", "Insurance"]);
    }

    #[test]
    fn test_format_memory_without_facts() {
        let text = format_memory(&UserMemory::default());
        assert!(text.starts_with("Name: User\n"));
        assert!(text.contains("(none yet)"));
    }

    #[test]
    fn test_format_empty_dashboard() {
        let text = format_dashboard(&Dashboard::now(&AppState::default()), 3);
        assert!(text.contains("Spent today: ₹0"));
        assert!(text.contains("Upcoming: Clear!"));
        assert!(!text.contains("Spending by category"));
    }
}
