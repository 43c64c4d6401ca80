//! Reminders and their priority levels.

use super::EntityId;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Urgency level of a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal urgency.
    #[default]
    Medium,
    /// Needs attention soon.
    High,
}

impl Priority {
    /// Returns all priority variants, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }

    /// Returns the wire name of the priority.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a priority name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Parses an optional priority, falling back to [`Priority::Medium`].
    #[must_use]
    pub fn parse_or_default(s: Option<&str>) -> Self {
        s.and_then(Self::parse).unwrap_or_default()
    }
}

/// Reads stored values leniently: any case is accepted, and unknown or
/// null values become [`Priority::Medium`] instead of failing the whole snapshot.
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::parse_or_default(raw.as_deref()))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A task the user wants to be reminded of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Unique identifier.
    pub id: EntityId,
    /// Short title.
    pub title: String,
    /// Due date as provided, normally `YYYY-MM-DD HH:MM`.
    #[serde(rename = "dueDate")]
    pub due_date: String,
    /// Whether the task is done.
    pub completed: bool,
    /// Urgency level.
    #[serde(default)]
    pub priority: Priority,
}

impl Reminder {
    /// Creates an open reminder with a fresh identifier.
    #[must_use]
    pub fn new(title: impl Into<String>, due_date: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: EntityId::generate(),
            title: title.into(),
            due_date: due_date.into(),
            completed: false,
            priority,
        }
    }

    /// Returns the parsed due date, if it is in a recognised format.
    #[must_use]
    pub fn due_at(&self) -> Option<NaiveDateTime> {
        parse_schedule(&self.due_date)
    }
}

/// Parses the date formats the model and users commonly produce.
///
/// Date-only values resolve to midnight. Returns `None` for anything else.
#[must_use]
pub fn parse_schedule(value: &str) -> Option<NaiveDateTime> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    ["%Y-%m-%d", "%d/%m/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_priority_parse_is_case_insensitive() {
        assert_eq!(Priority::parse("HIGH"), Some(Priority::High));
        assert_eq!(Priority::parse(" low "), Some(Priority::Low));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn test_priority_defaults_to_medium() {
        assert_eq!(Priority::parse_or_default(None), Priority::Medium);
        assert_eq!(Priority::parse_or_default(Some("whenever")), Priority::Medium);
        assert_eq!(Priority::parse_or_default(Some("high")), Priority::High);
    }

    #[test]
    fn test_stored_priority_is_read_leniently() {
        let read = |raw: &str| serde_json::from_str::<Priority>(raw).unwrap();
        assert_eq!(read("\"HIGH\""), Priority::High);
        assert_eq!(read("\"urgent\""), Priority::Medium);
        assert_eq!(read("null"), Priority::Medium);
    }

    #[test]
    fn test_new_reminder_is_open() {
        let reminder = Reminder::new("Pay rent", "2024-05-01 10:00", Priority::High);
        assert!(!reminder.completed);
        assert_eq!(reminder.priority, Priority::High);
    }

    #[test]
    fn test_reminder_uses_camel_case_due_date() {
        let reminder = Reminder::new("Call mom", "2024-05-01 10:00", Priority::Low);
        let json = serde_json::to_value(&reminder).unwrap_or_default();
        assert_eq!(json["dueDate"], "2024-05-01 10:00");
        assert_eq!(json["priority"], "low");
    }

    #[test]
    fn test_parse_schedule_formats() {
        let dt = parse_schedule("2024-05-01 10:00");
        assert_eq!(dt.map(|d| (d.day(), d.hour())), Some((1, 10)));

        let dt = parse_schedule("2024-05-01");
        assert_eq!(dt.map(|d| (d.month(), d.hour())), Some((5, 0)));

        let dt = parse_schedule("15/08/2024 09:30");
        assert_eq!(dt.map(|d| (d.day(), d.month(), d.minute())), Some((15, 8, 30)));

        assert!(parse_schedule("next tuesday").is_none());
    }
}
