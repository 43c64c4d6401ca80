//! Expenses and spending categories.

use super::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Fixed set of spending categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Category {
    /// Meals, groceries, eating out.
    Food,
    /// Fuel, fares, rides.
    Transport,
    /// Rent, utilities, subscriptions.
    Bills,
    /// Purchases.
    Shopping,
    /// Medicine, doctors, fitness.
    Health,
    /// Movies, events, hobbies.
    Entertainment,
    /// Anything else.
    #[default]
    Other,
}

impl Category {
    /// Returns all category variants in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Food,
            Self::Transport,
            Self::Bills,
            Self::Shopping,
            Self::Health,
            Self::Entertainment,
            Self::Other,
        ]
    }

    /// Returns the category name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Bills => "Bills",
            Self::Shopping => "Shopping",
            Self::Health => "Health",
            Self::Entertainment => "Entertainment",
            Self::Other => "Other",
        }
    }

    /// Parses a category name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
    }

    /// Parses an optional category, falling back to [`Category::Other`].
    #[must_use]
    pub fn parse_or_default(s: Option<&str>) -> Self {
        s.and_then(Self::parse).unwrap_or_default()
    }
}

/// Reads stored values leniently: any case is accepted, and unknown or
/// null values become [`Category::Other`] instead of failing the whole snapshot.
impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::parse_or_default(raw.as_deref()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded money expenditure.
///
/// Expenses are immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier.
    pub id: EntityId,
    /// Amount spent. Currency-agnostic; the assistant presents it as INR.
    pub amount: f64,
    /// Spending category.
    #[serde(default)]
    pub category: Category,
    /// What the money was spent on.
    pub description: String,
    /// When the expense was recorded.
    pub date: DateTime<Utc>,
}

impl Expense {
    /// Creates an expense recorded at `recorded_at` with a fresh identifier.
    #[must_use]
    pub fn new(
        amount: f64,
        description: impl Into<String>,
        category: Category,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntityId::generate(),
            amount,
            category,
            description: description.into(),
            date: recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("food", Some(Category::Food) ; "lowercase")]
    #[test_case("BILLS", Some(Category::Bills) ; "uppercase")]
    #[test_case(" Entertainment ", Some(Category::Entertainment) ; "padded")]
    #[test_case("Groceries", None ; "unknown")]
    fn test_category_parse(input: &str, expected: Option<Category>) {
        assert_eq!(Category::parse(input), expected);
    }

    #[test]
    fn test_category_defaults_to_other() {
        assert_eq!(Category::parse_or_default(None), Category::Other);
        assert_eq!(Category::parse_or_default(Some("misc")), Category::Other);
    }

    #[test]
    fn test_stored_category_is_read_leniently() {
        let read = |raw: &str| serde_json::from_str::<Category>(raw).unwrap();
        assert_eq!(read("\"food\""), Category::Food);
        assert_eq!(read("\"Groceries\""), Category::Other);
        assert_eq!(read("\"Transport\""), Category::Transport);
    }

    #[test]
    fn test_category_serializes_as_display_name() {
        let json = serde_json::to_string(&Category::Transport).unwrap_or_default();
        assert_eq!(json, "\"Transport\"");
    }
}
