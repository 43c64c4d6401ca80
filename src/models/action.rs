//! Typed actions and their validation.
//!
//! The model returns loosely typed `{name, args}` pairs. [`Action::parse`]
//! turns each one into a strongly typed [`Action`] or an
//! [`ActionRejection`] explaining what was wrong. Direct user operations
//! build actions through the same constructors, so both paths share one set
//! of rules:
//!
//! | Action | Required | Optional (default) |
//! |--------|----------|--------------------|
//! | `add_reminder` | `title`, `dueDate` | `priority` (`medium`) |
//! | `add_expense` | `amount`, `description` | `category` (`Other`) |
//! | `update_memory` | `fact` | |
//! | `add_document` | `name`, `expiryDate` | `type` (`General`) |

use super::{Category, Document, EntityId, Priority};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A raw action call as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Action name.
    pub name: String,
    /// Argument object.
    #[serde(default)]
    pub args: Value,
}

impl ActionRequest {
    /// Creates a request from a name and an argument value.
    #[must_use]
    pub fn new(name: impl Into<String>, args: Value) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// A validated state mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Append a new open reminder.
    AddReminder {
        /// Reminder title.
        title: String,
        /// Due date text.
        due_date: String,
        /// Urgency.
        priority: Priority,
    },
    /// Record an expense at apply time.
    AddExpense {
        /// Non-negative amount.
        amount: f64,
        /// What it was for.
        description: String,
        /// Spending category.
        category: Category,
    },
    /// Append a key fact about the user.
    UpdateMemory {
        /// The fact, verbatim.
        fact: String,
    },
    /// Track a document.
    AddDocument {
        /// Document name.
        name: String,
        /// Expiry date text.
        expiry_date: String,
        /// Type tag.
        kind: String,
    },
    /// Flip the completion flag of a reminder.
    ToggleReminder {
        /// Target reminder.
        id: EntityId,
    },
    /// Remove a reminder.
    DeleteReminder {
        /// Target reminder.
        id: EntityId,
    },
}

impl Action {
    /// Wire name of the add-reminder action.
    pub const ADD_REMINDER: &'static str = "add_reminder";
    /// Wire name of the add-expense action.
    pub const ADD_EXPENSE: &'static str = "add_expense";
    /// Wire name of the update-memory action.
    pub const UPDATE_MEMORY: &'static str = "update_memory";
    /// Wire name of the add-document action.
    pub const ADD_DOCUMENT: &'static str = "add_document";
    /// Name of the toggle action (user-only).
    pub const TOGGLE_REMINDER: &'static str = "toggle_reminder_completion";
    /// Name of the delete action (user-only).
    pub const DELETE_REMINDER: &'static str = "delete_reminder";

    /// Returns the action's name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddReminder { .. } => Self::ADD_REMINDER,
            Self::AddExpense { .. } => Self::ADD_EXPENSE,
            Self::UpdateMemory { .. } => Self::UPDATE_MEMORY,
            Self::AddDocument { .. } => Self::ADD_DOCUMENT,
            Self::ToggleReminder { .. } => Self::TOGGLE_REMINDER,
            Self::DeleteReminder { .. } => Self::DELETE_REMINDER,
        }
    }

    /// Validates an add-reminder request.
    pub fn add_reminder(
        title: &str,
        due_date: &str,
        priority: Option<&str>,
    ) -> Result<Self, ActionRejection> {
        Ok(Self::AddReminder {
            title: require_text(Self::ADD_REMINDER, "title", Some(title))?,
            due_date: require_text(Self::ADD_REMINDER, "dueDate", Some(due_date))?,
            priority: Priority::parse_or_default(priority),
        })
    }

    /// Validates an add-expense request.
    pub fn add_expense(
        amount: f64,
        description: &str,
        category: Option<&str>,
    ) -> Result<Self, ActionRejection> {
        Ok(Self::AddExpense {
            amount: check_amount(Self::ADD_EXPENSE, amount)?,
            description: require_text(Self::ADD_EXPENSE, "description", Some(description))?,
            category: Category::parse_or_default(category),
        })
    }

    /// Validates an update-memory request.
    pub fn update_memory(fact: &str) -> Result<Self, ActionRejection> {
        Ok(Self::UpdateMemory {
            fact: require_text(Self::UPDATE_MEMORY, "fact", Some(fact))?,
        })
    }

    /// Validates an add-document request.
    pub fn add_document(
        name: &str,
        expiry_date: &str,
        kind: Option<&str>,
    ) -> Result<Self, ActionRejection> {
        Ok(Self::AddDocument {
            name: require_text(Self::ADD_DOCUMENT, "name", Some(name))?,
            expiry_date: require_text(Self::ADD_DOCUMENT, "expiryDate", Some(expiry_date))?,
            kind: kind
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .unwrap_or(Document::DEFAULT_KIND)
                .to_string(),
        })
    }

    /// Parses and validates a model-issued action request.
    ///
    /// Only actions declared to the model are accepted; completion toggles
    /// and deletions are reserved for the user.
    pub fn parse(request: &ActionRequest) -> Result<Self, ActionRejection> {
        let name = request.name.as_str();
        let empty = Map::new();
        let args = match &request.args {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => {
                return Err(ActionRejection::new(
                    name,
                    RejectionReason::InvalidField {
                        field: "args".to_string(),
                        detail: "expected an object".to_string(),
                    },
                ));
            },
        };

        match name {
            Self::ADD_REMINDER => {
                let title = text_arg(name, args, "title")?;
                let due_date = text_arg(name, args, "dueDate")?;
                Self::add_reminder(
                    title.as_deref().unwrap_or_default(),
                    due_date.as_deref().unwrap_or_default(),
                    optional_str(args, "priority"),
                )
            },
            Self::ADD_EXPENSE => {
                let amount = amount_arg(name, args)?;
                let description = text_arg(name, args, "description")?;
                Self::add_expense(
                    amount,
                    description.as_deref().unwrap_or_default(),
                    optional_str(args, "category"),
                )
            },
            Self::UPDATE_MEMORY => {
                let fact = text_arg(name, args, "fact")?;
                Self::update_memory(fact.as_deref().unwrap_or_default())
            },
            Self::ADD_DOCUMENT => {
                let doc_name = text_arg(name, args, "name")?;
                let expiry_date = text_arg(name, args, "expiryDate")?;
                Self::add_document(
                    doc_name.as_deref().unwrap_or_default(),
                    expiry_date.as_deref().unwrap_or_default(),
                    optional_str(args, "type"),
                )
            },
            _ => Err(ActionRejection::new(name, RejectionReason::UnknownAction)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddReminder {
                title,
                due_date,
                priority,
            } => write!(f, "reminder '{title}' due {due_date} ({priority})"),
            Self::AddExpense {
                amount,
                description,
                category,
            } => write!(f, "expense {amount:.2} for '{description}' ({category})"),
            Self::UpdateMemory { fact } => write!(f, "remembered '{fact}'"),
            Self::AddDocument {
                name,
                expiry_date,
                kind,
            } => write!(f, "document '{name}' expiring {expiry_date} ({kind})"),
            Self::ToggleReminder { id } => write!(f, "toggled reminder {id}"),
            Self::DeleteReminder { id } => write!(f, "deleted reminder {id}"),
        }
    }
}

/// Why an action was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// The action name is not one the assistant supports.
    UnknownAction,
    /// A required field is absent or blank.
    MissingField(String),
    /// A field is present but unusable.
    InvalidField {
        /// Field name.
        field: String,
        /// What was wrong.
        detail: String,
    },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAction => write!(f, "unknown action"),
            Self::MissingField(field) => write!(f, "missing required field '{field}'"),
            Self::InvalidField { field, detail } => write!(f, "invalid field '{field}': {detail}"),
        }
    }
}

/// An action that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{action}: {reason}")]
pub struct ActionRejection {
    /// Name of the rejected action.
    pub action: String,
    /// Why it was rejected.
    pub reason: RejectionReason,
}

impl ActionRejection {
    /// Creates a rejection.
    #[must_use]
    pub fn new(action: impl Into<String>, reason: RejectionReason) -> Self {
        Self {
            action: action.into(),
            reason,
        }
    }

    /// Creates a missing-field rejection.
    #[must_use]
    pub fn missing_field(action: impl Into<String>, field: &str) -> Self {
        Self::new(action, RejectionReason::MissingField(field.to_string()))
    }
}

fn require_text(
    action: &str,
    field: &str,
    value: Option<&str>,
) -> Result<String, ActionRejection> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(ActionRejection::missing_field(action, field)),
    }
}

fn check_amount(action: &str, amount: f64) -> Result<f64, ActionRejection> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(ActionRejection::new(
            action,
            RejectionReason::InvalidField {
                field: "amount".to_string(),
                detail: "must be a non-negative number".to_string(),
            },
        ))
    }
}

/// Reads a text argument. Numbers and booleans are accepted as their text
/// form; objects and arrays are invalid.
fn text_arg(
    action: &str,
    args: &Map<String, Value>,
    field: &str,
) -> Result<Option<String>, ActionRejection> {
    match args.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
        Some(_) => Err(ActionRejection::new(
            action,
            RejectionReason::InvalidField {
                field: field.to_string(),
                detail: "expected text".to_string(),
            },
        )),
    }
}

fn optional_str<'a>(args: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    args.get(field).and_then(Value::as_str)
}

fn amount_arg(action: &str, args: &Map<String, Value>) -> Result<f64, ActionRejection> {
    let invalid = || {
        ActionRejection::new(
            action,
            RejectionReason::InvalidField {
                field: "amount".to_string(),
                detail: "expected a number".to_string(),
            },
        )
    };
    match args.get("amount") {
        None | Some(Value::Null) => Err(ActionRejection::missing_field(action, "amount")),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(invalid),
        Some(Value::String(s)) => {
            let cleaned: String = s
                .trim()
                .trim_start_matches('₹')
                .chars()
                .filter(|c| *c != ',')
                .collect();
            cleaned.trim().parse::<f64>().map_err(|_| invalid())
        },
        Some(_) => Err(invalid()),
    }
}
