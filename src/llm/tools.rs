//! Tool declarations offered to the model.

use crate::models::{Action, Category, Priority};
use serde_json::{Map, Value, json};

/// Parameter value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Text.
    String,
    /// Number.
    Number,
}

/// Schema flavour expected by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDialect {
    /// Standard JSON schema (`"type": "object"`), used by `OpenAI` and Anthropic.
    JsonSchema,
    /// Gemini's `OpenAPI` subset with upper-case type names.
    Gemini,
}

impl SchemaDialect {
    fn type_name(self, kind: &str) -> &'static str {
        match (self, kind) {
            (Self::Gemini, "object") => "OBJECT",
            (Self::Gemini, "number") => "NUMBER",
            (Self::Gemini, _) => "STRING",
            (Self::JsonSchema, "object") => "object",
            (Self::JsonSchema, "number") => "number",
            (Self::JsonSchema, _) => "string",
        }
    }
}

/// One named parameter of a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolParameter {
    /// Parameter name.
    pub name: &'static str,
    /// Value type.
    pub kind: ParamType,
    /// Description shown to the model.
    pub description: &'static str,
    /// Allowed values, if the parameter is an enumeration.
    pub allowed: Option<Vec<&'static str>>,
}

impl ToolParameter {
    const fn new(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            allowed: None,
        }
    }

    fn one_of(mut self, values: Vec<&'static str>) -> Self {
        self.allowed = Some(values);
        self
    }
}

/// A callable action declared to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDeclaration {
    /// Tool name, matching an [`Action`] wire name.
    pub name: &'static str,
    /// What the tool does.
    pub description: &'static str,
    /// Parameters in declaration order.
    pub parameters: Vec<ToolParameter>,
    /// Names of required parameters.
    pub required: Vec<&'static str>,
}

impl ToolDeclaration {
    /// Renders the parameter schema in the given dialect.
    #[must_use]
    pub fn parameters_schema(&self, dialect: SchemaDialect) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            let kind = match param.kind {
                ParamType::String => "string",
                ParamType::Number => "number",
            };
            let mut schema = json!({
                "type": dialect.type_name(kind),
                "description": param.description,
            });
            if let (Some(allowed), Some(obj)) = (&param.allowed, schema.as_object_mut()) {
                obj.insert("enum".to_string(), json!(allowed));
            }
            properties.insert(param.name.to_string(), schema);
        }
        json!({
            "type": dialect.type_name("object"),
            "properties": properties,
            "required": self.required,
        })
    }
}

/// Returns the tools the assistant offers to the model.
#[must_use]
pub fn assistant_tools() -> Vec<ToolDeclaration> {
    vec![
        ToolDeclaration {
            name: Action::ADD_REMINDER,
            description: "Adds a new reminder or task for the user.",
            parameters: vec![
                ToolParameter::new("title", ParamType::String, "Short title of the reminder"),
                ToolParameter::new(
                    "dueDate",
                    ParamType::String,
                    "Due date in YYYY-MM-DD HH:MM format",
                ),
                ToolParameter::new("priority", ParamType::String, "Urgency level")
                    .one_of(Priority::all().iter().map(Priority::as_str).collect()),
            ],
            required: vec!["title", "dueDate"],
        },
        ToolDeclaration {
            name: Action::ADD_EXPENSE,
            description: "Records a money expenditure.",
            parameters: vec![
                ToolParameter::new("amount", ParamType::Number, "Amount spent in INR"),
                ToolParameter::new(
                    "description",
                    ParamType::String,
                    "What was the money spent on?",
                ),
                ToolParameter::new("category", ParamType::String, "Expenditure category")
                    .one_of(Category::all().iter().map(Category::as_str).collect()),
            ],
            required: vec!["amount", "description"],
        },
        ToolDeclaration {
            name: Action::UPDATE_MEMORY,
            description: "Saves a personal fact about the user for future reference.",
            parameters: vec![ToolParameter::new(
                "fact",
                ParamType::String,
                "A snippet of information about the user",
            )],
            required: vec!["fact"],
        },
        ToolDeclaration {
            name: Action::ADD_DOCUMENT,
            description: "Tracks an important document and when it expires.",
            parameters: vec![
                ToolParameter::new(
                    "name",
                    ParamType::String,
                    "Document name, e.g. Passport or Car Insurance",
                ),
                ToolParameter::new(
                    "expiryDate",
                    ParamType::String,
                    "Expiry date in YYYY-MM-DD format",
                ),
                ToolParameter::new(
                    "type",
                    ParamType::String,
                    "Kind of document, e.g. ID, Insurance, Vehicle",
                ),
            ],
            required: vec!["name", "expiryDate"],
        },
    ]
}
