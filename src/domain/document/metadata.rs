//! Descriptive metadata attached to each version: tags and variables.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::value_objects::bounded_text;
use crate::domain::foundation::ValidationError;

pub const MAX_TAG_LEN: usize = 50;
pub const MAX_CATEGORY_LEN: usize = 50;
pub const MAX_VARIABLE_LABEL_LEN: usize = 100;

static VARIABLE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid variable name pattern"));

// ════════════════════════════════════════════════════════════════════════════════
// Tags
// ════════════════════════════════════════════════════════════════════════════════

/// Grouping prefix of a tag, e.g. `team` in `team:sre`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        bounded_text("category", raw, MAX_CATEGORY_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A free-form label, optionally qualified by a category.
///
/// The textual form is `name` or `category:name`; both parts are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag {
    category: Option<Category>,
    name: String,
}

impl Tag {
    /// Parses a tag from its textual form.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.split_once(':') {
            Some((category, name)) => Ok(Self {
                category: Some(Category::new(category)?),
                name: bounded_text("tag", name, MAX_TAG_LEN)?,
            }),
            None => Ok(Self {
                category: None,
                name: bounded_text("tag", raw, MAX_TAG_LEN)?,
            }),
        }
    }

    /// Restores a stored tag, splitting it like `parse` but without limits.
    pub(crate) fn from_stored(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((category, name)) => Self {
                category: Some(Category(category.to_string())),
                name: name.to_string(),
            },
            None => Self {
                category: None,
                name: raw.to_string(),
            },
        }
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.category {
            Some(category) => write!(f, "{}:{}", category.as_str(), self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl TryFrom<String> for Tag {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.to_string()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Variables
// ════════════════════════════════════════════════════════════════════════════════

/// Value type a runbook variable accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableType {
    String,
    Number,
    Boolean,
    Date,
}

impl VariableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::String => "string",
            VariableType::Number => "number",
            VariableType::Boolean => "boolean",
            VariableType::Date => "date",
        }
    }
}

impl FromStr for VariableType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "string" => Ok(VariableType::String),
            "number" => Ok(VariableType::Number),
            "boolean" => Ok(VariableType::Boolean),
            "date" => Ok(VariableType::Date),
            other => Err(ValidationError::invalid_format(
                "type",
                format!("unknown variable type '{}'", other),
            )),
        }
    }
}

/// A placeholder an operator fills in when executing a runbook.
///
/// Deserialization goes through [`VariableDefinition::new`], so JSON input is
/// held to the same rules as the constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VariableRecord")]
pub struct VariableDefinition {
    name: String,
    label: String,
    #[serde(rename = "type")]
    var_type: VariableType,
    required: bool,
    default_value: Option<serde_json::Value>,
}

impl VariableDefinition {
    /// Creates a variable definition.
    ///
    /// Checks name, then label, then type; the first failure is returned.
    pub fn new(
        name: &str,
        label: &str,
        var_type: &str,
        required: bool,
        default_value: Option<serde_json::Value>,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if !VARIABLE_NAME_PATTERN.is_match(name) {
            return Err(ValidationError::invalid_format(
                "name",
                "must start with a letter and contain only letters, digits or '_'",
            ));
        }
        let label = bounded_text("label", label, MAX_VARIABLE_LABEL_LEN)?;
        let var_type = var_type.parse::<VariableType>()?;

        Ok(Self {
            name: name.to_string(),
            label,
            var_type,
            required,
            default_value,
        })
    }

    /// Restores a definition written by a repository without re-validating it.
    pub(crate) fn from_stored(record: VariableRecord) -> Self {
        Self {
            name: record.name,
            label: record.label,
            var_type: record.var_type,
            required: record.required,
            default_value: record.default_value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn var_type(&self) -> VariableType {
        self.var_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&serde_json::Value> {
        self.default_value.as_ref()
    }
}

/// Serialized shape of a [`VariableDefinition`].
#[derive(Debug, Clone, Deserialize)]
pub struct VariableRecord {
    name: String,
    label: String,
    #[serde(rename = "type")]
    var_type: VariableType,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    default_value: Option<serde_json::Value>,
}

impl TryFrom<VariableRecord> for VariableDefinition {
    type Error = ValidationError;

    fn try_from(record: VariableRecord) -> Result<Self, Self::Error> {
        Self::new(
            &record.name,
            &record.label,
            record.var_type.as_str(),
            record.required,
            record.default_value,
        )
    }
}
