//! Labels and todo/label associations

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{bounded_text, ValidationError};

/// Maximum length for label names
const MAX_LABEL_NAME_LEN: usize = 255;

/// Label record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Label {
    pub id: i32,
    pub name: String,
}

impl Label {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Association row: todo `todo_id` carries label `label_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, FromRow)]
pub struct TodoLabel {
    pub todo_id: i32,
    pub label_id: i32,
}

/// Validated label name
///
/// Names are not unique; two labels may share one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LabelName(String);

impl LabelName {
    /// Create a new label name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 255 characters
    ///
    /// # Example
    /// ```
    /// use todoctl_store::models::LabelName;
    ///
    /// assert!(LabelName::new("urgent").is_ok());
    /// assert!(LabelName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text(s, "label name", MAX_LABEL_NAME_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for LabelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LabelName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<LabelName> for String {
    fn from(name: LabelName) -> Self {
        name.0
    }
}

/// Payload for inserting a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLabel {
    pub name: LabelName,
}

impl CreateLabel {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: LabelName::new(name)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(LabelName::new("  urgent ").unwrap().as_str(), "urgent");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            LabelName::new("").unwrap_err(),
            ValidationError::Empty { .. }
        ));
    }

    #[test]
    fn max_length() {
        assert!(LabelName::new(&"a".repeat(255)).is_ok());

        let err = LabelName::new(&"a".repeat(256)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 255, .. }));
    }

    #[test]
    fn payload_rejects_invalid_json_name() {
        let parsed: Result<CreateLabel, _> = serde_json::from_str(r#"{"name":""}"#);
        assert!(parsed.is_err());

        let parsed: CreateLabel = serde_json::from_str(r#"{"name":"home"}"#).unwrap();
        assert_eq!(parsed.name.as_str(), "home");
    }
}
