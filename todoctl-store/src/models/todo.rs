//! Todo rows
//!
//! The todos table belongs to the wider application; these types cover the
//! columns the label schema depends on.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{bounded_text, ValidationError};

/// Maximum length for todo text
const MAX_TODO_TEXT_LEN: usize = 288;

/// Todo record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: i32,
    pub text: String,
    pub completed: bool,
}

impl Todo {
    pub fn new(id: i32, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }
}

/// Validated todo text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoText(String);

impl TodoText {
    /// Create todo text: non-empty after trimming, max 288 characters.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text(s, "todo text", MAX_TODO_TEXT_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TodoText {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<TodoText> for String {
    fn from(text: TodoText) -> Self {
        text.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodo {
    pub text: TodoText,
}

impl CreateTodo {
    pub fn new(text: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            text: TodoText::new(text)?,
        })
    }
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodo {
    pub text: Option<TodoText>,
    pub completed: Option<bool>,
}

impl UpdateTodo {
    pub fn completed(completed: bool) -> Self {
        Self {
            text: None,
            completed: Some(completed),
        }
    }

    pub fn apply(&self, todo: &mut Todo) {
        if let Some(text) = &self.text {
            todo.text = text.as_str().to_owned();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_length() {
        assert!(TodoText::new(&"x".repeat(288)).is_ok());
        assert!(matches!(
            TodoText::new(&"x".repeat(289)).unwrap_err(),
            ValidationError::TooLong { max: 288, .. }
        ));
    }

    #[test]
    fn update_keeps_unset_fields() {
        let mut todo = Todo::new(1, "write tests");
        UpdateTodo::completed(true).apply(&mut todo);
        assert_eq!(todo.text, "write tests");
        assert!(todo.completed);

        let update = UpdateTodo {
            text: Some(TodoText::new("ship it").unwrap()),
            completed: None,
        };
        update.apply(&mut todo);
        assert_eq!(todo.text, "ship it");
        assert!(todo.completed);
    }
}
