//! Row models and validated payloads
//!
//! Rows mirror the tables column for column. Payload fields are validated
//! at construction; invalid input returns ValidationError, not panic.

pub mod label;
pub mod todo;
pub mod validation;

pub use label::{CreateLabel, Label, LabelName, TodoLabel};
pub use todo::{CreateTodo, Todo, TodoText, UpdateTodo};
pub use validation::ValidationError;
