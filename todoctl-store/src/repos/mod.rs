//! Autocommit repositories
//!
//! Each call opens a transaction on the store, runs its statements, and
//! commits. Commit is where deferred foreign-key violations surface, so a
//! successful return means the rows are durable and consistent.

pub mod labels;
pub mod todo_labels;
pub mod todos;

pub use labels::LabelRepo;
pub use todo_labels::TodoLabelRepo;
pub use todos::TodoRepo;
