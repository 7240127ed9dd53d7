//! Store and transaction traits
//!
//! Every operation runs inside a [`Transaction`]. Primary-key checks fire at
//! the statement; foreign-key checks on `todo_labels` fire at commit (or at
//! [`Transaction::check_deferred`]). A statement error aborts the transaction:
//! later statements and `commit` return [`StoreError::TransactionAborted`].
//! Dropping a transaction without committing rolls it back.
//!
//! [`StoreError::TransactionAborted`]: crate::StoreError::TransactionAborted

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{CreateLabel, CreateTodo, Label, Todo, TodoLabel, UpdateTodo};

/// A storage engine that can open transactions
#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    type Tx: Transaction;

    async fn begin(&self) -> StoreResult<Self::Tx>;
}

/// A unit of work against the todo/label tables
#[async_trait]
pub trait Transaction: Send + Sized {
    /// Take the next value of the labels id sequence without inserting.
    /// Sequence values are never handed out twice, even after rollback.
    async fn reserve_label_id(&mut self) -> StoreResult<i32>;
    async fn insert_label(&mut self, payload: &CreateLabel) -> StoreResult<Label>;
    async fn insert_label_with_id(&mut self, id: i32, payload: &CreateLabel) -> StoreResult<Label>;
    async fn find_label(&mut self, id: i32) -> StoreResult<Option<Label>>;
    /// All labels, ordered by id
    async fn list_labels(&mut self) -> StoreResult<Vec<Label>>;
    /// Returns false when no row had this id
    async fn delete_label(&mut self, id: i32) -> StoreResult<bool>;

    async fn reserve_todo_id(&mut self) -> StoreResult<i32>;
    async fn insert_todo(&mut self, payload: &CreateTodo) -> StoreResult<Todo>;
    async fn insert_todo_with_id(&mut self, id: i32, payload: &CreateTodo) -> StoreResult<Todo>;
    async fn find_todo(&mut self, id: i32) -> StoreResult<Option<Todo>>;
    /// All todos, newest (highest id) first
    async fn list_todos(&mut self) -> StoreResult<Vec<Todo>>;
    async fn update_todo(&mut self, id: i32, update: &UpdateTodo) -> StoreResult<Option<Todo>>;
    async fn delete_todo(&mut self, id: i32) -> StoreResult<bool>;

    async fn attach(&mut self, todo_id: i32, label_id: i32) -> StoreResult<TodoLabel>;
    /// Returns false when the pair was not associated
    async fn detach(&mut self, todo_id: i32, label_id: i32) -> StoreResult<bool>;
    /// Remove every association of a todo, returning how many were removed
    async fn clear_labels(&mut self, todo_id: i32) -> StoreResult<u64>;
    /// Existing labels associated with a todo, ordered by id
    async fn labels_for_todo(&mut self, todo_id: i32) -> StoreResult<Vec<Label>>;
    async fn todo_ids_for_label(&mut self, label_id: i32) -> StoreResult<Vec<i32>>;

    /// Run the pending deferred foreign-key checks now.
    async fn check_deferred(&mut self) -> StoreResult<()>;
    async fn commit(self) -> StoreResult<()>;
    async fn rollback(self) -> StoreResult<()>;
}
