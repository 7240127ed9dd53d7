//! Todo repository
//!
//! The todos table is the external referent of `todo_labels.todo_id`.

use crate::error::{StoreError, StoreResult};
use crate::models::{CreateTodo, Todo, UpdateTodo};
use crate::store::{Store, Transaction};

/// Todo repository
pub struct TodoRepo<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> TodoRepo<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn create(&self, payload: CreateTodo) -> StoreResult<Todo> {
        let mut tx = self.store.begin().await?;
        let todo = tx.insert_todo(&payload).await?;
        tx.commit().await?;

        tracing::debug!("todo result {:?}", todo);
        Ok(todo)
    }

    pub async fn find(&self, id: i32) -> StoreResult<Todo> {
        let mut tx = self.store.begin().await?;
        let todo = tx.find_todo(id).await?;
        tx.commit().await?;
        todo.ok_or_else(|| StoreError::not_found("todo", id))
    }

    /// All todos, newest first
    pub async fn all(&self) -> StoreResult<Vec<Todo>> {
        let mut tx = self.store.begin().await?;
        let todos = tx.list_todos().await?;
        tx.commit().await?;
        Ok(todos)
    }

    pub async fn update(&self, id: i32, update: UpdateTodo) -> StoreResult<Todo> {
        let mut tx = self.store.begin().await?;
        let todo = tx
            .update_todo(id, &update)
            .await?
            .ok_or_else(|| StoreError::not_found("todo", id))?;
        tx.commit().await?;
        Ok(todo)
    }

    /// Delete a todo; rejected at commit while labels are still attached.
    pub async fn delete(&self, id: i32) -> StoreResult<()> {
        let mut tx = self.store.begin().await?;
        if !tx.delete_todo(id).await? {
            return Err(StoreError::not_found("todo", id));
        }
        tx.commit().await?;
        Ok(())
    }
}
