//! In-memory store with the same constraints as the PostgreSQL schema
//!
//! Transactions are serializable: `begin` takes the table lock and holds it
//! until commit or rollback, working on a private copy of the tables.
//! Primary keys are checked per statement, `todo_labels` foreign keys at
//! commit. Sequences live outside the lock and are never rolled back,
//! matching PostgreSQL's non-transactional sequences.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{StoreError, StoreResult};
use crate::models::{CreateLabel, CreateTodo, Label, Todo, TodoLabel, UpdateTodo};
use crate::schema::{
    LABELS_PKEY, TODOS_PKEY, TODO_LABELS_LABEL_FKEY, TODO_LABELS_PKEY, TODO_LABELS_TODO_FKEY,
};
use crate::store::{Store, Transaction};

#[derive(Debug, Clone, Default)]
struct Tables {
    todos: BTreeMap<i32, Todo>,
    labels: BTreeMap<i32, Label>,
    todo_labels: BTreeSet<TodoLabel>,
}

impl Tables {
    /// Deferred foreign-key checks, in association order
    fn check_foreign_keys(&self) -> StoreResult<()> {
        for assoc in &self.todo_labels {
            if !self.todos.contains_key(&assoc.todo_id) {
                return Err(StoreError::ForeignKeyViolation {
                    constraint: TODO_LABELS_TODO_FKEY.to_owned(),
                });
            }
            if !self.labels.contains_key(&assoc.label_id) {
                return Err(StoreError::ForeignKeyViolation {
                    constraint: TODO_LABELS_LABEL_FKEY.to_owned(),
                });
            }
        }
        Ok(())
    }
}

/// Serial sequence: `next` hands out 1, 2, 3, ...
#[derive(Debug, Default)]
struct Sequence(AtomicI32);

impl Sequence {
    fn next(&self) -> i32 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[derive(Debug, Default)]
struct Sequences {
    todos: Sequence,
    labels: Sequence,
}

/// Store holding all tables in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    sequences: Arc<Sequences>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> StoreResult<MemoryTx> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTx {
            guard,
            working,
            sequences: Arc::clone(&self.sequences),
            aborted: false,
        })
    }
}

/// Open in-memory transaction
pub struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
    sequences: Arc<Sequences>,
    aborted: bool,
}

impl MemoryTx {
    fn ensure_active(&self) -> StoreResult<()> {
        if self.aborted {
            return Err(StoreError::TransactionAborted);
        }
        Ok(())
    }

    fn track<T>(&mut self, result: StoreResult<T>) -> StoreResult<T> {
        if result.is_err() {
            self.aborted = true;
        }
        result
    }

    fn put_label(&mut self, label: Label) -> StoreResult<Label> {
        if self.working.labels.contains_key(&label.id) {
            return self.track(Err(StoreError::UniqueViolation {
                constraint: LABELS_PKEY.to_owned(),
            }));
        }
        self.working.labels.insert(label.id, label.clone());
        Ok(label)
    }

    fn put_todo(&mut self, todo: Todo) -> StoreResult<Todo> {
        if self.working.todos.contains_key(&todo.id) {
            return self.track(Err(StoreError::UniqueViolation {
                constraint: TODOS_PKEY.to_owned(),
            }));
        }
        self.working.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }
}

#[async_trait]
impl Transaction for MemoryTx {
    async fn reserve_label_id(&mut self) -> StoreResult<i32> {
        self.ensure_active()?;
        Ok(self.sequences.labels.next())
    }

    async fn insert_label(&mut self, payload: &CreateLabel) -> StoreResult<Label> {
        self.ensure_active()?;
        let id = self.sequences.labels.next();
        self.put_label(Label::new(id, payload.name.as_str()))
    }

    async fn insert_label_with_id(&mut self, id: i32, payload: &CreateLabel) -> StoreResult<Label> {
        self.ensure_active()?;
        self.put_label(Label::new(id, payload.name.as_str()))
    }

    async fn find_label(&mut self, id: i32) -> StoreResult<Option<Label>> {
        self.ensure_active()?;
        Ok(self.working.labels.get(&id).cloned())
    }

    async fn list_labels(&mut self) -> StoreResult<Vec<Label>> {
        self.ensure_active()?;
        Ok(self.working.labels.values().cloned().collect())
    }

    async fn delete_label(&mut self, id: i32) -> StoreResult<bool> {
        self.ensure_active()?;
        // No cascade: dangling associations fail the deferred check
        Ok(self.working.labels.remove(&id).is_some())
    }

    async fn reserve_todo_id(&mut self) -> StoreResult<i32> {
        self.ensure_active()?;
        Ok(self.sequences.todos.next())
    }

    async fn insert_todo(&mut self, payload: &CreateTodo) -> StoreResult<Todo> {
        self.ensure_active()?;
        let id = self.sequences.todos.next();
        self.put_todo(Todo::new(id, payload.text.as_str()))
    }

    async fn insert_todo_with_id(&mut self, id: i32, payload: &CreateTodo) -> StoreResult<Todo> {
        self.ensure_active()?;
        self.put_todo(Todo::new(id, payload.text.as_str()))
    }

    async fn find_todo(&mut self, id: i32) -> StoreResult<Option<Todo>> {
        self.ensure_active()?;
        Ok(self.working.todos.get(&id).cloned())
    }

    async fn list_todos(&mut self) -> StoreResult<Vec<Todo>> {
        self.ensure_active()?;
        Ok(self.working.todos.values().rev().cloned().collect())
    }

    async fn update_todo(&mut self, id: i32, update: &UpdateTodo) -> StoreResult<Option<Todo>> {
        self.ensure_active()?;
        Ok(self.working.todos.get_mut(&id).map(|todo| {
            update.apply(todo);
            todo.clone()
        }))
    }

    async fn delete_todo(&mut self, id: i32) -> StoreResult<bool> {
        self.ensure_active()?;
        Ok(self.working.todos.remove(&id).is_some())
    }

    async fn attach(&mut self, todo_id: i32, label_id: i32) -> StoreResult<TodoLabel> {
        self.ensure_active()?;
        let assoc = TodoLabel { todo_id, label_id };
        if !self.working.todo_labels.insert(assoc) {
            return self.track(Err(StoreError::UniqueViolation {
                constraint: TODO_LABELS_PKEY.to_owned(),
            }));
        }
        Ok(assoc)
    }

    async fn detach(&mut self, todo_id: i32, label_id: i32) -> StoreResult<bool> {
        self.ensure_active()?;
        Ok(self
            .working
            .todo_labels
            .remove(&TodoLabel { todo_id, label_id }))
    }

    async fn clear_labels(&mut self, todo_id: i32) -> StoreResult<u64> {
        self.ensure_active()?;
        let before = self.working.todo_labels.len();
        self.working.todo_labels.retain(|a| a.todo_id != todo_id);
        Ok((before - self.working.todo_labels.len()) as u64)
    }

    async fn labels_for_todo(&mut self, todo_id: i32) -> StoreResult<Vec<Label>> {
        self.ensure_active()?;
        let tables = &self.working;
        let mut labels: Vec<Label> = tables
            .todo_labels
            .iter()
            .filter(|a| a.todo_id == todo_id)
            .filter_map(|a| tables.labels.get(&a.label_id).cloned())
            .collect();
        labels.sort_by_key(|l| l.id);
        Ok(labels)
    }

    async fn todo_ids_for_label(&mut self, label_id: i32) -> StoreResult<Vec<i32>> {
        self.ensure_active()?;
        let mut ids: Vec<i32> = self
            .working
            .todo_labels
            .iter()
            .filter(|a| a.label_id == label_id)
            .map(|a| a.todo_id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn check_deferred(&mut self) -> StoreResult<()> {
        self.ensure_active()?;
        let result = self.working.check_foreign_keys();
        self.track(result)
    }

    async fn commit(mut self) -> StoreResult<()> {
        self.ensure_active()?;
        self.working.check_foreign_keys()?;
        *self.guard = self.working;
        Ok(())
    }

    async fn rollback(self) -> StoreResult<()> {
        Ok(())
    }
}
