//! Todo/label association repository

use std::collections::BTreeSet;

use crate::error::StoreResult;
use crate::models::{Label, TodoLabel};
use crate::store::{Store, Transaction};

/// Association repository
pub struct TodoLabelRepo<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> TodoLabelRepo<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Tag a todo with a label.
    ///
    /// A pair that is already tagged fails with a primary-key violation; a
    /// missing todo or label fails with a foreign-key violation at commit.
    pub async fn attach(&self, todo_id: i32, label_id: i32) -> StoreResult<TodoLabel> {
        let mut tx = self.store.begin().await?;
        let assoc = tx.attach(todo_id, label_id).await?;
        tx.commit().await?;

        tracing::debug!(todo_id, label_id, "label attached");
        Ok(assoc)
    }

    /// Tag a todo with several labels in one transaction.
    ///
    /// Any failure (a missing referent at commit, a pair already tagged, an
    /// id repeated in `label_ids`) leaves none of the pairs behind.
    pub async fn attach_many(
        &self,
        todo_id: i32,
        label_ids: &[i32],
    ) -> StoreResult<Vec<TodoLabel>> {
        let mut tx = self.store.begin().await?;
        let mut attached = Vec::with_capacity(label_ids.len());
        for label_id in label_ids {
            attached.push(tx.attach(todo_id, *label_id).await?);
        }
        tx.commit().await?;

        tracing::debug!(todo_id, attached = attached.len(), "labels attached");
        Ok(attached)
    }

    /// Untag a todo. Removing a pair that is not tagged is a no-op; the
    /// return value says whether a row was removed.
    pub async fn detach(&self, todo_id: i32, label_id: i32) -> StoreResult<bool> {
        let mut tx = self.store.begin().await?;
        let removed = tx.detach(todo_id, label_id).await?;
        tx.commit().await?;

        tracing::debug!(todo_id, label_id, removed, "label detached");
        Ok(removed)
    }

    pub async fn labels_for_todo(&self, todo_id: i32) -> StoreResult<Vec<Label>> {
        let mut tx = self.store.begin().await?;
        let labels = tx.labels_for_todo(todo_id).await?;
        tx.commit().await?;
        Ok(labels)
    }

    pub async fn todos_for_label(&self, label_id: i32) -> StoreResult<Vec<i32>> {
        let mut tx = self.store.begin().await?;
        let ids = tx.todo_ids_for_label(label_id).await?;
        tx.commit().await?;
        Ok(ids)
    }

    /// Replace a todo's label set in one transaction.
    ///
    /// Repeated ids are collapsed. Every id is checked at commit, so one
    /// missing label leaves the previous set untouched.
    pub async fn set_labels(&self, todo_id: i32, label_ids: &[i32]) -> StoreResult<Vec<Label>> {
        let wanted: BTreeSet<i32> = label_ids.iter().copied().collect();

        let mut tx = self.store.begin().await?;
        let cleared = tx.clear_labels(todo_id).await?;
        for label_id in &wanted {
            tx.attach(todo_id, *label_id).await?;
        }
        let labels = tx.labels_for_todo(todo_id).await?;
        tx.commit().await?;

        tracing::debug!(todo_id, cleared, attached = wanted.len(), "labels replaced");
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::models::{CreateLabel, CreateTodo};
    use crate::repos::{LabelRepo, TodoRepo};

    async fn seed(store: &MemoryStore) -> (i32, Vec<i32>) {
        let todo = TodoRepo::new(store)
            .create(CreateTodo::new("buy milk").unwrap())
            .await
            .unwrap();
        let labels = LabelRepo::new(store);
        let mut ids = Vec::new();
        for name in ["home", "errand", "urgent"] {
            ids.push(labels.create(CreateLabel::new(name).unwrap()).await.unwrap().id);
        }
        (todo.id, ids)
    }

    #[tokio::test]
    async fn attach_many_tags_every_label() {
        let store = MemoryStore::new();
        let (todo_id, ids) = seed(&store).await;
        let repo = TodoLabelRepo::new(&store);

        let attached = repo.attach_many(todo_id, &[ids[2], ids[0]]).await.unwrap();
        assert_eq!(attached.len(), 2);
        let names: Vec<_> = repo
            .labels_for_todo(todo_id)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, ["home", "urgent"]);
    }

    #[tokio::test]
    async fn attach_many_with_missing_label_attaches_nothing() {
        let store = MemoryStore::new();
        let (todo_id, ids) = seed(&store).await;
        let repo = TodoLabelRepo::new(&store);

        let err = repo.attach_many(todo_id, &[ids[0], 999]).await.unwrap_err();
        assert!(err.is_foreign_key_violation());
        assert!(repo.labels_for_todo(todo_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn attach_many_with_repeated_label_attaches_nothing() {
        let store = MemoryStore::new();
        let (todo_id, ids) = seed(&store).await;
        let repo = TodoLabelRepo::new(&store);

        let err = repo
            .attach_many(todo_id, &[ids[0], ids[1], ids[1]])
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
        assert!(repo.labels_for_todo(todo_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn todos_for_label_lists_tagged_todos() {
        let store = MemoryStore::new();
        let (todo_id, ids) = seed(&store).await;
        let other = TodoRepo::new(&store)
            .create(CreateTodo::new("call mom").unwrap())
            .await
            .unwrap();
        let repo = TodoLabelRepo::new(&store);

        repo.attach(other.id, ids[0]).await.unwrap();
        repo.attach(todo_id, ids[0]).await.unwrap();
        assert_eq!(repo.todos_for_label(ids[0]).await.unwrap(), vec![todo_id, other.id]);
        assert!(repo.todos_for_label(ids[1]).await.unwrap().is_empty());
    }
}
