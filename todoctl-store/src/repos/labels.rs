//! Label repository

use crate::error::{StoreError, StoreResult};
use crate::models::{CreateLabel, Label};
use crate::store::{Store, Transaction};

/// Label repository
pub struct LabelRepo<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> LabelRepo<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Insert a label; the engine assigns the id.
    ///
    /// Duplicate names are accepted.
    pub async fn create(&self, payload: CreateLabel) -> StoreResult<Label> {
        let mut tx = self.store.begin().await?;
        let label = tx.insert_label(&payload).await?;
        tx.commit().await?;

        tracing::debug!(id = label.id, name = %label.name, "label created");
        Ok(label)
    }

    pub async fn find(&self, id: i32) -> StoreResult<Label> {
        let mut tx = self.store.begin().await?;
        let label = tx.find_label(id).await?;
        tx.commit().await?;
        label.ok_or_else(|| StoreError::not_found("label", id))
    }

    pub async fn all(&self) -> StoreResult<Vec<Label>> {
        let mut tx = self.store.begin().await?;
        let labels = tx.list_labels().await?;
        tx.commit().await?;
        Ok(labels)
    }

    /// Delete a label.
    ///
    /// Fails with a foreign-key violation at commit while any todo still
    /// carries the label; there is no cascade.
    pub async fn delete(&self, id: i32) -> StoreResult<()> {
        let mut tx = self.store.begin().await?;
        if !tx.delete_label(id).await? {
            return Err(StoreError::not_found("label", id));
        }
        tx.commit().await?;

        tracing::debug!(id, "label deleted");
        Ok(())
    }
}
