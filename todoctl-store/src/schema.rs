//! Schema migrations and constraint names
//!
//! The SQL lives in `migrations/` at the workspace root and is embedded at
//! compile time. Constraint names are PostgreSQL's defaults for the declared
//! keys; the in-memory store reports the same names.

use sqlx::PgPool;

use crate::error::StoreResult;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../migrations");

pub const TODOS_PKEY: &str = "todos_pkey";
pub const LABELS_PKEY: &str = "labels_pkey";
pub const TODO_LABELS_PKEY: &str = "todo_labels_pkey";
pub const TODO_LABELS_TODO_FKEY: &str = "todo_labels_todo_id_fkey";
pub const TODO_LABELS_LABEL_FKEY: &str = "todo_labels_label_id_fkey";

/// Apply all pending migrations
pub async fn migrate(pool: &PgPool) -> StoreResult<()> {
    tracing::info!("Running label schema migrations...");
    MIGRATOR.run(pool).await?;
    tracing::info!("Label schema migrations complete");
    Ok(())
}

/// Versions and descriptions of the embedded migrations, in apply order
pub fn embedded() -> Vec<(i64, String)> {
    MIGRATOR
        .iter()
        .map(|m| (m.version, m.description.to_string()))
        .collect()
}
