//! todoctl-store: label storage for the todo list
//!
//! Owns the `labels` and `todo_labels` tables: embedded migrations, row
//! models, and two engines behind the [`Store`] trait. [`PgStore`] runs on
//! PostgreSQL; [`MemoryStore`] enforces the same keys in process, including
//! the commit-time checks of the deferred foreign keys.

pub mod db;
pub mod error;
pub mod memory;
pub mod models;
pub mod repos;
pub mod schema;
pub mod store;

pub use db::{PgStore, PgTx};
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryStore, MemoryTx};
pub use schema::{migrate, MIGRATOR};
pub use store::{Store, Transaction};

/// Pool size when `TODOCTL_MAX_CONNECTIONS` is unset; kept low for
/// single-user tooling.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl StoreConfig {
    /// Read `DATABASE_URL` and `TODOCTL_MAX_CONNECTIONS`, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: std::env::var("TODOCTL_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_connections),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/todoctl".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}
