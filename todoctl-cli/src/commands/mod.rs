//! Command implementations for the todoctl CLI

pub mod label;
pub mod migrate;
pub mod tag;
pub mod todo;

use anyhow::{Context, Result};
use serde::Serialize;
use todoctl_store::{PgStore, StoreConfig};

pub use label::run_label;
pub use migrate::run_migrate;
pub use tag::{run_labels_of, run_tag, run_untag};
pub use todo::run_todo;

/// Connection and output settings shared by every command
pub struct Session {
    pub store: PgStore,
    pub json: bool,
}

impl Session {
    pub async fn connect(config: &StoreConfig, json: bool) -> Result<Self> {
        let store = PgStore::connect(config)
            .await
            .context("Failed to create database pool")?;
        Ok(Self { store, json })
    }

    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        emit(self.json, value, human)
    }
}

/// Print `value` as JSON with `--json`, otherwise run the human formatter
pub fn emit<T: Serialize>(json: bool, value: &T, human: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human(value);
    }
    Ok(())
}
