//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use todoctl_store::schema;

use super::{emit, Session};

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// List the embedded migrations without connecting to the database
    #[arg(long)]
    pub list: bool,
}

pub fn list_migrations(json: bool) -> Result<()> {
    let migrations: Vec<_> = schema::embedded()
        .into_iter()
        .map(|(version, description)| json!({ "version": version, "description": description }))
        .collect();
    emit(json, &migrations, |_| {
        for (version, description) in schema::embedded() {
            println!("{:04}  {}", version, description);
        }
    })
}

pub async fn run_migrate(session: &Session) -> Result<()> {
    schema::migrate(session.store.pool())
        .await
        .context("Failed to apply migrations")?;
    tracing::info!("Schema is up to date");
    Ok(())
}
