//! Label commands - add, list, rm

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use todoctl_store::models::CreateLabel;
use todoctl_store::repos::LabelRepo;

use super::Session;

#[derive(Parser, Debug)]
pub struct LabelArgs {
    #[command(subcommand)]
    pub command: LabelCommand,
}

#[derive(Subcommand, Debug)]
pub enum LabelCommand {
    /// Create a label (names need not be unique)
    Add {
        /// Label name, 1-255 characters
        name: String,
    },
    /// List all labels
    List,
    /// Delete a label; fails while any todo still carries it
    Rm {
        /// Label id
        id: i32,
    },
}

pub async fn run_label(session: &Session, args: LabelArgs) -> Result<()> {
    let repo = LabelRepo::new(&session.store);

    match args.command {
        LabelCommand::Add { name } => {
            let payload = CreateLabel::new(&name)?;
            let label = repo.create(payload).await.context("Failed to create label")?;
            session.emit(&label, |l| println!("{}\t{}", l.id, l.name))
        }
        LabelCommand::List => {
            let labels = repo.all().await.context("Failed to list labels")?;
            session.emit(&labels, |labels| {
                for l in labels {
                    println!("{}\t{}", l.id, l.name);
                }
            })
        }
        LabelCommand::Rm { id } => {
            repo.delete(id)
                .await
                .with_context(|| format!("Failed to delete label {}", id))?;
            tracing::info!("Deleted label {}", id);
            Ok(())
        }
    }
}
