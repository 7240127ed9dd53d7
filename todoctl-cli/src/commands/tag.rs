//! Tagging commands - tag, untag, labels-of

use anyhow::{Context, Result};
use clap::Parser;
use todoctl_store::repos::TodoLabelRepo;

use super::Session;

#[derive(Parser, Debug)]
pub struct TagArgs {
    /// Todo id
    pub todo_id: i32,

    /// Label ids to attach
    #[arg(required = true)]
    pub label_ids: Vec<i32>,

    /// Replace the todo's labels with exactly these
    #[arg(long)]
    pub replace: bool,
}

#[derive(Parser, Debug)]
pub struct UntagArgs {
    /// Todo id
    pub todo_id: i32,

    /// Label id to detach
    pub label_id: i32,
}

#[derive(Parser, Debug)]
pub struct LabelsOfArgs {
    /// Todo id
    pub todo_id: i32,
}

pub async fn run_tag(session: &Session, args: TagArgs) -> Result<()> {
    let repo = TodoLabelRepo::new(&session.store);

    if args.replace {
        let labels = repo
            .set_labels(args.todo_id, &args.label_ids)
            .await
            .with_context(|| format!("Failed to set labels of todo {}", args.todo_id))?;
        return session.emit(&labels, |labels| {
            for l in labels {
                println!("{}\t{}", l.id, l.name);
            }
        });
    }

    let attached = repo
        .attach_many(args.todo_id, &args.label_ids)
        .await
        .with_context(|| format!("Failed to tag todo {}", args.todo_id))?;
    session.emit(&attached, |attached| {
        for a in attached {
            println!("{}\t{}", a.todo_id, a.label_id);
        }
    })
}

pub async fn run_untag(session: &Session, args: UntagArgs) -> Result<()> {
    let removed = TodoLabelRepo::new(&session.store)
        .detach(args.todo_id, args.label_id)
        .await
        .context("Failed to untag")?;
    if !removed {
        tracing::info!(
            "Todo {} was not tagged with label {}",
            args.todo_id,
            args.label_id
        );
    }
    Ok(())
}

pub async fn run_labels_of(session: &Session, args: LabelsOfArgs) -> Result<()> {
    let labels = TodoLabelRepo::new(&session.store)
        .labels_for_todo(args.todo_id)
        .await
        .context("Failed to list labels")?;
    session.emit(&labels, |labels| {
        for l in labels {
            println!("{}\t{}", l.id, l.name);
        }
    })
}
