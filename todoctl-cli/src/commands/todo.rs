//! Todo commands - add, list, done, rm

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use todoctl_store::models::{CreateTodo, UpdateTodo};
use todoctl_store::repos::TodoRepo;

use super::Session;

#[derive(Parser, Debug)]
pub struct TodoArgs {
    #[command(subcommand)]
    pub command: TodoCommand,
}

#[derive(Subcommand, Debug)]
pub enum TodoCommand {
    /// Create a todo
    Add {
        /// Todo text, 1-288 characters
        text: String,
    },
    /// List todos, newest first
    List,
    /// Mark a todo completed (or open again with --undo)
    Done {
        /// Todo id
        id: i32,
        /// Mark the todo as not completed
        #[arg(long)]
        undo: bool,
    },
    /// Delete a todo; fails while labels are still attached
    Rm {
        /// Todo id
        id: i32,
    },
}

pub async fn run_todo(session: &Session, args: TodoArgs) -> Result<()> {
    let repo = TodoRepo::new(&session.store);

    match args.command {
        TodoCommand::Add { text } => {
            let todo = repo
                .create(CreateTodo::new(&text)?)
                .await
                .context("Failed to create todo")?;
            session.emit(&todo, |t| println!("{}\t{}", t.id, t.text))
        }
        TodoCommand::List => {
            let todos = repo.all().await.context("Failed to list todos")?;
            session.emit(&todos, |todos| {
                for t in todos {
                    let mark = if t.completed { "x" } else { " " };
                    println!("{}\t[{}] {}", t.id, mark, t.text);
                }
            })
        }
        TodoCommand::Done { id, undo } => {
            let todo = repo
                .update(id, UpdateTodo::completed(!undo))
                .await
                .with_context(|| format!("Failed to update todo {}", id))?;
            session.emit(&todo, |t| println!("{}\tcompleted={}", t.id, t.completed))
        }
        TodoCommand::Rm { id } => {
            repo.delete(id)
                .await
                .with_context(|| format!("Failed to delete todo {}", id))?;
            tracing::info!("Deleted todo {}", id);
            Ok(())
        }
    }
}
