//! todoctl CLI - maintenance tool for the todo label schema
//!
//! Applies the embedded migrations and performs the label operations the
//! schema supports:
//! - Schema migrations (`migrate`)
//! - Label create/list/delete (`label`)
//! - Todo create/list/complete/delete (`todo`)
//! - Tagging (`tag`, `untag`, `labels-of`)

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use commands::Session;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "todoctl",
    author,
    version,
    about = "Manage todo labels stored in PostgreSQL",
    long_about = "Apply the label schema and tag todos from the shell. The database URL \
                  comes from --database-url, DATABASE_URL, ./.env or ~/.todoctl/.env."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Database URL (falls back to .env files)
    #[arg(long, global = true, value_name = "URL", env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply pending schema migrations
    Migrate(commands::migrate::MigrateArgs),
    /// Create, list and delete labels
    Label(commands::label::LabelArgs),
    /// Create, list, complete and delete todos
    Todo(commands::todo::TodoArgs),
    /// Attach labels to a todo
    Tag(commands::tag::TagArgs),
    /// Detach a label from a todo (no-op when not attached)
    Untag(commands::tag::UntagArgs),
    /// Show the labels attached to a todo
    LabelsOf(commands::tag::LabelsOfArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_files = config::load_dotenv();
    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();
    config::log_sources(&env_files);

    let store_config = config::store_config(cli.database_url);

    // Listing migrations needs no connection
    if let Commands::Migrate(args) = &cli.command {
        if args.list {
            return commands::migrate::list_migrations(cli.json);
        }
    }

    let session = Session::connect(&store_config, cli.json).await?;
    match cli.command {
        Commands::Migrate(_) => commands::run_migrate(&session).await?,
        Commands::Label(args) => commands::run_label(&session, args).await?,
        Commands::Todo(args) => commands::run_todo(&session, args).await?,
        Commands::Tag(args) => commands::run_tag(&session, args).await?,
        Commands::Untag(args) => commands::run_untag(&session, args).await?,
        Commands::LabelsOf(args) => commands::run_labels_of(&session, args).await?,
    }
    Ok(())
}
