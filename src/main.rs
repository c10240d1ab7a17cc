use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{
    BackupCommand, ExportCommand, ImportCommand, NoteCommand, RenderCommand, SyncCommand,
    TaskCommand,
};
use sidepad::{Config, FileKeyValue, StateStore};

#[derive(Parser)]
#[command(name = "sidepad")]
#[command(version)]
#[command(about = "Sidebar scratchpad: notes, tasks, backups, and sync", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the freeform note text
    Note(NoteCommand),

    /// Manage the task list
    Task(TaskCommand),

    /// Convert the stored note (or a file) to structured markup
    Render(RenderCommand),

    /// Snapshot the scratchpad to the backup directory
    Backup(BackupCommand),

    /// Sync with the remote document service
    Sync(SyncCommand),

    /// Export notes and tasks to a snapshot file
    Export(ExportCommand),

    /// Replace notes and tasks from a snapshot file
    Import(ImportCommand),

    /// Reset note and task list in one step
    Clear,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sidepad=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;
    let kv = FileKeyValue::new(config.state_path());
    let store = Arc::new(StateStore::open(kv.clone())?);

    match cli.command {
        Some(Commands::Note(cmd)) => cmd.run(&store)?,
        Some(Commands::Task(cmd)) => cmd.run(&store)?,
        Some(Commands::Render(cmd)) => cmd.run(&store)?,
        Some(Commands::Backup(cmd)) => cmd.run(store.clone(), &config).await?,
        Some(Commands::Sync(cmd)) => cmd.run(store.clone(), kv, &config).await?,
        Some(Commands::Export(cmd)) => cmd.run(&store)?,
        Some(Commands::Import(cmd)) => cmd.run(&store)?,
        Some(Commands::Clear) => {
            store.clear_all()?;
            println!("Cleared notes and tasks.");
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
