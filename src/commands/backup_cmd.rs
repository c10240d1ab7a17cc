//! Backup commands: one-shot snapshot, list, and the repeating timer.

use std::error::Error;
use std::sync::Arc;

use clap::{Args, Subcommand};

use sidepad::backup::list_backup_files;
use sidepad::{BackupScheduler, Config, FileKeyValue, StateStore};

/// Snapshot the scratchpad to the backup directory
#[derive(Debug, Args)]
pub struct BackupCommand {
    #[command(subcommand)]
    command: Option<BackupSubcommand>,
}

#[derive(Debug, Subcommand)]
enum BackupSubcommand {
    /// Write one snapshot now
    Run,
    /// List retained snapshot files, newest first
    List,
    /// Run the repeating timer until Ctrl-C
    Watch,
}

impl BackupCommand {
    pub async fn run(
        &self,
        store: Arc<StateStore<FileKeyValue>>,
        config: &Config,
    ) -> Result<(), Box<dyn Error>> {
        let scheduler =
            BackupScheduler::new(store, config.backup_dir(), config.backup.retention);

        match &self.command {
            None | Some(BackupSubcommand::Run) => {
                scheduler.run_once();
                let files = list_backup_files(scheduler.dir()).unwrap_or_default();
                match files.iter().max() {
                    Some(newest) => println!("Backup written: {}", newest),
                    None => println!("No backup was written (see log)."),
                }
            }
            Some(BackupSubcommand::List) => {
                let mut files = list_backup_files(scheduler.dir()).unwrap_or_default();
                if files.is_empty() {
                    println!("No backups yet.");
                    return Ok(());
                }
                files.sort_by(|a, b| b.cmp(a));
                for file in files {
                    println!("{}", file);
                }
            }
            Some(BackupSubcommand::Watch) => {
                let interval = config.backup.interval();
                scheduler.enable(interval);
                println!(
                    "Auto-backup every {} minute(s) into {} (Ctrl-C to stop)",
                    config.backup.interval_minutes,
                    scheduler.dir().display()
                );
                tokio::signal::ctrl_c().await?;
                scheduler.disable();
                println!("\nStopped.");
            }
        }
        Ok(())
    }
}
