//! Export and import commands.

use std::error::Error;
use std::path::PathBuf;

use clap::Args;

use sidepad::{export_to, import_from, FileKeyValue, StateStore};

/// Export notes and tasks to a snapshot file
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Destination file
    path: PathBuf,
}

impl ExportCommand {
    pub fn run(&self, store: &StateStore<FileKeyValue>) -> Result<(), Box<dyn Error>> {
        let snapshot = export_to(store, &self.path)?;
        println!(
            "Exported {} task(s) to {}",
            snapshot.tasks.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Replace notes and tasks from a snapshot file
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// Snapshot file to import
    path: PathBuf,
}

impl ImportCommand {
    pub fn run(&self, store: &StateStore<FileKeyValue>) -> Result<(), Box<dyn Error>> {
        let snapshot = import_from(store, &self.path)?;
        println!(
            "Imported {} task(s) from {}",
            snapshot.tasks.len(),
            self.path.display()
        );
        Ok(())
    }
}
