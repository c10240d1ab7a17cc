//! Render the note text (or a file) to markup.

use std::error::Error;
use std::path::PathBuf;

use clap::Args;

use sidepad::{render_markup, FileKeyValue, StateStore};

/// Convert the stored note (or a file) to structured markup
#[derive(Debug, Args)]
pub struct RenderCommand {
    /// Render this file instead of the stored note
    #[arg(long, short)]
    file: Option<PathBuf>,
}

impl RenderCommand {
    pub fn run(&self, store: &StateStore<FileKeyValue>) -> Result<(), Box<dyn Error>> {
        let text = match &self.file {
            Some(path) => std::fs::read_to_string(path)?,
            None => store.notes(),
        };
        println!("{}", render_markup(&text));
        Ok(())
    }
}
