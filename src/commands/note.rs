//! Note commands: show, replace, clear.

use std::error::Error;
use std::io::Read;

use clap::{Args, Subcommand};

use sidepad::{FileKeyValue, StateStore};

/// Manage the freeform note text
#[derive(Debug, Args)]
pub struct NoteCommand {
    #[command(subcommand)]
    command: Option<NoteSubcommand>,
}

#[derive(Debug, Subcommand)]
enum NoteSubcommand {
    /// Print the current note text
    Show,
    /// Replace the note text (from the argument, or stdin when omitted)
    Set { text: Option<String> },
    /// Clear the note text
    Clear,
}

impl NoteCommand {
    pub fn run(&self, store: &StateStore<FileKeyValue>) -> Result<(), Box<dyn Error>> {
        match &self.command {
            None | Some(NoteSubcommand::Show) => {
                println!("{}", store.notes());
            }
            Some(NoteSubcommand::Set { text }) => {
                let text = match text {
                    Some(text) => text.clone(),
                    None => {
                        let mut buffer = String::new();
                        std::io::stdin().read_to_string(&mut buffer)?;
                        buffer
                    }
                };
                store.set_notes(text)?;
                println!("Note updated.");
            }
            Some(NoteSubcommand::Clear) => {
                store.set_notes("")?;
                println!("Note cleared.");
            }
        }
        Ok(())
    }
}
