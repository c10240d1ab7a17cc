//! Sync CLI commands for synchronizing with the document service.

use std::error::Error;
use std::io::{BufRead, Write};
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Args, Subcommand};

use sidepad::{
    Config, FileKeyValue, HttpRemote, RemoteTarget, StateStore, SyncEngine, SyncError,
    SyncReport, TokenProvider,
};

/// Sync with the remote document service
#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(subcommand)]
    command: Option<SyncSubcommand>,
}

#[derive(Debug, Subcommand)]
enum SyncSubcommand {
    /// Show sync configuration and the remote document id
    Status,
    /// Forget the remote document id (the remote copy is kept)
    Disconnect,
}

/// Token source for the CLI: configuration or environment first, an
/// interactive prompt only when the engine is allowed to ask.
struct CliTokens {
    configured: Option<String>,
}

#[async_trait]
impl TokenProvider for CliTokens {
    async fn token(&self, interactive: bool) -> Option<String> {
        if let Some(token) = &self.configured {
            return Some(token.clone());
        }
        if !interactive {
            return None;
        }
        eprint!("Paste an access token: ");
        std::io::stderr().flush().ok()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line).ok()?;
        let token = line.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }
}

impl SyncCommand {
    pub async fn run(
        &self,
        store: Arc<StateStore<FileKeyValue>>,
        kv: FileKeyValue,
        config: &Config,
    ) -> Result<(), Box<dyn Error>> {
        let server_url = match &config.sync.server_url {
            Some(url) => url.clone(),
            None => {
                println!("Sync is not configured.");
                println!();
                println!("Add to your config file:");
                println!();
                println!("  sync:");
                println!("    server_url: \"https://sync.example.com\"");
                println!();
                println!("Or set SIDEPAD_SYNC_URL (and optionally SIDEPAD_SYNC_TOKEN).");
                return Ok(());
            }
        };

        let tokens = CliTokens {
            configured: config.sync.token.clone(),
        };
        let engine = SyncEngine::new(store, kv, HttpRemote::new(server_url.clone()), tokens);

        match &self.command {
            None => self.sync(&engine).await,
            Some(SyncSubcommand::Status) => self.status(&engine, &server_url, config),
            Some(SyncSubcommand::Disconnect) => {
                if engine.disconnect()? {
                    println!("Disconnected. The next sync will create a new remote document.");
                } else {
                    println!("No remote document to disconnect from.");
                }
                Ok(())
            }
        }
    }

    async fn sync(
        &self,
        engine: &SyncEngine<FileKeyValue, HttpRemote, CliTokens>,
    ) -> Result<(), Box<dyn Error>> {
        let report = match engine.sync(false).await {
            Ok(report) => report,
            Err(SyncError::NotAuthenticated) => {
                // Recoverable: ask before starting the interactive flow.
                eprint!("No access token found. Sign in now? [y/N] ");
                std::io::stderr().flush()?;
                let mut answer = String::new();
                std::io::stdin().lock().read_line(&mut answer)?;
                if !matches!(answer.trim(), "y" | "Y" | "yes") {
                    println!("Sync cancelled.");
                    return Ok(());
                }
                engine.sync(true).await?
            }
            Err(e) => return Err(e.into()),
        };

        match report {
            SyncReport::Created { document_id } => {
                println!("✓ created remote document {}", document_id);
            }
            SyncReport::Updated { document_id } => {
                println!("✓ updated remote document {}", document_id);
            }
        }
        Ok(())
    }

    fn status(
        &self,
        engine: &SyncEngine<FileKeyValue, HttpRemote, CliTokens>,
        server_url: &str,
        config: &Config,
    ) -> Result<(), Box<dyn Error>> {
        println!("Sync Configuration");
        println!("==================");
        println!();
        println!("Server: {}", server_url);
        println!(
            "Token:  {}",
            if config.sync.token.is_some() {
                "configured"
            } else {
                "not configured (will prompt)"
            }
        );
        match engine.remote_target()? {
            RemoteTarget::Remote(id) => println!("Remote: document {}", id),
            RemoteTarget::NoRemote => println!("Remote: none (next sync will create one)"),
        }
        Ok(())
    }
}
