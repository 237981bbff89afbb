//! CLI module for the key dashboard
//!
//! Provides subcommands that drive the key list controller and the
//! playground against the configured record store:
//! - `list`, `create`, `rename`, `delete`: manage keys
//! - `validate`: check a key the way the playground page does

pub mod keys;
pub mod playground;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::{AppConfig, LogFormat};
use crate::domain::{Notifier, RecordStore};
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::notification::{ConsoleNotifier, TracingNotifier};

/// Key Dashboard - manage and validate API keys
#[derive(Parser)]
#[command(name = "key-dashboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Record store backend (memory, postgrest); overrides configuration
    #[arg(long, global = true)]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List API keys
    List(keys::ListArgs),

    /// Create an API key
    Create(keys::CreateArgs),

    /// Rename an API key
    Rename(keys::RenameArgs),

    /// Delete an API key
    Delete(keys::DeleteArgs),

    /// Validate an API key
    ///
    /// With the `memory` backend the store lives only for this process: it
    /// holds the seeded keys (`tvly-default000...`, `tvly-newapikey000...`,
    /// `tvly-cli000...`) and nothing created by earlier runs.
    Validate(playground::ValidateArgs),
}

/// Load configuration, set up logging and run the selected command
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().unwrap_or_default();
    if let Some(backend) = cli.backend {
        config.store.backend = backend;
    }
    init_logging(&config.logging);

    let store = crate::create_record_store(&config)?;

    match cli.command {
        Command::List(args) => keys::list(&config, store, args).await,
        Command::Create(args) => keys::create(&config, store, args).await,
        Command::Rename(args) => keys::rename(&config, store, args).await,
        Command::Delete(args) => keys::delete(&config, store, args).await,
        Command::Validate(args) => playground::validate(&config, store, args).await,
    }
}

/// Record store shared by the commands
pub type SharedStore = Arc<dyn RecordStore>;

/// Notifier for the commands: plain console lines, or log events when
/// logging is structured
pub fn notifier(config: &AppConfig) -> Arc<dyn Notifier> {
    match config.logging.format {
        LogFormat::Pretty => Arc::new(ConsoleNotifier),
        LogFormat::Json => Arc::new(TracingNotifier),
    }
}
