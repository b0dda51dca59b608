//! CLI interface module
//!
//! Loads configuration, sets up logging, connects the store and runs one
//! command against the shortener.

pub mod commands;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::config::init_config;
use crate::errors::RedilinkError;
use crate::services::ShortenerService;
use crate::storage::StoreFactory;
use crate::system::init_logging;
use commands::{config_generate, fingerprint_url, resolve_token, shorten_url, show_info};

#[derive(Debug)]
pub enum CliError {
    Service(RedilinkError),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::Service(e) => e.format_simple(),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::Service(e) => e.format_colored(),
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }

    /// Process exit status: 2 for missing links, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Service(e) if e.is_not_found() => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<RedilinkError> for CliError {
    fn from(err: RedilinkError) -> Self {
        CliError::Service(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::CommandError(err.to_string())
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli(cli: Cli) -> Result<(), CliError> {
    // Generate doesn't need configuration or a store
    if let Commands::Config {
        action: ConfigCommands::Generate { output_path, force },
    } = cli.command
    {
        return config_generate(output_path, force);
    }

    let config = init_config(cli.config.as_deref())?;
    let _guard = init_logging(&config.logging)?;
    debug!(
        "Configuration loaded: backend {}, redis {} (db {}), shortener {:?}, logging {:?}",
        config.store.backend,
        config.store.redis.redacted_url(),
        config.store.redis.db,
        config.shortener,
        config.logging
    );

    if let Commands::Fingerprint { url } = &cli.command {
        fingerprint_url(url);
        return Ok(());
    }

    let store = StoreFactory::create().await?;
    let service = Arc::new(ShortenerService::from_config(store, &config.shortener));

    match cli.command {
        Commands::Shorten { url, ttl } => {
            let ttl = ttl.unwrap_or(config.shortener.default_ttl_minutes);
            shorten_url(&service, &url, ttl).await
        }
        Commands::Resolve { token } => resolve_token(&service, &token).await,
        Commands::Info { token } => show_info(&service, &token).await,
        Commands::Fingerprint { .. } => unreachable!("handled above"),
        Commands::Config { .. } => unreachable!("handled above"),
    }
}
