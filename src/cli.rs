//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for redilink using clap's derive macros.

use clap::{Parser, Subcommand};

/// Redilink - A Redis-backed URL shortener
#[derive(Parser, Debug)]
#[command(name = "redilink")]
#[command(version)]
#[command(about = "A Redis-backed URL shortener", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./config.toml if present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Shorten a URL and print its token
    Shorten {
        /// URL to shorten (stored exactly as given)
        url: String,

        /// Lifetime in minutes (default: shortener.default_ttl_minutes)
        #[arg(long, allow_negative_numbers = true)]
        ttl: Option<i64>,
    },

    /// Print the original URL behind a token
    Resolve {
        token: String,
    },

    /// Print the detail record of a token as JSON
    Info {
        token: String,
    },

    /// Print the fingerprint used to deduplicate a URL
    Fingerprint {
        url: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    /// Whether the command needs a store connection
    pub fn needs_store(&self) -> bool {
        matches!(
            self,
            Commands::Shorten { .. } | Commands::Resolve { .. } | Commands::Info { .. }
        )
    }
}
