//! CLI parse: clap types for vaultsync. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vaultsync CLI - mirror a notes vault to a GitHub repository
#[derive(Parser, Debug)]
#[command(name = "vaultsync", version)]
#[command(about = "Mirror a local notes vault to a remote GitHub repository")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (when output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Make the remote repository match the local vault
    Push {
        /// Show the planned changes without applying them
        #[arg(long)]
        dry_run: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Make the local vault match the remote repository
    Pull {
        /// Show the planned changes without applying them
        #[arg(long)]
        dry_run: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Push periodically until interrupted (Ctrl-C)
    #[command(visible_alias = "toggle-auto-sync")]
    AutoSync {
        /// Seconds between pushes (defaults to sync.auto_sync_interval_secs)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Manage the remote repository
    Repo {
        #[command(subcommand)]
        command: RepoCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum RepoCommands {
    /// Create the configured repository
    Create,
    /// Delete the configured repository
    Delete {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Show whether the repository exists and how the vault compares
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
