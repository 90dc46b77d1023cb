//! vaultsync CLI Binary
//!
//! Command-line interface for mirroring a notes vault to a GitHub repository.

use clap::Parser;
use std::process;
use tracing::{error, info};
use vaultsync::cli::{Cli, RunContext};
use vaultsync::config::ConfigLoader;
use vaultsync::error::SyncError;
use vaultsync::logging::{init_logging, LoggingConfig};

fn main() {
    let cli = Cli::parse();

    let logging_config = match build_logging_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", vaultsync::cli::map_error(&e));
            process::exit(vaultsync::cli::exit_code(&e));
        }
    };

    if let Err(e) = init_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!(command = %vaultsync::cli::command_name(&cli.command), "vaultsync starting");

    let context = match RunContext::new(cli.workspace.clone(), cli.config.clone(), cli.yes) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing vault context: {}", e);
            eprintln!("{}", vaultsync::cli::map_error(&e));
            process::exit(vaultsync::cli::exit_code(&e));
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", vaultsync::cli::map_error(&e));
            process::exit(vaultsync::cli::exit_code(&e));
        }
    }
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> Result<LoggingConfig, SyncError> {
    let loaded = match cli.config {
        Some(ref config_path) => ConfigLoader::load_from_file(config_path),
        None => ConfigLoader::load(&cli.workspace),
    };
    // Config errors are reported by RunContext with full context.
    let mut config = loaded.map(|c| c.logging).unwrap_or_default();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.parse()?;
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.parse()?;
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }

    Ok(config)
}
