//! CLI help and command-name contract for logging and routing.

use crate::cli::parse::{Commands, RepoCommands};

/// Command name string for log fields (e.g. "push", "repo.status").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Push { .. } => "push".to_string(),
        Commands::Pull { .. } => "pull".to_string(),
        Commands::AutoSync { .. } => "auto_sync".to_string(),
        Commands::Repo { command } => format!("repo.{}", repo_command_name(command)),
    }
}

pub fn repo_command_name(command: &RepoCommands) -> &'static str {
    match command {
        RepoCommands::Create => "create",
        RepoCommands::Delete { .. } => "delete",
        RepoCommands::Status { .. } => "status",
    }
}

/// Whether the command mutates either side
pub fn is_mutating(command: &Commands) -> bool {
    match command {
        Commands::Push { dry_run, .. } | Commands::Pull { dry_run, .. } => !dry_run,
        Commands::AutoSync { .. } => true,
        Commands::Repo { command } => !matches!(command, RepoCommands::Status { .. }),
    }
}
