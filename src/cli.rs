//! CLI domain: parse, route, help, output, and presentation only.
//! No sync logic; the single route table dispatches to the engine.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::{command_name, is_mutating};
pub use output::{exit_code, map_error};
pub use parse::{Cli, Commands, RepoCommands};
pub use presentation::{
    format_outcome_json, format_outcome_text, format_repo_status_json, format_repo_status_text,
    RepoStatus,
};
pub use route::RunContext;
