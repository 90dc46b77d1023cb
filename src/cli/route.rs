//! CLI route: single route table and run context. Dispatches to the sync engine and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::{Commands, RepoCommands};
use crate::cli::presentation::{
    format_outcome_json, format_outcome_text, format_repo_status_json, format_repo_status_text,
    RepoStatus,
};
use crate::config::{ConfigLoader, VaultSyncConfig};
use crate::confirm::{AssumeYes, Confirm, TerminalConfirm};
use crate::diff::{pull_diff, push_diff};
use crate::error::SyncError;
use crate::fetch::fetch;
use crate::orchestrator::{SyncOrchestrator, SyncOutcome};
use crate::remote::{GitHubStore, RemoteStore};
use crate::scan::{scan_tree, ScanFilter};
use crate::scheduler::AutoSyncScheduler;
use crate::store::{FsLocalStore, LocalStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Runtime context for CLI execution: vault root, loaded config and the remote.
pub struct RunContext {
    workspace_root: PathBuf,
    config: VaultSyncConfig,
    remote: Arc<dyn RemoteStore>,
    assume_yes: bool,
}

impl RunContext {
    /// Load and validate configuration, then connect the GitHub remote.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        assume_yes: bool,
    ) -> Result<Self, SyncError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };

        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            SyncError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;

        let remote: Arc<dyn RemoteStore> = Arc::new(GitHubStore::from_config(&config.remote)?);
        Ok(Self::from_parts(workspace_root, config, remote, assume_yes))
    }

    /// Assemble a context around an already-built remote
    pub fn from_parts(
        workspace_root: PathBuf,
        config: VaultSyncConfig,
        remote: Arc<dyn RemoteStore>,
        assume_yes: bool,
    ) -> Self {
        Self {
            workspace_root,
            config,
            remote,
            assume_yes,
        }
    }

    pub fn config(&self) -> &VaultSyncConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, SyncError> {
        let started = Instant::now();
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| SyncError::RuntimeError(format!("Failed to start runtime: {}", e)))?;
        let result = runtime.block_on(self.execute_async(command));

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => info!(command = %command_name(command), elapsed_ms, "Command finished"),
            Err(e) => warn!(command = %command_name(command), elapsed_ms, error = %e, "Command failed"),
        }
        result
    }

    /// Route table; usable directly from an existing runtime.
    pub async fn execute_async(&self, command: &Commands) -> Result<String, SyncError> {
        match command {
            Commands::Push { dry_run, format } => {
                let outcome = self.orchestrator()?.push(*dry_run).await?;
                self.render_outcome(&outcome, format)
            }
            Commands::Pull { dry_run, format } => {
                let outcome = self.orchestrator()?.pull(*dry_run).await?;
                self.render_outcome(&outcome, format)
            }
            Commands::AutoSync { interval } => self.run_auto_sync(*interval).await,
            Commands::Repo { command } => self.handle_repo_command(command).await,
        }
    }

    fn local_store(&self) -> Result<Arc<dyn LocalStore>, SyncError> {
        let store = FsLocalStore::open(&self.workspace_root)?
            .with_ignore_patterns(self.config.sync.ignore_patterns.clone());
        Ok(Arc::new(store))
    }

    fn confirm(&self) -> Arc<dyn Confirm> {
        if self.assume_yes {
            Arc::new(AssumeYes)
        } else {
            Arc::new(TerminalConfirm)
        }
    }

    fn orchestrator(&self) -> Result<SyncOrchestrator, SyncError> {
        Ok(SyncOrchestrator::new(
            self.local_store()?,
            Arc::clone(&self.remote),
            self.confirm(),
            self.config.sync.clone(),
        ))
    }

    fn render_outcome(&self, outcome: &SyncOutcome, format: &str) -> Result<String, SyncError> {
        if format == "json" {
            format_outcome_json(outcome)
        } else {
            Ok(format_outcome_text(outcome, &self.remote.describe()))
        }
    }

    async fn run_auto_sync(&self, interval: Option<u64>) -> Result<String, SyncError> {
        let secs = interval.unwrap_or(self.config.sync.auto_sync_interval_secs);
        if secs == 0 {
            return Err(SyncError::ConfigError(
                "auto-sync interval must be greater than zero".to_string(),
            ));
        }

        let orchestrator = Arc::new(self.orchestrator()?);
        let scheduler = AutoSyncScheduler::new(orchestrator, Duration::from_secs(secs));
        scheduler.start();
        eprintln!(
            "Auto-sync to {} every {}s. Press Ctrl-C to stop.",
            self.remote.describe(),
            secs
        );

        let started = Instant::now();
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| SyncError::RuntimeError(format!("Failed to wait for Ctrl-C: {}", e)))?;
        scheduler.stop().await;

        Ok(format!(
            "Auto-sync stopped after {}s",
            started.elapsed().as_secs()
        ))
    }

    async fn handle_repo_command(&self, command: &RepoCommands) -> Result<String, SyncError> {
        let name = self.config.repository().to_string();
        match command {
            RepoCommands::Create => {
                if self.remote.repository_exists(&name).await? {
                    return Err(SyncError::RemoteRejected(format!(
                        "repository '{}' already exists",
                        name
                    )));
                }
                self.remote.create_repository(&name).await?;
                Ok(format!("Created repository {}", self.remote.describe()))
            }
            RepoCommands::Delete { force } => {
                if !*force && !self.assume_yes {
                    let question = format!(
                        "Delete repository {} and its entire history? This cannot be undone.",
                        self.remote.describe()
                    );
                    if !TerminalConfirm::ask(&question)? {
                        return Ok("Aborted: repository left untouched".to_string());
                    }
                }
                self.remote.delete_repository(&name).await?;
                Ok(format!("Deleted repository {}", self.remote.describe()))
            }
            RepoCommands::Status { format } => {
                let status = self.repo_status(&name).await?;
                if format == "json" {
                    format_repo_status_json(&status)
                } else {
                    Ok(format_repo_status_text(&status))
                }
            }
        }
    }

    async fn repo_status(&self, name: &str) -> Result<RepoStatus, SyncError> {
        let local_store = self.local_store()?;
        let filter = ScanFilter::new(self.config.sync.ignore_patterns.clone());
        let local = scan_tree(local_store.as_ref(), &filter).await?;

        let exists = self.remote.repository_exists(name).await?;
        let mut status = RepoStatus {
            remote: self.remote.describe(),
            exists,
            remote_files: None,
            local_files: local.snapshot.file_count(),
            pending_push: None,
            pending_pull: None,
        };
        if exists {
            let remote = fetch(self.remote.as_ref(), &filter).await?.into_snapshot();
            status.remote_files = Some(remote.file_count());
            status.pending_push = Some(push_diff(&local.snapshot, &remote).len());
            let mut pull = pull_diff(&local.snapshot, &remote);
            local.spare_retained(&mut pull);
            status.pending_pull = Some(pull.len());
        }
        Ok(status)
    }
}
