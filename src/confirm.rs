//! User confirmation seam
//!
//! The engine never talks to a terminal; it asks a [`Confirm`] implementation.

use crate::error::SyncError;

/// Questions the engine may ask before a destructive step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmPrompt {
    /// Local tree has no files but the remote does; pushing would delete it all
    EmptyPush,
    /// Local tree holds changes newer than the remote
    PullConflict,
}

impl ConfirmPrompt {
    pub fn title(&self) -> &'static str {
        match self {
            ConfirmPrompt::EmptyPush => "Warning: empty vault push",
            ConfirmPrompt::PullConflict => "Possible conflict detected",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ConfirmPrompt::EmptyPush => {
                "You are about to push an empty vault to a non-empty repository. \
                 This erases all of its content (recoverable only from the commit history). Continue?"
            }
            ConfirmPrompt::PullConflict => {
                "Local files have changes that were not pushed yet. \
                 Pulling keeps the remote version and replaces your local changes. Continue?"
            }
        }
    }

    /// Reason recorded when the prompt is declined
    pub fn declined_reason(&self) -> &'static str {
        match self {
            ConfirmPrompt::EmptyPush => "push of an empty vault declined",
            ConfirmPrompt::PullConflict => "pull over newer local changes declined",
        }
    }
}

/// Yes/no decision provider
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: ConfirmPrompt) -> bool;
}

/// Accept every prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: ConfirmPrompt) -> bool {
        true
    }
}

/// Decline every prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeNo;

impl Confirm for AssumeNo {
    fn confirm(&self, _prompt: ConfirmPrompt) -> bool {
        false
    }
}

/// Interactive terminal prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl TerminalConfirm {
    /// Ask a free-form yes/no question, defaulting to no.
    ///
    /// Waiting on the terminal blocks the calling thread; on a multi-threaded
    /// tokio runtime the worker is handed off first.
    pub fn ask(question: &str) -> Result<bool, SyncError> {
        blocking(|| {
            dialoguer::Confirm::new()
                .with_prompt(question)
                .default(false)
                .interact()
                .map_err(|e| SyncError::PromptFailed(e.to_string()))
        })
    }
}

/// Run blocking work without stalling other tasks on a multi-threaded runtime
fn blocking<T>(work: impl FnOnce() -> T) -> T {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(work)
        }
        _ => work(),
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: ConfirmPrompt) -> bool {
        let question = format!("{}: {}", prompt.title(), prompt.message());
        match Self::ask(&question) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "Prompt failed, treating as declined");
                false
            }
        }
    }
}
