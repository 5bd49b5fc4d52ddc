//! Pre-release hook: a user-supplied command that may mutate the checkout
//! before the release tag is created.

pub mod executor;

use crate::error::Result;
use crate::git::Workspace;
use log::info;
use std::env;
use std::path::PathBuf;

/// Fallback committer when the runner supplies no actor.
const BOT_ACTOR: &str = "github-actions[bot]";

/// Runs the configured pre-release command and commits whatever it changed.
pub struct PreReleaseHook {
    command: String,
    workspace: PathBuf,
}

impl PreReleaseHook {
    pub fn new(command: impl Into<String>, workspace: impl Into<PathBuf>) -> Self {
        PreReleaseHook {
            command: command.into(),
            workspace: workspace.into(),
        }
    }

    /// Execute the hook and return the commit the tag should point at.
    ///
    /// The command runs with `NEW_VERSION` and `NEW_TAG` in its environment.
    /// A clean working tree afterwards means the trigger commit
    /// (`fallback_sha`) stays the tag target; otherwise all changes are
    /// staged, committed under a derived identity, and pushed, and the new
    /// commit becomes the target. Every failure in this chain is fatal: a
    /// tag must not point at a half-finished state.
    pub fn run(&self, version: &str, tag: &str, fallback_sha: &str) -> Result<String> {
        info!("Running pre-release command: {}", self.command);
        executor::run_command(
            &self.command,
            &self.workspace,
            &[("NEW_VERSION", version), ("NEW_TAG", tag)],
        )?;

        let workspace = Workspace::open(&self.workspace)?;
        if !workspace.has_changes()? {
            info!("Pre-release command left the tree clean");
            return Ok(fallback_sha.to_string());
        }

        let actor = env::var("GITHUB_ACTOR").unwrap_or_else(|_| BOT_ACTOR.to_string());
        let email = format!("{}@users.noreply.github.com", actor);

        let sha = workspace.commit_all(&format!("chore(release): {}", tag), &actor, &email)?;
        workspace.push_head()?;
        info!("Committed and pushed pre-release changes as {}", sha);

        Ok(sha)
    }
}
