//! Local checkout operations backing the pre-release hook.
//!
//! Everything except the push goes through `git2`. Pushing shells out to
//! the `git` binary so the credential configuration written by the checkout
//! step (an `http.extraheader` auth entry libgit2 does not read) applies.

use crate::error::{ReleaseError, Result};
use git2::{IndexAddOption, Repository, Signature, StatusOptions};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// The action's checkout of the repository being released.
pub struct Workspace {
    repo: Repository,
    dir: PathBuf,
}

impl Workspace {
    /// Open the checkout at `path` (discovering upward if needed).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path.as_ref())?;
        let dir = repo
            .workdir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| path.as_ref().to_path_buf());

        Ok(Workspace { repo, dir })
    }

    /// Whether the working tree has uncommitted changes, untracked files
    /// included.
    pub fn has_changes(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(true);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }

    /// Sha of the current HEAD commit.
    pub fn head_sha(&self) -> Result<String> {
        let head = self.repo.head()?;
        let oid = head
            .target()
            .ok_or_else(|| ReleaseError::hook("HEAD has no target commit".to_string()))?;
        Ok(oid.to_string())
    }

    /// Stage every change and commit it on HEAD.
    ///
    /// # Returns
    /// The sha of the new commit.
    pub fn commit_all(&self, message: &str, author: &str, email: &str) -> Result<String> {
        let mut index = self.repo.index()?;
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let signature = Signature::now(author, email)?;
        let head = self.repo.head()?;
        let parent = head.peel_to_commit()?;

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        Ok(oid.to_string())
    }

    /// Push HEAD to origin via the system `git` binary.
    pub fn push_head(&self) -> Result<()> {
        let status = Command::new("git")
            .arg("-C")
            .arg(&self.dir)
            .args(["push", "origin", "HEAD"])
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| ReleaseError::hook(format!("failed to run git push: {}", e)))?;

        if !status.success() {
            return Err(ReleaseError::hook(format!(
                "git push exited with {}",
                status.code().unwrap_or(-1)
            )));
        }

        Ok(())
    }
}
