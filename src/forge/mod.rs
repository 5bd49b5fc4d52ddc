//! GitHub REST gateway abstraction
//!
//! The [Forge] trait mirrors the narrow slice of the GitHub REST API this
//! action consumes: tag and commit listing, git ref manipulation, commit
//! comparison, and release management. Two implementations exist:
//!
//! - [github::GitHubForge]: the real client over `reqwest`
//! - [mock::MockForge]: an in-memory implementation for tests
//!
//! Orchestration code depends on the trait so the whole push workflow can be
//! exercised without network access.

pub mod github;
pub mod mock;

pub use github::GitHubForge;
pub use mock::MockForge;

use crate::error::Result;
use serde::Deserialize;

/// One commit between the previous release point and the current push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full commit sha
    pub sha: String,
    /// Full commit message (first line is the subject)
    pub message: String,
}

/// A tag as returned by the tag-listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagEntry {
    pub name: String,
    pub commit: TagCommit,
}

/// Commit pointer inside a [TagEntry].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagCommit {
    pub sha: String,
}

/// The object a git ref points at.
///
/// For lightweight tags `kind` is `commit`; annotated tags yield a `tag`
/// object that must be dereferenced once more via [Forge::get_tag_object].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitObject {
    pub sha: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Generated release notes (title and markdown body).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseNotes {
    pub name: String,
    pub body: String,
}

/// A published release object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub id: u64,
    pub html_url: String,
    pub name: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
}

/// Fields for creating or updating a release.
///
/// `None` fields are omitted from the request body; on update the host then
/// preserves the existing values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseParams {
    pub tag_name: String,
    pub target_commitish: Option<String>,
    pub name: Option<String>,
    pub body: Option<String>,
    pub draft: Option<bool>,
    pub prerelease: Option<bool>,
    /// Ask the host to generate notes server-side when none are supplied
    pub generate_release_notes: bool,
}

/// The remote API surface consumed by the release workflow.
///
/// Listing endpoints are capped at 100 entries per call; no pagination is
/// performed beyond that.
pub trait Forge {
    /// List up to 100 of the most recent tags.
    fn list_tags(&self) -> Result<Vec<TagEntry>>;

    /// List up to 100 of the most recent commits reachable from `git_ref`.
    fn list_commits(&self, git_ref: &str) -> Result<Vec<CommitInfo>>;

    /// Resolve `refs/tags/<tag_name>` to the object it points at.
    fn get_ref(&self, tag_name: &str) -> Result<GitObject>;

    /// Dereference an annotated tag object to its target.
    fn get_tag_object(&self, sha: &str) -> Result<GitObject>;

    /// Commits reachable from `head` but not from `base` (two-point
    /// compare), in chronological API order.
    fn compare(&self, base: &str, head: &str) -> Result<Vec<CommitInfo>>;

    /// Create a new ref. Fails if the ref already exists.
    ///
    /// `refname` is the fully qualified name, e.g. `refs/tags/v1.2.3`.
    fn create_ref(&self, refname: &str, sha: &str) -> Result<()>;

    /// Force-move an existing tag ref to `sha`. Fails if the ref does not
    /// exist yet.
    fn force_update_ref(&self, tag_name: &str, sha: &str) -> Result<()>;

    /// Generate release notes for `tag_name` server-side.
    fn generate_release_notes(
        &self,
        tag_name: &str,
        previous_tag: Option<&str>,
        target: &str,
    ) -> Result<ReleaseNotes>;

    /// Create a release. Fails if one already exists for the tag.
    fn create_release(&self, params: &ReleaseParams) -> Result<Release>;

    /// Fetch the release associated with a tag.
    fn release_by_tag(&self, tag_name: &str) -> Result<Release>;

    /// Update an existing release's fields.
    fn update_release(&self, id: u64, params: &ReleaseParams) -> Result<Release>;
}
