use crate::error::Result;
use crate::forge::{CommitInfo, Forge};
use log::warn;
use semver::Version;

/// How a floating-tag upsert landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefChange {
    /// The ref did not exist yet and was created
    Created,
    /// The ref existed and was force-moved
    Updated,
}

/// Find the most recent release tag matching `prefix`.
///
/// Lists up to 100 recent tags, keeps those whose name starts with the
/// prefix and whose suffix parses as semver, and picks the maximum by semver
/// ordering. A listing failure is not fatal: it is logged and treated as "no
/// tags exist", which downstream resolves against the initial version.
pub fn latest_semver_tag<F: Forge>(forge: &F, prefix: &str) -> Option<(String, Version)> {
    let tags = match forge.list_tags() {
        Ok(tags) => tags,
        Err(e) => {
            warn!("Could not list tags, assuming none exist: {}", e);
            return None;
        }
    };

    tags.into_iter()
        .filter_map(|tag| {
            let suffix = tag.name.strip_prefix(prefix)?;
            let version = Version::parse(suffix).ok()?;
            Some((tag.name, version))
        })
        .max_by(|a, b| a.1.cmp(&b.1))
}

/// Collect the commits since the previous release point.
///
/// With no prior tag this is the 100 most recent commits on `head_ref`.
/// Otherwise the tag is resolved to a commit (annotated tags need one extra
/// dereference hop from the tag object) and a two-point compare yields the
/// commits reachable from the head but not from the tag. Any failure is
/// logged and yields an empty list, which the caller turns into a `none`
/// bump.
pub fn commits_since<F: Forge>(
    forge: &F,
    latest_tag: Option<&str>,
    head_ref: &str,
) -> Vec<CommitInfo> {
    let result = match latest_tag {
        None => forge.list_commits(head_ref),
        Some(tag) => resolve_tag_commit(forge, tag)
            .and_then(|base_sha| forge.compare(&base_sha, head_ref)),
    };

    match result {
        Ok(commits) => commits,
        Err(e) => {
            warn!("Could not determine commits since last release: {}", e);
            Vec::new()
        }
    }
}

/// Resolve a tag name to the sha of the commit it points at.
fn resolve_tag_commit<F: Forge>(forge: &F, tag_name: &str) -> Result<String> {
    let object = forge.get_ref(tag_name)?;

    if object.kind == "tag" {
        // Annotated tag: the ref points at a tag object, not the commit
        let target = forge.get_tag_object(&object.sha)?;
        Ok(target.sha)
    } else {
        Ok(object.sha)
    }
}

/// Create the immutable release tag.
///
/// A conflict with an existing ref propagates: release tags are never
/// overwritten.
pub fn create_release_tag<F: Forge>(forge: &F, name: &str, sha: &str) -> Result<()> {
    forge.create_ref(&format!("refs/tags/{}", name), sha)
}

/// Move a floating tag to `sha`, creating it on first use.
pub fn upsert_floating_tag<F: Forge>(forge: &F, name: &str, sha: &str) -> Result<RefChange> {
    match forge.force_update_ref(name, sha) {
        Ok(()) => Ok(RefChange::Updated),
        Err(_) => {
            forge.create_ref(&format!("refs/tags/{}", name), sha)?;
            Ok(RefChange::Created)
        }
    }
}
