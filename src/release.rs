use crate::error::Result;
use crate::forge::{Forge, Release, ReleaseNotes, ReleaseParams};
use log::{info, warn};

/// How a release publish landed.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// A fresh release was created for the tag
    Created(Release),
    /// A release already existed and its fields were updated
    Updated(Release),
}

impl PublishOutcome {
    pub fn release(&self) -> &Release {
        match self {
            PublishOutcome::Created(release) | PublishOutcome::Updated(release) => release,
        }
    }
}

/// Publish a release for a freshly created tag.
///
/// Nothing in here can undo the tag: every failure is logged and collapses
/// to "no release URL". Note generation failures fall back to host-generated
/// notes; creation conflicts fall back to updating the existing release.
///
/// # Returns
/// * `Some(url)` - The release page, when created or updated
/// * `None` - The release could not be published; the tag stands
pub fn publish<F: Forge>(
    forge: &F,
    new_tag: &str,
    previous_tag: Option<&str>,
    branch: &str,
) -> Option<String> {
    let notes = match forge.generate_release_notes(new_tag, previous_tag, branch) {
        Ok(notes) => Some(notes),
        Err(e) => {
            warn!("Could not generate release notes for {}: {}", new_tag, e);
            None
        }
    };

    match upsert_release(forge, new_tag, branch, notes) {
        Ok(PublishOutcome::Created(release)) => {
            info!("Created release {}", release.html_url);
            Some(release.html_url)
        }
        Ok(PublishOutcome::Updated(release)) => {
            info!("Updated existing release {}", release.html_url);
            Some(release.html_url)
        }
        Err(e) => {
            warn!("Could not publish release for {}: {}", new_tag, e);
            None
        }
    }
}

/// Create the release, falling back to updating an existing one for the
/// same tag.
fn upsert_release<F: Forge>(
    forge: &F,
    new_tag: &str,
    branch: &str,
    notes: Option<ReleaseNotes>,
) -> Result<PublishOutcome> {
    let create_params = ReleaseParams {
        tag_name: new_tag.to_string(),
        target_commitish: Some(branch.to_string()),
        name: notes.as_ref().map(|n| n.name.clone()),
        body: notes.as_ref().map(|n| n.body.clone()),
        generate_release_notes: notes.is_none(),
        ..Default::default()
    };

    match forge.create_release(&create_params) {
        Ok(release) => Ok(PublishOutcome::Created(release)),
        Err(create_err) => {
            info!(
                "Release creation for {} failed ({}), trying update",
                new_tag, create_err
            );

            let existing = forge.release_by_tag(new_tag)?;
            let update_params = ReleaseParams {
                tag_name: new_tag.to_string(),
                name: notes
                    .as_ref()
                    .map(|n| n.name.clone())
                    .or_else(|| existing.name.clone()),
                body: notes
                    .as_ref()
                    .map(|n| n.body.clone())
                    .or_else(|| existing.body.clone()),
                draft: Some(existing.draft),
                prerelease: Some(existing.prerelease),
                ..Default::default()
            };

            let updated = forge.update_release(existing.id, &update_params)?;
            Ok(PublishOutcome::Updated(updated))
        }
    }
}
