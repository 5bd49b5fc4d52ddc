use crate::error::{ReleaseError, Result};
use crate::forge::{CommitInfo, Forge, GitObject, Release, ReleaseNotes, ReleaseParams, TagEntry};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory forge for testing without network access.
///
/// State is seeded through the builder-style `with_*` methods; mutating
/// calls are recorded so tests can assert which writes happened (or that
/// none did). Individual operations can be scripted to fail.
pub struct MockForge {
    tags: Vec<TagEntry>,
    commits_by_ref: HashMap<String, Vec<CommitInfo>>,
    compares: HashMap<String, Vec<CommitInfo>>,
    refs: RefCell<HashMap<String, String>>,
    annotated: HashMap<String, GitObject>,
    releases: RefCell<Vec<Release>>,
    next_release_id: RefCell<u64>,
    writes: RefCell<Vec<String>>,
    fail_list_tags: bool,
    fail_list_commits: bool,
    fail_compare: bool,
    fail_generate_notes: bool,
    fail_create_release: bool,
    fail_update_release: bool,
}

impl MockForge {
    pub fn new() -> Self {
        MockForge {
            tags: Vec::new(),
            commits_by_ref: HashMap::new(),
            compares: HashMap::new(),
            refs: RefCell::new(HashMap::new()),
            annotated: HashMap::new(),
            releases: RefCell::new(Vec::new()),
            next_release_id: RefCell::new(1),
            writes: RefCell::new(Vec::new()),
            fail_list_tags: false,
            fail_list_commits: false,
            fail_compare: false,
            fail_generate_notes: false,
            fail_create_release: false,
            fail_update_release: false,
        }
    }

    /// Seed a lightweight tag.
    pub fn with_tag(mut self, name: &str, sha: &str) -> Self {
        self.tags.push(TagEntry {
            name: name.to_string(),
            commit: super::TagCommit {
                sha: sha.to_string(),
            },
        });
        self.refs
            .get_mut()
            .insert(format!("refs/tags/{}", name), sha.to_string());
        self
    }

    /// Seed an annotated tag whose ref points at a tag object, which in
    /// turn points at `commit_sha`.
    pub fn with_annotated_tag(mut self, name: &str, object_sha: &str, commit_sha: &str) -> Self {
        self.tags.push(TagEntry {
            name: name.to_string(),
            commit: super::TagCommit {
                sha: object_sha.to_string(),
            },
        });
        self.refs
            .get_mut()
            .insert(format!("refs/tags/{}", name), object_sha.to_string());
        self.annotated.insert(
            object_sha.to_string(),
            GitObject {
                sha: commit_sha.to_string(),
                kind: "commit".to_string(),
            },
        );
        self
    }

    /// Seed the commit listing for a ref.
    pub fn with_commits(mut self, git_ref: &str, commits: Vec<CommitInfo>) -> Self {
        self.commits_by_ref.insert(git_ref.to_string(), commits);
        self
    }

    /// Seed a two-point compare result.
    pub fn with_compare(mut self, base: &str, head: &str, commits: Vec<CommitInfo>) -> Self {
        self.compares.insert(format!("{}...{}", base, head), commits);
        self
    }

    /// Seed an existing release.
    pub fn with_release(mut self, tag_name: &str, name: &str, body: &str) -> Self {
        let id = *self.next_release_id.get_mut();
        *self.next_release_id.get_mut() += 1;
        self.releases.get_mut().push(Release {
            id,
            html_url: format!("https://example.test/releases/{}", tag_name),
            name: Some(name.to_string()),
            body: Some(body.to_string()),
            draft: false,
            prerelease: false,
        });
        self.refs
            .get_mut()
            .insert(format!("release:{}", tag_name), id.to_string());
        self
    }

    pub fn failing_list_tags(mut self) -> Self {
        self.fail_list_tags = true;
        self
    }

    pub fn failing_list_commits(mut self) -> Self {
        self.fail_list_commits = true;
        self
    }

    pub fn failing_compare(mut self) -> Self {
        self.fail_compare = true;
        self
    }

    pub fn failing_generate_notes(mut self) -> Self {
        self.fail_generate_notes = true;
        self
    }

    pub fn failing_create_release(mut self) -> Self {
        self.fail_create_release = true;
        self
    }

    pub fn failing_update_release(mut self) -> Self {
        self.fail_update_release = true;
        self
    }

    /// Mutating calls made against this forge, in order.
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }

    /// Current target of a ref, if present.
    pub fn ref_target(&self, refname: &str) -> Option<String> {
        self.refs.borrow().get(refname).cloned()
    }

    fn record(&self, entry: String) {
        self.writes.borrow_mut().push(entry);
    }
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

impl Forge for MockForge {
    fn list_tags(&self) -> Result<Vec<TagEntry>> {
        if self.fail_list_tags {
            return Err(ReleaseError::api("tag listing unavailable"));
        }
        Ok(self.tags.clone())
    }

    fn list_commits(&self, git_ref: &str) -> Result<Vec<CommitInfo>> {
        if self.fail_list_commits {
            return Err(ReleaseError::api("commit listing unavailable"));
        }
        Ok(self
            .commits_by_ref
            .get(git_ref)
            .cloned()
            .unwrap_or_default())
    }

    fn get_ref(&self, tag_name: &str) -> Result<GitObject> {
        let refs = self.refs.borrow();
        let sha = refs
            .get(&format!("refs/tags/{}", tag_name))
            .ok_or_else(|| ReleaseError::api(format!("ref not found: {}", tag_name)))?;

        let kind = if self.annotated.contains_key(sha) {
            "tag"
        } else {
            "commit"
        };

        Ok(GitObject {
            sha: sha.clone(),
            kind: kind.to_string(),
        })
    }

    fn get_tag_object(&self, sha: &str) -> Result<GitObject> {
        self.annotated
            .get(sha)
            .cloned()
            .ok_or_else(|| ReleaseError::api(format!("tag object not found: {}", sha)))
    }

    fn compare(&self, base: &str, head: &str) -> Result<Vec<CommitInfo>> {
        if self.fail_compare {
            return Err(ReleaseError::api("compare unavailable"));
        }
        Ok(self
            .compares
            .get(&format!("{}...{}", base, head))
            .cloned()
            .unwrap_or_default())
    }

    fn create_ref(&self, refname: &str, sha: &str) -> Result<()> {
        let mut refs = self.refs.borrow_mut();
        if refs.contains_key(refname) {
            return Err(ReleaseError::api(format!(
                "Reference already exists: {}",
                refname
            )));
        }
        refs.insert(refname.to_string(), sha.to_string());
        self.record(format!("create_ref {} {}", refname, sha));
        Ok(())
    }

    fn force_update_ref(&self, tag_name: &str, sha: &str) -> Result<()> {
        let refname = format!("refs/tags/{}", tag_name);
        let mut refs = self.refs.borrow_mut();
        if !refs.contains_key(&refname) {
            return Err(ReleaseError::api(format!(
                "Reference does not exist: {}",
                refname
            )));
        }
        refs.insert(refname.clone(), sha.to_string());
        self.record(format!("update_ref {} {}", refname, sha));
        Ok(())
    }

    fn generate_release_notes(
        &self,
        tag_name: &str,
        _previous_tag: Option<&str>,
        _target: &str,
    ) -> Result<ReleaseNotes> {
        if self.fail_generate_notes {
            return Err(ReleaseError::api("notes generation unavailable"));
        }
        Ok(ReleaseNotes {
            name: tag_name.to_string(),
            body: format!("Notes for {}", tag_name),
        })
    }

    fn create_release(&self, params: &ReleaseParams) -> Result<Release> {
        if self.fail_create_release {
            return Err(ReleaseError::api("release creation unavailable"));
        }
        if self
            .refs
            .borrow()
            .contains_key(&format!("release:{}", params.tag_name))
        {
            return Err(ReleaseError::api(format!(
                "Release already exists for tag {}",
                params.tag_name
            )));
        }

        let id = *self.next_release_id.borrow();
        *self.next_release_id.borrow_mut() += 1;

        let release = Release {
            id,
            html_url: format!("https://example.test/releases/{}", params.tag_name),
            name: params.name.clone(),
            body: params.body.clone(),
            draft: params.draft.unwrap_or(false),
            prerelease: params.prerelease.unwrap_or(false),
        };
        self.releases.borrow_mut().push(release.clone());
        self.refs
            .borrow_mut()
            .insert(format!("release:{}", params.tag_name), id.to_string());
        self.record(format!("create_release {}", params.tag_name));
        Ok(release)
    }

    fn release_by_tag(&self, tag_name: &str) -> Result<Release> {
        let refs = self.refs.borrow();
        let id: u64 = refs
            .get(&format!("release:{}", tag_name))
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| ReleaseError::api(format!("no release for tag {}", tag_name)))?;

        self.releases
            .borrow()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| ReleaseError::api(format!("no release for tag {}", tag_name)))
    }

    fn update_release(&self, id: u64, params: &ReleaseParams) -> Result<Release> {
        if self.fail_update_release {
            return Err(ReleaseError::api("release update unavailable"));
        }

        let mut releases = self.releases.borrow_mut();
        let release = releases
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ReleaseError::api(format!("no release with id {}", id)))?;

        if let Some(ref name) = params.name {
            release.name = Some(name.clone());
        }
        if let Some(ref body) = params.body {
            release.body = Some(body.clone());
        }
        if let Some(draft) = params.draft {
            release.draft = draft;
        }
        if let Some(prerelease) = params.prerelease {
            release.prerelease = prerelease;
        }

        self.writes.borrow_mut().push(format!("update_release {}", id));
        Ok(release.clone())
    }
}
