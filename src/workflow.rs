use crate::config::{Config, FloatingTagMode};
use crate::conventional::{self, BumpType};
use crate::error::{ReleaseError, Result};
use crate::event::TriggerEvent;
use crate::forge::Forge;
use crate::hooks::PreReleaseHook;
use crate::outputs::set_output;
use crate::release;
use crate::tags;
use crate::version;
use log::info;

/// Everything the push path reports back to the workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct PushOutcome {
    pub bump: BumpType,
    pub new_tag: Option<String>,
    pub floating_tag: Option<String>,
    pub floating_minor_tag: Option<String>,
    pub release_url: Option<String>,
}

impl PushOutcome {
    fn none() -> Self {
        PushOutcome {
            bump: BumpType::None,
            new_tag: None,
            floating_tag: None,
            floating_minor_tag: None,
            release_url: None,
        }
    }
}

/// Dispatch one triggering event.
///
/// Pull-request events only validate the title; push events run the full
/// tag-and-release sequence and publish step outputs. Any other event is
/// logged and skipped.
pub fn run<F: Forge>(config: &Config, event: &TriggerEvent, forge: &F) -> Result<()> {
    match event {
        TriggerEvent::PullRequest { title } => check_pr_title(title.as_deref()),
        TriggerEvent::Push {
            git_ref,
            head_sha,
            default_branch,
        } => {
            let outcome = run_push(config, forge, git_ref, head_sha, default_branch.as_deref())?;
            report(&outcome)
        }
        TriggerEvent::Other(name) => {
            info!("Unsupported event '{}', nothing to do", name);
            Ok(())
        }
    }
}

/// Validate the pull-request title.
fn check_pr_title(title: Option<&str>) -> Result<()> {
    let title = title.ok_or_else(|| {
        ReleaseError::event("pull request event carries no title".to_string())
    })?;

    conventional::validate_pr_title(title)?;
    info!("Pull request title is a valid conventional commit");
    Ok(())
}

/// The push path: classify, resolve, hook, tag, release, floating tags.
///
/// Ordered so that every fallible precomputation happens before the first
/// irreversible write (the tag ref).
pub fn run_push<F: Forge>(
    config: &Config,
    forge: &F,
    git_ref: &str,
    head_sha: &str,
    payload_default_branch: Option<&str>,
) -> Result<PushOutcome> {
    let branch = config
        .default_branch
        .clone()
        .or_else(|| payload_default_branch.map(str::to_string))
        .ok_or_else(|| ReleaseError::config("cannot determine the default branch"))?;

    if git_ref != format!("refs/heads/{}", branch) {
        info!("Push to {} is not the default branch {}, skipping", git_ref, branch);
        return Ok(PushOutcome::none());
    }

    let latest = tags::latest_semver_tag(forge, &config.tag_prefix);
    let latest_name = latest.as_ref().map(|(name, _)| name.clone());
    match &latest_name {
        Some(name) => info!("Latest release tag: {}", name),
        None => info!("No release tag found, starting from {}", config.initial_version),
    }

    let commits = tags::commits_since(forge, latest_name.as_deref(), head_sha);
    if commits.is_empty() {
        info!("No commits since the last release");
        return Ok(PushOutcome::none());
    }
    info!("Classifying {} commit(s)", commits.len());

    let bump = conventional::classify_commits(&commits);
    if bump == BumpType::None {
        info!("No release-worthy commits, bump type is none");
        return Ok(PushOutcome::none());
    }

    let current = latest
        .as_ref()
        .map(|(_, version)| version.to_string())
        .unwrap_or_else(|| config.initial_version.clone());
    let next = version::next_version(&current, bump)?;
    let new_tag = format!("{}{}", config.tag_prefix, next);
    info!("Bump {}: {} -> {}", bump, current, next);

    let target_sha = match &config.pre_release_command {
        Some(command) => PreReleaseHook::new(command, &config.workspace).run(
            &next.to_string(),
            &new_tag,
            head_sha,
        )?,
        None => head_sha.to_string(),
    };

    tags::create_release_tag(forge, &new_tag, &target_sha)?;
    info!("Created tag {} at {}", new_tag, target_sha);

    let release_url = if config.create_release {
        release::publish(forge, &new_tag, latest_name.as_deref(), &branch)
    } else {
        None
    };

    let (floating_tag, floating_minor_tag) = if next.major == 0 {
        // Pre-1.0 releases promise nothing, so no floating tags
        (None, None)
    } else {
        match config.floating_tag {
            FloatingTagMode::Off => (None, None),
            FloatingTagMode::Major => {
                let name = format!("{}{}", config.tag_prefix, next.major);
                tags::upsert_floating_tag(forge, &name, &target_sha)?;
                info!("Floating tag {} -> {}", name, target_sha);
                (Some(name), None)
            }
            FloatingTagMode::MajorMinor => {
                let major_name = format!("{}{}", config.tag_prefix, next.major);
                let minor_name = format!("{}{}.{}", config.tag_prefix, next.major, next.minor);
                tags::upsert_floating_tag(forge, &major_name, &target_sha)?;
                tags::upsert_floating_tag(forge, &minor_name, &target_sha)?;
                info!("Floating tags {}, {} -> {}", major_name, minor_name, target_sha);
                (Some(major_name), Some(minor_name))
            }
        }
    };

    Ok(PushOutcome {
        bump,
        new_tag: Some(new_tag),
        floating_tag,
        floating_minor_tag,
        release_url,
    })
}

/// Publish the push outcome as step outputs.
fn report(outcome: &PushOutcome) -> Result<()> {
    set_output("bump-type", &outcome.bump.to_string())?;

    if let Some(ref tag) = outcome.new_tag {
        set_output("new-tag", tag)?;
    }
    if let Some(ref tag) = outcome.floating_tag {
        set_output("floating-tag", tag)?;
    }
    if let Some(ref tag) = outcome.floating_minor_tag {
        set_output("floating-minor-tag", tag)?;
    }
    if let Some(ref url) = outcome.release_url {
        set_output("release-url", url)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::{CommitInfo, MockForge};

    fn test_config() -> Config {
        Config {
            token: "t".to_string(),
            tag_prefix: "v".to_string(),
            initial_version: "0.0.0".to_string(),
            floating_tag: FloatingTagMode::Major,
            create_release: false,
            pre_release_command: None,
            default_branch: None,
            repository: "octo/repo".to_string(),
            api_url: "https://api.github.com".to_string(),
            workspace: ".".to_string(),
        }
    }

    fn commit(sha: &str, message: &str) -> CommitInfo {
        CommitInfo {
            sha: sha.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_non_default_branch_short_circuits() {
        let forge = MockForge::new();
        let outcome = run_push(
            &test_config(),
            &forge,
            "refs/heads/feature-x",
            "head",
            Some("main"),
        )
        .unwrap();

        assert_eq!(outcome.bump, BumpType::None);
        assert!(outcome.new_tag.is_none());
        assert!(forge.writes().is_empty());
    }

    #[test]
    fn test_no_commits_is_none() {
        let forge = MockForge::new();
        let outcome = run_push(&test_config(), &forge, "refs/heads/main", "head", Some("main"))
            .unwrap();

        assert_eq!(outcome.bump, BumpType::None);
        assert!(forge.writes().is_empty());
    }

    #[test]
    fn test_first_release_from_initial_version() {
        let forge = MockForge::new().with_commits("head", vec![commit("1", "fix: x")]);
        let outcome = run_push(&test_config(), &forge, "refs/heads/main", "head", Some("main"))
            .unwrap();

        assert_eq!(outcome.bump, BumpType::Patch);
        assert_eq!(outcome.new_tag.as_deref(), Some("v0.0.1"));
        // Major version 0: no floating tag even with the mode enabled
        assert!(outcome.floating_tag.is_none());
        assert_eq!(forge.writes(), vec!["create_ref refs/tags/v0.0.1 head"]);
    }

    #[test]
    fn test_minor_release_updates_floating_tag() {
        let forge = MockForge::new()
            .with_tag("v1.4.2", "base")
            .with_tag("v1", "old")
            .with_compare("base", "head", vec![commit("1", "feat: a"), commit("2", "fix: b")]);

        let outcome = run_push(&test_config(), &forge, "refs/heads/main", "head", Some("main"))
            .unwrap();

        assert_eq!(outcome.bump, BumpType::Minor);
        assert_eq!(outcome.new_tag.as_deref(), Some("v1.5.0"));
        assert_eq!(outcome.floating_tag.as_deref(), Some("v1"));
        assert_eq!(forge.ref_target("refs/tags/v1").as_deref(), Some("head"));
        assert_eq!(
            forge.ref_target("refs/tags/v1.5.0").as_deref(),
            Some("head")
        );
    }

    #[test]
    fn test_breaking_commit_bumps_major() {
        let forge = MockForge::new()
            .with_tag("v2.0.0", "base")
            .with_compare("base", "head", vec![commit("1", "feat!: break")]);

        let outcome = run_push(&test_config(), &forge, "refs/heads/main", "head", Some("main"))
            .unwrap();

        assert_eq!(outcome.bump, BumpType::Major);
        assert_eq!(outcome.new_tag.as_deref(), Some("v3.0.0"));
        assert_eq!(outcome.floating_tag.as_deref(), Some("v3"));
    }

    #[test]
    fn test_major_minor_mode_updates_both_tags() {
        let mut config = test_config();
        config.floating_tag = FloatingTagMode::MajorMinor;

        let forge = MockForge::new()
            .with_tag("v1.4.2", "base")
            .with_compare("base", "head", vec![commit("1", "feat: a")]);

        let outcome =
            run_push(&config, &forge, "refs/heads/main", "head", Some("main")).unwrap();

        assert_eq!(outcome.floating_tag.as_deref(), Some("v1"));
        assert_eq!(outcome.floating_minor_tag.as_deref(), Some("v1.5"));
        assert_eq!(forge.ref_target("refs/tags/v1.5").as_deref(), Some("head"));
    }

    #[test]
    fn test_floating_off_creates_no_moving_tags() {
        let mut config = test_config();
        config.floating_tag = FloatingTagMode::Off;

        let forge = MockForge::new()
            .with_tag("v1.0.0", "base")
            .with_compare("base", "head", vec![commit("1", "feat: a")]);

        let outcome =
            run_push(&config, &forge, "refs/heads/main", "head", Some("main")).unwrap();

        assert_eq!(outcome.new_tag.as_deref(), Some("v1.1.0"));
        assert!(outcome.floating_tag.is_none());
        assert_eq!(forge.writes(), vec!["create_ref refs/tags/v1.1.0 head"]);
    }

    #[test]
    fn test_create_release_reports_url() {
        let mut config = test_config();
        config.create_release = true;

        let forge = MockForge::new()
            .with_tag("v1.0.0", "base")
            .with_compare("base", "head", vec![commit("1", "fix: b")]);

        let outcome =
            run_push(&config, &forge, "refs/heads/main", "head", Some("main")).unwrap();

        assert_eq!(outcome.new_tag.as_deref(), Some("v1.0.1"));
        assert!(outcome.release_url.as_deref().unwrap().contains("v1.0.1"));
    }

    #[test]
    fn test_existing_tag_conflict_is_fatal() {
        let forge = MockForge::new()
            .with_tag("v1.0.0", "base")
            .with_tag("v1.1.0", "elsewhere")
            .with_compare("base", "head", vec![commit("1", "feat: a")]);

        let result = run_push(&test_config(), &forge, "refs/heads/main", "head", Some("main"));
        assert!(result.is_err());
    }

    #[test]
    fn test_unparsable_initial_version_is_fatal() {
        let mut config = test_config();
        config.initial_version = "not-semver".to_string();

        let forge = MockForge::new().with_commits("head", vec![commit("1", "fix: x")]);
        let result = run_push(&config, &forge, "refs/heads/main", "head", Some("main"));

        assert!(result.is_err());
        assert!(forge.writes().is_empty());
    }

    #[test]
    fn test_default_branch_override_wins() {
        let mut config = test_config();
        config.default_branch = Some("trunk".to_string());

        let forge = MockForge::new().with_commits("head", vec![commit("1", "fix: x")]);
        let outcome = run_push(&config, &forge, "refs/heads/trunk", "head", Some("main"))
            .unwrap();

        assert_eq!(outcome.bump, BumpType::Patch);
    }

    #[test]
    fn test_missing_default_branch_is_config_error() {
        let forge = MockForge::new();
        let result = run_push(&test_config(), &forge, "refs/heads/main", "head", None);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_pr_title_accepts_conventional() {
        assert!(check_pr_title(Some("fix: resolve bug")).is_ok());
    }

    #[test]
    fn test_check_pr_title_rejects_plain_text() {
        assert!(check_pr_title(Some("resolve bug")).is_err());
    }

    #[test]
    fn test_check_pr_title_requires_title() {
        assert!(check_pr_title(None).is_err());
    }
}
