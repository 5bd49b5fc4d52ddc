use crate::error::{ReleaseError, Result};
use log::warn;
use std::env;

/// Floating-tag maintenance mode.
///
/// Controls which moving tags are force-updated after a release:
/// - `Off`: no floating tags
/// - `Major`: only `v<major>`
/// - `MajorMinor`: both `v<major>` and `v<major>.<minor>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatingTagMode {
    Off,
    Major,
    MajorMinor,
}

impl FloatingTagMode {
    /// Parse the `floating-tag` input string.
    ///
    /// Recognized spellings:
    /// - `off`, `false`, `0`, `no` -> `Off`
    /// - `minor`, `major+minor`, `major,minor`, `majorminor` -> `MajorMinor`
    /// - anything else (including `true` and the empty string) -> `Major`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "off" | "false" | "0" | "no" => FloatingTagMode::Off,
            "minor" | "major+minor" | "major,minor" | "majorminor" => FloatingTagMode::MajorMinor,
            _ => FloatingTagMode::Major,
        }
    }
}

/// Resolved action configuration.
///
/// Combines the declared action inputs (`INPUT_*` variables set by the
/// runner) with the ambient workflow environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// API credential, the only required input
    pub token: String,

    /// Prefix applied to release tags (default `v`)
    pub tag_prefix: String,

    /// Version used when no prior semver tag exists (default `0.0.0`)
    pub initial_version: String,

    /// Which floating tags to maintain
    pub floating_tag: FloatingTagMode,

    /// Whether to publish a GitHub release for each new tag
    pub create_release: bool,

    /// Optional shell command executed before the tag is created
    pub pre_release_command: Option<String>,

    /// Optional override for the default-branch guard
    pub default_branch: Option<String>,

    /// `owner/repo` slug of the repository being released
    pub repository: String,

    /// Base URL of the REST API (`GITHUB_API_URL`, default api.github.com)
    pub api_url: String,

    /// Checkout directory the pre-release command runs in
    pub workspace: String,
}

/// Read a declared action input.
///
/// The runner exposes the input `github-token` as the environment variable
/// `INPUT_GITHUB-TOKEN`. Empty values are treated as absent, matching the
/// runner's behavior for optional inputs.
fn input(name: &str) -> Option<String> {
    env::var(format!("INPUT_{}", name.to_uppercase()))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Parse a boolean action input.
///
/// Recognized tokens: `true/1/yes/on` and `false/0/no/off`. Anything else is
/// logged and treated as `false`.
fn parse_bool(name: &str, value: &str) -> bool {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        other => {
            warn!(
                "Unrecognized boolean value '{}' for input '{}', assuming false",
                other, name
            );
            false
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Returns
    /// * `Ok(Config)` - Resolved configuration
    /// * `Err` - If `github-token` or `GITHUB_REPOSITORY` is missing
    pub fn from_env() -> Result<Self> {
        let token = input("github-token")
            .ok_or_else(|| ReleaseError::config("required input 'github-token' is not set"))?;

        let repository = env::var("GITHUB_REPOSITORY")
            .map_err(|_| ReleaseError::config("GITHUB_REPOSITORY is not set"))?;

        Ok(Config {
            token,
            tag_prefix: input("tag-prefix").unwrap_or_else(|| "v".to_string()),
            initial_version: input("initial-version").unwrap_or_else(|| "0.0.0".to_string()),
            floating_tag: input("floating-tag")
                .map(|v| FloatingTagMode::parse(&v))
                .unwrap_or(FloatingTagMode::Major),
            create_release: input("create-release")
                .map(|v| parse_bool("create-release", &v))
                .unwrap_or(false),
            pre_release_command: input("pre-release-command"),
            default_branch: input("default-branch"),
            repository,
            api_url: env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| "https://api.github.com".to_string()),
            workspace: env::var("GITHUB_WORKSPACE").unwrap_or_else(|_| ".".to_string()),
        })
    }
}
