use crate::error::{ReleaseError, Result};
use crate::forge::CommitInfo;
use regex::Regex;
use std::fmt;

/// Commit types accepted by the pull-request title check.
pub const COMMIT_TYPES: [&str; 11] = [
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore", "revert",
];

/// Breaking-change markers searched for in the full commit message body.
const BREAKING_MARKERS: [&str; 2] = ["BREAKING CHANGE:", "BREAKING-CHANGE:"];

/// The semantic-version increment implied by a set of commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpType {
    Major,
    Minor,
    Patch,
    None,
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BumpType::Major => "major",
            BumpType::Minor => "minor",
            BumpType::Patch => "patch",
            BumpType::None => "none",
        };
        write!(f, "{}", s)
    }
}

/// Classify a set of commits into a single bump decision.
///
/// Three flags are accumulated across all commits and resolved by strict
/// priority: breaking > feat > fix > none. Per commit, only the first line
/// is checked for the `!:` marker and the `feat`/`fix` prefix, while the
/// full message is scanned for `BREAKING CHANGE:` / `BREAKING-CHANGE:`
/// footers. The flags only ever turn on, so commit order cannot change the
/// outcome.
pub fn classify_commits(commits: &[CommitInfo]) -> BumpType {
    let mut has_breaking = false;
    let mut has_feat = false;
    let mut has_fix = false;

    for commit in commits {
        let first_line = commit.message.lines().next().unwrap_or("").to_lowercase();

        if first_line.contains("!:") {
            has_breaking = true;
        }
        if BREAKING_MARKERS.iter().any(|m| commit.message.contains(m)) {
            has_breaking = true;
        }
        if first_line.starts_with("feat") {
            has_feat = true;
        }
        if first_line.starts_with("fix") {
            has_fix = true;
        }
    }

    if has_breaking {
        BumpType::Major
    } else if has_feat {
        BumpType::Minor
    } else if has_fix {
        BumpType::Patch
    } else {
        BumpType::None
    }
}

/// Validate a pull-request title against the conventional-commit grammar.
///
/// Accepted shapes: `type: description`, `type(scope): description`, with an
/// optional `!` breaking marker before the colon. The type must be one of
/// [COMMIT_TYPES].
///
/// # Returns
/// * `Ok(())` - Title is well-formed
/// * `Err` - With guidance listing the valid types
pub fn validate_pr_title(title: &str) -> Result<()> {
    let matched = Regex::new(r"^([a-z]+)(\([^)]+\))?!?:\s+\S")
        .ok()
        .and_then(|re| re.captures(title))
        .map(|captures| {
            captures
                .get(1)
                .map(|m| COMMIT_TYPES.contains(&m.as_str()))
                .unwrap_or(false)
        })
        .unwrap_or(false);

    if matched {
        Ok(())
    } else {
        Err(ReleaseError::event(format!(
            "Pull request title '{}' does not follow the Conventional Commits format.\n\
             Expected 'type(scope): description', e.g. 'feat(auth): add login'.\n\
             Valid types: {}",
            title,
            COMMIT_TYPES.join(", ")
        )))
    }
}
