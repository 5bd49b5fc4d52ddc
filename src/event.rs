use crate::error::{ReleaseError, Result};
use serde::Deserialize;
use std::env;
use std::fs;

/// The triggering workflow event, reduced to the fields this action reads.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerEvent {
    /// A pull-request event carrying the PR title (absent when the payload
    /// is malformed, which is reported as a user error downstream)
    PullRequest { title: Option<String> },

    /// A push event with the updated ref, its head commit, and the
    /// repository default branch from the payload
    Push {
        git_ref: String,
        head_sha: String,
        default_branch: Option<String>,
    },

    /// Any other event; logged and skipped
    Other(String),
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    pull_request: Option<PullRequestInner>,
}

#[derive(Debug, Deserialize)]
struct PullRequestInner {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PushPayload {
    #[serde(rename = "ref")]
    git_ref: Option<String>,
    after: Option<String>,
    repository: Option<RepositoryInner>,
}

#[derive(Debug, Deserialize)]
struct RepositoryInner {
    default_branch: Option<String>,
}

impl TriggerEvent {
    /// Read the triggering event from `GITHUB_EVENT_NAME` and the JSON
    /// payload at `GITHUB_EVENT_PATH`.
    pub fn from_env() -> Result<Self> {
        let name = env::var("GITHUB_EVENT_NAME")
            .map_err(|_| ReleaseError::event("GITHUB_EVENT_NAME is not set"))?;

        let payload = match env::var("GITHUB_EVENT_PATH") {
            Ok(path) => fs::read_to_string(&path).map_err(|e| {
                ReleaseError::event(format!("cannot read event payload at {}: {}", path, e))
            })?,
            Err(_) => return Err(ReleaseError::event("GITHUB_EVENT_PATH is not set")),
        };

        Self::parse(&name, &payload)
    }

    /// Parse an event from its name and raw JSON payload.
    ///
    /// `pull_request_target` is handled identically to `pull_request`: both
    /// deliver a PR title to validate.
    pub fn parse(name: &str, payload: &str) -> Result<Self> {
        match name {
            "pull_request" | "pull_request_target" => {
                let parsed: PullRequestPayload = serde_json::from_str(payload)?;
                Ok(TriggerEvent::PullRequest {
                    title: parsed.pull_request.and_then(|pr| pr.title),
                })
            }
            "push" => {
                let parsed: PushPayload = serde_json::from_str(payload)?;
                let git_ref = parsed
                    .git_ref
                    .ok_or_else(|| ReleaseError::event("push payload has no 'ref' field"))?;
                // Force-pushes and branch deletions still carry `after`;
                // GITHUB_SHA covers payloads that omit it.
                let head_sha = parsed
                    .after
                    .or_else(|| env::var("GITHUB_SHA").ok())
                    .ok_or_else(|| ReleaseError::event("cannot determine push head commit"))?;

                Ok(TriggerEvent::Push {
                    git_ref,
                    head_sha,
                    default_branch: parsed.repository.and_then(|r| r.default_branch),
                })
            }
            other => Ok(TriggerEvent::Other(other.to_string())),
        }
    }
}
