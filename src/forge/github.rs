use crate::error::{ReleaseError, Result};
use crate::forge::{CommitInfo, Forge, GitObject, Release, ReleaseNotes, ReleaseParams, TagEntry};
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::{json, Map, Value};

const ACCEPT_JSON: &str = "application/vnd.github+json";

/// Listing endpoints are read once with the maximum page size; results past
/// the first page are a known limitation.
const PAGE_LIMIT: u32 = 100;

/// GitHub REST implementation of [Forge].
pub struct GitHubForge {
    client: Client,
    api_url: String,
    repository: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct RefResponse {
    object: GitObject,
}

#[derive(Debug, Deserialize)]
struct TagObjectResponse {
    object: GitObject,
}

#[derive(Debug, Deserialize)]
struct ApiCommit {
    sha: String,
    commit: ApiCommitDetail,
}

#[derive(Debug, Deserialize)]
struct ApiCommitDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CompareResponse {
    commits: Vec<ApiCommit>,
}

impl GitHubForge {
    /// Build a client for one repository.
    ///
    /// # Arguments
    /// * `api_url` - REST base URL (e.g. `https://api.github.com`)
    /// * `repository` - `owner/repo` slug
    /// * `token` - API credential used as a bearer token
    pub fn new(api_url: &str, repository: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("conventional-release/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(GitHubForge {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            repository: repository.to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/repos/{}{}", self.api_url, self.repository, path)
    }

    fn get(&self, path: &str) -> Result<Response> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.token)
            .header(ACCEPT, ACCEPT_JSON)
            .send()?;
        check(response, path)
    }

    fn post(&self, path: &str, body: &Value) -> Result<Response> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.token)
            .header(ACCEPT, ACCEPT_JSON)
            .json(body)
            .send()?;
        check(response, path)
    }

    fn patch(&self, path: &str, body: &Value) -> Result<Response> {
        let response = self
            .client
            .patch(self.url(path))
            .bearer_auth(&self.token)
            .header(ACCEPT, ACCEPT_JSON)
            .json(body)
            .send()?;
        check(response, path)
    }
}

/// Map non-2xx responses to an API error carrying status and body.
fn check(response: Response, path: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().unwrap_or_default();
        Err(ReleaseError::api(format!(
            "{} returned {}: {}",
            path, status, body
        )))
    }
}

/// Build a release request body, omitting absent fields so updates preserve
/// the existing values.
fn release_body(params: &ReleaseParams, include_tag: bool) -> Value {
    let mut map = Map::new();
    if include_tag {
        map.insert("tag_name".to_string(), json!(params.tag_name));
    }
    if let Some(ref target) = params.target_commitish {
        map.insert("target_commitish".to_string(), json!(target));
    }
    if let Some(ref name) = params.name {
        map.insert("name".to_string(), json!(name));
    }
    if let Some(ref body) = params.body {
        map.insert("body".to_string(), json!(body));
    }
    if let Some(draft) = params.draft {
        map.insert("draft".to_string(), json!(draft));
    }
    if let Some(prerelease) = params.prerelease {
        map.insert("prerelease".to_string(), json!(prerelease));
    }
    if params.generate_release_notes {
        map.insert("generate_release_notes".to_string(), json!(true));
    }
    Value::Object(map)
}

impl Forge for GitHubForge {
    fn list_tags(&self) -> Result<Vec<TagEntry>> {
        let tags = self
            .get(&format!("/tags?per_page={}", PAGE_LIMIT))?
            .json::<Vec<TagEntry>>()?;
        Ok(tags)
    }

    fn list_commits(&self, git_ref: &str) -> Result<Vec<CommitInfo>> {
        let commits = self
            .get(&format!("/commits?sha={}&per_page={}", git_ref, PAGE_LIMIT))?
            .json::<Vec<ApiCommit>>()?;

        Ok(commits
            .into_iter()
            .map(|c| CommitInfo {
                sha: c.sha,
                message: c.commit.message,
            })
            .collect())
    }

    fn get_ref(&self, tag_name: &str) -> Result<GitObject> {
        let response = self
            .get(&format!("/git/ref/tags/{}", tag_name))?
            .json::<RefResponse>()?;
        Ok(response.object)
    }

    fn get_tag_object(&self, sha: &str) -> Result<GitObject> {
        let response = self
            .get(&format!("/git/tags/{}", sha))?
            .json::<TagObjectResponse>()?;
        Ok(response.object)
    }

    fn compare(&self, base: &str, head: &str) -> Result<Vec<CommitInfo>> {
        let response = self
            .get(&format!("/compare/{}...{}", base, head))?
            .json::<CompareResponse>()?;

        Ok(response
            .commits
            .into_iter()
            .map(|c| CommitInfo {
                sha: c.sha,
                message: c.commit.message,
            })
            .collect())
    }

    fn create_ref(&self, refname: &str, sha: &str) -> Result<()> {
        self.post("/git/refs", &json!({ "ref": refname, "sha": sha }))?;
        Ok(())
    }

    fn force_update_ref(&self, tag_name: &str, sha: &str) -> Result<()> {
        self.patch(
            &format!("/git/refs/tags/{}", tag_name),
            &json!({ "sha": sha, "force": true }),
        )?;
        Ok(())
    }

    fn generate_release_notes(
        &self,
        tag_name: &str,
        previous_tag: Option<&str>,
        target: &str,
    ) -> Result<ReleaseNotes> {
        let mut body = Map::new();
        body.insert("tag_name".to_string(), json!(tag_name));
        body.insert("target_commitish".to_string(), json!(target));
        if let Some(previous) = previous_tag {
            body.insert("previous_tag_name".to_string(), json!(previous));
        }

        let notes = self
            .post("/releases/generate-notes", &Value::Object(body))?
            .json::<ReleaseNotes>()?;
        Ok(notes)
    }

    fn create_release(&self, params: &ReleaseParams) -> Result<Release> {
        let release = self
            .post("/releases", &release_body(params, true))?
            .json::<Release>()?;
        Ok(release)
    }

    fn release_by_tag(&self, tag_name: &str) -> Result<Release> {
        let release = self
            .get(&format!("/releases/tags/{}", tag_name))?
            .json::<Release>()?;
        Ok(release)
    }

    fn update_release(&self, id: u64, params: &ReleaseParams) -> Result<Release> {
        let release = self
            .patch(&format!("/releases/{}", id), &release_body(params, false))?
            .json::<Release>()?;
        Ok(release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_repo_path() {
        let forge = GitHubForge::new("https://api.github.com/", "octo/repo", "t").unwrap();
        assert_eq!(
            forge.url("/tags?per_page=100"),
            "https://api.github.com/repos/octo/repo/tags?per_page=100"
        );
    }

    #[test]
    fn test_release_body_skips_absent_fields() {
        let params = ReleaseParams {
            tag_name: "v1.0.0".to_string(),
            name: Some("v1.0.0".to_string()),
            ..Default::default()
        };

        let body = release_body(&params, true);
        assert_eq!(body["tag_name"], "v1.0.0");
        assert_eq!(body["name"], "v1.0.0");
        assert!(body.get("body").is_none());
        assert!(body.get("draft").is_none());
        assert!(body.get("generate_release_notes").is_none());
    }

    #[test]
    fn test_release_body_update_omits_tag() {
        let params = ReleaseParams {
            tag_name: "v1.0.0".to_string(),
            body: Some("notes".to_string()),
            draft: Some(false),
            ..Default::default()
        };

        let body = release_body(&params, false);
        assert!(body.get("tag_name").is_none());
        assert_eq!(body["body"], "notes");
        assert_eq!(body["draft"], false);
    }
}
