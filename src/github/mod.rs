//! GitHub REST access: repository listing and recent-commit listing.

mod url;

pub use self::url::{parse_github_url, RepoReference};

use crate::error::{InsightError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, SecondsFormat, Utc};
use reqwest::{header, Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("commit-insights/", env!("CARGO_PKG_VERSION"));

/// A commit as consumed by the insight generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Repository the commit belongs to
    pub repo: String,
    /// Commit SHA
    pub sha: String,
    /// Full commit message
    pub message: String,
}

/// Source of repositories and commits for an account
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// Lists the names of every repository owned by `owner`
    async fn list_repositories(&self, owner: &str) -> Result<Vec<String>>;

    /// Lists commits in `owner/repo` made within the last `days` days
    async fn list_recent_commits(&self, owner: &str, repo: &str, days: u32) -> Result<Vec<CommitRecord>>;
}

/// Computes the oldest timestamp a commit may carry to fall inside the window
pub fn commit_cutoff(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_sub_signed(ChronoDuration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Repository entry as returned by the repositories-list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    /// Repository name, without the owner
    pub name: String,
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
struct ApiErrorBody {
    message: String,
}

/// [`CommitSource`] backed by the GitHub REST API
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Creates a client for the API at `base_url`, authenticating with
    /// `token` as a bearer token when present
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Builds a client from the application configuration
    pub fn from_config(config: &crate::Config) -> Result<Self> {
        Self::new(
            config.github_api_base.clone(),
            config.github_token().map(str::to_string),
            config.http_timeout(),
        )
    }

    /// Fetches one page of the account's repositories (pages start at 1)
    pub async fn get_repository_page(&self, owner: &str, page: u32) -> Result<Vec<Repository>> {
        let url = format!("{}/users/{}/repos", self.base_url, owner);
        let response = self.get(&url).query(&[("page", page)]).send().await?;
        let response = check_status(response, &url).await?;
        Ok(response.json::<Vec<Repository>>().await?)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl CommitSource for GitHubClient {
    async fn list_repositories(&self, owner: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut page = 1;

        loop {
            let repos = self.get_repository_page(owner, page).await?;
            if repos.is_empty() {
                break;
            }
            debug!("Page {} of {} listed {} repositories", page, owner, repos.len());
            names.extend(repos.into_iter().map(|repo| repo.name));
            page += 1;
        }

        Ok(names)
    }

    async fn list_recent_commits(&self, owner: &str, repo: &str, days: u32) -> Result<Vec<CommitRecord>> {
        let since = commit_cutoff(Utc::now(), days).to_rfc3339_opts(SecondsFormat::Secs, true);
        let url = format!("{}/repos/{}/{}/commits", self.base_url, owner, repo);

        let response = self.get(&url).query(&[("since", since.as_str())]).send().await?;
        let response = check_status(response, &url).await?;
        let commits = response.json::<Vec<ApiCommit>>().await?;

        Ok(commits
            .into_iter()
            .map(|c| CommitRecord {
                repo: repo.to_string(),
                sha: c.sha,
                message: c.commit.message,
            })
            .collect())
    }
}

async fn check_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body
            }
        });

    Err(InsightError::RemoteApi {
        status: status.as_u16(),
        url: url.to_string(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_cutoff_subtracts_whole_days() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(commit_cutoff(now, 7), Utc.with_ymd_and_hms(2024, 3, 3, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_zero_day_window_is_now() {
        let now = Utc::now();
        assert_eq!(commit_cutoff(now, 0), now);
    }

    #[test]
    fn test_base_url_trailing_slash_removed() {
        let client = GitHubClient::new("http://localhost:1234/", None, Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://localhost:1234");
    }

    #[test]
    fn test_repository_payload_keeps_name() {
        let body = r#"[{"id":1,"name":"widgets","full_name":"acme/widgets","fork":true,"archived":false}]"#;
        let repos: Vec<Repository> = serde_json::from_str(body).unwrap();
        assert_eq!(repos[0].name, "widgets");
    }

    #[test]
    fn test_commit_payload_shape() {
        let body = r#"[{"sha":"abc123","commit":{"message":"Add bridge","author":{"name":"x"}},"html_url":"h"}]"#;
        let commits: Vec<ApiCommit> = serde_json::from_str(body).unwrap();
        assert_eq!(commits[0].sha, "abc123");
        assert_eq!(commits[0].commit.message, "Add bridge");
    }
}
