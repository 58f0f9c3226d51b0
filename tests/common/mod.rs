#![allow(dead_code)]

use async_trait::async_trait;
use commit_insights::{CompletionClient, GitHubClient, Result};
use mockito::{Matcher, Mock, ServerGuard};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub mod test_helpers {
    use super::*;

    pub const TEST_TOKEN: &str = "test-token";

    pub fn setup_test_logger() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    }

    pub fn github_client(server: &ServerGuard) -> GitHubClient {
        GitHubClient::new(server.url(), Some(TEST_TOKEN.to_string()), Duration::from_secs(5))
            .expect("Failed to build GitHub client")
    }

    pub fn repos_body(names: &[&str]) -> String {
        let repos: Vec<_> = names
            .iter()
            .map(|name| json!({ "name": name, "full_name": format!("acme/{}", name), "fork": false }))
            .collect();
        json!(repos).to_string()
    }

    pub fn commits_body(messages: &[&str]) -> String {
        let commits: Vec<_> = messages
            .iter()
            .enumerate()
            .map(|(i, message)| {
                json!({
                    "sha": format!("{:040x}", i + 1),
                    "commit": {
                        "message": message,
                        "author": { "name": "dev", "date": "2024-03-09T10:00:00Z" }
                    }
                })
            })
            .collect();
        json!(commits).to_string()
    }

    /// Mocks the paginated repository listing: one mock per page, then an empty page
    pub async fn mock_repo_pages(server: &mut ServerGuard, owner: &str, pages: &[&[&str]]) -> Vec<Mock> {
        let path = format!("/users/{}/repos", owner);
        let empty: &[&str] = &[];
        let mut mocks = Vec::new();
        for (i, names) in pages.iter().copied().chain(std::iter::once(empty)).enumerate() {
            let mock = server
                .mock("GET", path.as_str())
                .match_query(Matcher::UrlEncoded("page".into(), (i + 1).to_string()))
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(repos_body(names))
                .create_async()
                .await;
            mocks.push(mock);
        }
        mocks
    }

    pub async fn mock_commits(server: &mut ServerGuard, owner: &str, repo: &str, messages: &[&str]) -> Mock {
        server
            .mock("GET", format!("/repos/{}/{}/commits", owner, repo).as_str())
            .match_query(Matcher::Regex("since=".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(commits_body(messages))
            .create_async()
            .await
    }

    /// Mocks a commit listing that records the `since` value of every request
    pub async fn mock_commits_recording_since(
        server: &mut ServerGuard,
        owner: &str,
        repo: &str,
        messages: &[&str],
    ) -> (Mock, Arc<Mutex<Vec<DateTime<Utc>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let body = commits_body(messages);

        let mock = server
            .mock("GET", format!("/repos/{}/{}/commits", owner, repo).as_str())
            .match_query(Matcher::Regex("since=".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body_from_request(move |request| {
                let query = request.path_and_query().split_once('?').map(|(_, q)| q).unwrap_or("");
                let since = url::form_urlencoded::parse(query.as_bytes())
                    .find(|(key, _)| key == "since")
                    .and_then(|(_, value)| DateTime::parse_from_rfc3339(&value).ok());
                if let Some(since) = since {
                    recorder.lock().unwrap().push(since.with_timezone(&Utc));
                }
                body.clone().into_bytes()
            })
            .create_async()
            .await;

        (mock, seen)
    }
}

/// Completion client that records prompts and replies with fixed text
pub struct RecordingCompletion {
    reply: String,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl RecordingCompletion {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionClient for RecordingCompletion {
    async fn complete(&self, _system: &str, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}
