//! Extraction of an account (and optional repository) from user input.
//!
//! Supported formats:
//!   - `https://github.com/owner/repo`
//!   - `http://www.github.com/owner/repo.git`
//!   - `github.com/owner`
//!   - `owner/repo`, `owner`

use crate::error::{InsightError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Account and optional repository named by a GitHub URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoReference {
    /// User or organization name
    pub owner: String,
    /// Repository name, when the URL pointed at one
    pub repo: Option<String>,
}

impl fmt::Display for RepoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repo {
            Some(repo) => write!(f, "{}/{}", self.owner, repo),
            None => f.write_str(&self.owner),
        }
    }
}

/// Parses a GitHub URL or `owner[/repo]` shorthand
pub fn parse_github_url(input: &str) -> Result<RepoReference> {
    let trimmed = unquote(input.trim());
    let parsed = Url::parse(&absolute_url(trimmed)?)
        .map_err(|e| InsightError::invalid_input(format!("Invalid GitHub URL {:?}: {}", input.trim(), e)))?;

    let host = parsed.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    if !matches!(parsed.scheme(), "http" | "https") || host != "github.com" {
        return Err(not_github(input));
    }

    let mut segments = parsed
        .path_segments()
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty());

    let owner = segments.next().ok_or_else(|| {
        InsightError::invalid_input(format!("Invalid GitHub URL, no account found: {:?}", input))
    })?;
    let repo = segments
        .next()
        .map(|repo| repo.strip_suffix(".git").unwrap_or(repo))
        .filter(|repo| !repo.is_empty())
        .map(str::to_string);

    Ok(RepoReference {
        owner: owner.to_string(),
        repo,
    })
}

/// Turns host-relative and shorthand input into a full URL
fn absolute_url(value: &str) -> Result<String> {
    if value.contains("://") {
        return Ok(value.to_string());
    }

    let first = value.trim_start_matches('/').split('/').next().unwrap_or_default();
    let host = first.split(':').next().unwrap_or(first).to_ascii_lowercase();
    if host == "github.com" || host == "www.github.com" {
        Ok(format!("https://{}", value))
    } else if first.contains('.') {
        // Account names cannot contain dots
        Err(not_github(value))
    } else {
        Ok(format!("https://github.com/{}", value.trim_start_matches('/')))
    }
}

fn not_github(input: &str) -> InsightError {
    InsightError::invalid_input(format!("Not a GitHub URL: {}", input.trim()))
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
