use crate::agents::InsightGenerator;
use crate::error::{InsightError, Result};
use crate::github::{parse_github_url, CommitRecord, CommitSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Largest window accepted, in days
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// Outcome of fetching commits for a single repository
#[derive(Debug, Clone, PartialEq)]
pub enum RepoFetch {
    /// Commits were listed (possibly none)
    Fetched {
        /// Repository name
        repo: String,
        /// Commits inside the window, in API order
        commits: Vec<CommitRecord>,
    },
    /// The listing failed; the repository is skipped
    Failed {
        /// Repository name
        repo: String,
        /// Error message from the failed listing
        reason: String,
    },
}

impl RepoFetch {
    /// Name of the repository this outcome belongs to
    pub fn repo(&self) -> &str {
        match self {
            Self::Fetched { repo, .. } | Self::Failed { repo, .. } => repo,
        }
    }
}

/// Summary returned once the language model has produced its analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Account that was analyzed
    pub owner: String,
    /// Number of repositories listed for the account
    pub repos_analyzed: usize,
    /// Number of commits included in the prompt's source data
    pub commits_analyzed: usize,
    /// Model output, verbatim
    pub analysis: String,
}

/// Result of one end-to-end analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Commits were found and analyzed
    Completed {
        /// The analysis and its counts
        report: AnalysisReport,
        /// Repositories whose commits could not be listed
        skipped: Vec<RepoFetch>,
    },
    /// No repository had commits inside the window; the model was not called
    NoCommits {
        /// Account that was analyzed
        owner: String,
        /// Number of repositories listed for the account
        repos_analyzed: usize,
        /// Repositories whose commits could not be listed
        skipped: Vec<RepoFetch>,
    },
}

impl AnalysisOutcome {
    /// Repositories whose commit listing failed
    pub fn skipped(&self) -> &[RepoFetch] {
        match self {
            Self::Completed { skipped, .. } | Self::NoCommits { skipped, .. } => skipped,
        }
    }
}

/// Runs the fetch-then-analyze pipeline for one account at a time
///
/// Each call is independent and strictly sequential: repositories are listed,
/// then queried one after another, then the model is called at most once.
#[derive(Clone)]
pub struct AnalysisOrchestrator {
    source: Arc<dyn CommitSource>,
    insights: InsightGenerator,
}

impl AnalysisOrchestrator {
    /// Wires a commit source and an insight generator together
    pub fn new(source: Arc<dyn CommitSource>, insights: InsightGenerator) -> Self {
        Self { source, insights }
    }

    /// Analyzes every repository of the account named by `github_url`
    ///
    /// Any repository segment in the URL is ignored; the whole account is
    /// analyzed.
    pub async fn analyze(&self, github_url: &str, days: u32) -> Result<AnalysisOutcome> {
        if days > MAX_WINDOW_DAYS {
            return Err(InsightError::invalid_input(format!(
                "days must be between 0 and {}, got {}",
                MAX_WINDOW_DAYS, days
            )));
        }

        let reference = parse_github_url(github_url)?;
        let owner = reference.owner;
        info!("Analyzing {} over the last {} days", owner, days);

        let repos = self.source.list_repositories(&owner).await?;
        info!("Found {} repositories for {}", repos.len(), owner);

        let fetches = self.fetch_all(&owner, &repos, days).await;

        let mut commits = Vec::new();
        let mut skipped = Vec::new();
        for fetch in fetches {
            match fetch {
                RepoFetch::Fetched { commits: found, .. } => commits.extend(found),
                failed @ RepoFetch::Failed { .. } => skipped.push(failed),
            }
        }

        if commits.is_empty() {
            info!("No commits found for {} in the last {} days", owner, days);
            return Ok(AnalysisOutcome::NoCommits {
                owner,
                repos_analyzed: repos.len(),
                skipped,
            });
        }

        let analysis = self.insights.generate(&commits).await?;

        Ok(AnalysisOutcome::Completed {
            report: AnalysisReport {
                owner,
                repos_analyzed: repos.len(),
                commits_analyzed: commits.len(),
                analysis,
            },
            skipped,
        })
    }

    /// Lists recent commits for each repository in turn, recording failures
    /// instead of aborting
    pub async fn fetch_all(&self, owner: &str, repos: &[String], days: u32) -> Vec<RepoFetch> {
        let mut fetches = Vec::with_capacity(repos.len());

        for repo in repos {
            let fetch = match self.source.list_recent_commits(owner, repo, days).await {
                Ok(commits) => RepoFetch::Fetched {
                    repo: repo.clone(),
                    commits,
                },
                Err(e) => {
                    warn!("Error fetching commits from {}: {}", repo, e);
                    RepoFetch::Failed {
                        repo: repo.clone(),
                        reason: e.to_string(),
                    }
                }
            };
            fetches.push(fetch);
        }

        fetches
    }
}
