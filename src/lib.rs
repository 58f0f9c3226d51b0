#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]

//! commit-insights - business insights from recent GitHub commit activity
//!
//! This library lists every repository of a GitHub account, collects the
//! commits made inside a trailing window and asks a chat-completion model for
//! a single business-opportunity analysis of the whole batch.
//!
//! ## Usage
//! ```rust,ignore
//! use commit_insights::{AnalysisOrchestrator, Config, GitHubClient, InsightGenerator, OpenAIAgent};
//! use std::sync::Arc;
//!
//! async fn example() -> commit_insights::Result<()> {
//!     let config = Config::from_env()?;
//!     let source = Arc::new(GitHubClient::from_config(&config)?);
//!     let agent = Arc::new(OpenAIAgent::from_config(&config)?);
//!     let orchestrator = AnalysisOrchestrator::new(
//!         source,
//!         InsightGenerator::new(agent, config.max_prompt_chars),
//!     );
//!
//!     let outcome = orchestrator.analyze("https://github.com/rust-lang", 7).await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

/// Configuration module for the application
pub mod config;
/// Error handling types and utilities
pub mod error;
/// Logging configuration and utilities
pub mod logging;
/// GitHub URL parsing and REST access
pub mod github;
/// Completion API client and insight generation
pub mod agents;
/// Fixed prompt text
pub mod prompts;
/// End-to-end analysis pipeline
pub mod orchestrator;
/// REST API functionality for web service
pub mod api;

// Re-export common types
pub use config::Config;
pub use error::{InsightError, Result};
pub use github::{parse_github_url, CommitRecord, CommitSource, GitHubClient, RepoReference};
pub use agents::{CompletionClient, InsightGenerator, OpenAIAgent};
pub use orchestrator::{AnalysisOrchestrator, AnalysisOutcome, AnalysisReport, RepoFetch};
