//! Prompt assembly and the single completion call per analysis.

use std::sync::Arc;
use tracing::info;
use super::CompletionClient;
use crate::error::Result;
use crate::github::CommitRecord;
use crate::prompts::{ANALYSIS_INSTRUCTIONS, SYSTEM_ROLE};

/// Builds the prompt for a batch of commits
///
/// The commit section holds at most `max_chars` characters. Whole entries are
/// kept in order; once the next entry would not fit, the remainder is
/// summarized in a single "omitted" line. The first entry is always kept,
/// cut to `max_chars` if it alone is too long.
pub fn build_prompt(commits: &[CommitRecord], max_chars: usize) -> String {
    let mut prompt = String::new();
    let mut used = 0;
    let mut included = 0;

    for commit in commits {
        let entry = format!("[{}] Commit: {}", commit.repo, commit.message.trim_end());
        let separator = usize::from(included > 0);
        let len = entry.chars().count();

        if used + separator + len > max_chars {
            if included == 0 {
                prompt.extend(entry.chars().take(max_chars));
                included = 1;
            }
            break;
        }

        if separator == 1 {
            prompt.push('\n');
        }
        prompt.push_str(&entry);
        used += separator + len;
        included += 1;
    }

    let omitted = commits.len() - included;
    if omitted > 0 {
        prompt.push_str(&format!("\n... ({} more commits omitted)", omitted));
    }

    prompt.push_str(ANALYSIS_INSTRUCTIONS);
    prompt
}

/// Turns aggregated commits into a free-text analysis
#[derive(Clone)]
pub struct InsightGenerator {
    client: Arc<dyn CompletionClient>,
    max_prompt_chars: usize,
}

impl InsightGenerator {
    /// Create a generator over the given completion backend
    pub fn new(client: Arc<dyn CompletionClient>, max_prompt_chars: usize) -> Self {
        Self { client, max_prompt_chars }
    }

    /// Requests one analysis covering every commit; the reply is returned verbatim
    pub async fn generate(&self, commits: &[CommitRecord]) -> Result<String> {
        let prompt = build_prompt(commits, self.max_prompt_chars);
        info!(
            "Generating insights for {} commits ({} prompt chars)",
            commits.len(),
            prompt.chars().count()
        );
        self.client.complete(SYSTEM_ROLE, &prompt).await
    }
}
