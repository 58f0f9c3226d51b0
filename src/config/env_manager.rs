use serde::{Deserialize, Serialize};
use std::fmt;

/// Environment variable holding the GitHub bearer token
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
/// Environment variable holding the OpenAI API key
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Stores API keys for the two remote services
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeys {
    /// GitHub API token for authenticated requests
    pub github_token: Option<String>,
    /// OpenAI API key for chat completions
    pub openai_api_key: Option<String>,
}

impl ApiKeys {
    /// Loads `.env` from the working directory (if any), then reads the keys
    /// from the process environment
    pub fn load() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the keys through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            github_token: non_blank(GITHUB_TOKEN_VAR),
            openai_api_key: non_blank(OPENAI_API_KEY_VAR),
        }
    }

    /// Overlays any key present in `other` on top of this one
    pub fn merge(&mut self, other: ApiKeys) {
        if other.github_token.is_some() {
            self.github_token = other.github_token;
        }
        if other.openai_api_key.is_some() {
            self.openai_api_key = other.openai_api_key;
        }
    }
}

fn redact(value: &Option<String>) -> &'static str {
    if value.is_some() { "<set>" } else { "<unset>" }
}

impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeys")
            .field("github_token", &redact(&self.github_token))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .finish()
    }
}
