mod env_manager;

use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::{InsightError, Result};

pub use env_manager::{ApiKeys, GITHUB_TOKEN_VAR, OPENAI_API_KEY_VAR};

/// Default trailing window, in days, when a request does not name one
pub const DEFAULT_WINDOW_DAYS: u32 = 7;
/// Default cap on the commit section of the prompt, in characters
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 24_000;

/// Main configuration struct for the application
///
/// Holds API credentials, remote endpoints, the model identifier and the
/// server bind address. Values come from an optional TOML file and are then
/// overridden by environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API keys for GitHub and OpenAI
    #[serde(flatten)]
    pub api_keys: ApiKeys,
    /// Base URL of the GitHub REST API
    pub github_api_base: String,
    /// Base URL of the OpenAI-compatible API
    pub openai_api_base: String,
    /// Chat model used for the analysis
    pub model: String,
    /// Window used when a request omits `days`
    pub default_days: u32,
    /// Cap on the commit section of the prompt
    pub max_prompt_chars: usize,
    /// Timeout applied to every GitHub request
    pub http_timeout_secs: u64,
    /// Address the HTTP server listens on
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_keys: ApiKeys::default(),
            github_api_base: "https://api.github.com".to_string(),
            openai_api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            default_days: DEFAULT_WINDOW_DAYS,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
            http_timeout_secs: 30,
            bind_addr: "127.0.0.1:5000".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from an optional TOML file, then applies
    /// `.env` and process environment overrides
    ///
    /// Without a path the defaults are used; a path that cannot be read is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.api_keys.merge(ApiKeys::load());
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the configuration from defaults and the environment only
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Parses a TOML configuration file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            InsightError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            InsightError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Applies non-secret overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup("GITHUB_API_BASE_URL") {
            self.github_api_base = base;
        }
        if let Some(base) = lookup("OPENAI_API_BASE") {
            self.openai_api_base = base;
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            self.model = model;
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(days) = lookup("DEFAULT_WINDOW_DAYS") {
            self.default_days = parse_number("DEFAULT_WINDOW_DAYS", &days)?;
        }
        if let Some(chars) = lookup("MAX_PROMPT_CHARS") {
            self.max_prompt_chars = parse_number("MAX_PROMPT_CHARS", &chars)?;
        }
        if let Some(secs) = lookup("HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = parse_number("HTTP_TIMEOUT_SECS", &secs)?;
        }
        Ok(())
    }

    /// Rejects blank tokens and a zero prompt cap
    pub fn validate(&self) -> Result<()> {
        let keys = [
            (GITHUB_TOKEN_VAR, &self.api_keys.github_token),
            (OPENAI_API_KEY_VAR, &self.api_keys.openai_api_key),
        ];
        for (name, value) in keys {
            if let Some(token) = value {
                if token.trim().is_empty() {
                    return Err(InsightError::Config(format!("{} is empty", name)));
                }
            }
        }
        if self.max_prompt_chars == 0 {
            return Err(InsightError::Config("max_prompt_chars must be positive".into()));
        }
        Ok(())
    }

    /// Retrieves the GitHub token, if one is configured
    pub fn github_token(&self) -> Option<&str> {
        self.api_keys.github_token.as_deref()
    }

    /// Retrieves the OpenAI key; the completion client cannot be built without it
    pub fn openai_api_key(&self) -> Result<&str> {
        self.api_keys.openai_api_key.as_deref().ok_or_else(|| {
            InsightError::Config(format!("{} environment variable not set", OPENAI_API_KEY_VAR))
        })
    }

    /// Timeout for outbound GitHub requests
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| InsightError::Config(format!("{} must be a non-negative integer, got {:?}", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.default_days, 7);
        assert_eq!(config.github_api_base, "https://api.github.com");
        assert!(config.github_token().is_none());
        assert!(config.openai_api_key().is_err());
    }

    #[test]
    fn test_overrides() -> Result<()> {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            "OPENAI_MODEL" => Some("gpt-4o".to_string()),
            "DEFAULT_WINDOW_DAYS" => Some("14".to_string()),
            "BIND_ADDR" => Some("0.0.0.0:8080".to_string()),
            _ => None,
        })?;
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.default_days, 14);
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.max_prompt_chars, DEFAULT_MAX_PROMPT_CHARS);
        Ok(())
    }

    #[test]
    fn test_invalid_numeric_override() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| {
            (key == "DEFAULT_WINDOW_DAYS").then(|| "seven".to_string())
        });
        assert!(matches!(result, Err(InsightError::Config(_))));
    }

    #[test]
    fn test_toml_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "model = \"gpt-4-turbo\"")?;
        writeln!(file, "default_days = 3")?;
        writeln!(file, "github_token = \"ghp_file\"")?;

        let config = Config::from_toml_file(file.path())?;
        assert_eq!(config.model, "gpt-4-turbo");
        assert_eq!(config.default_days, 3);
        assert_eq!(config.github_token(), Some("ghp_file"));
        assert_eq!(config.http_timeout_secs, 30);
        Ok(())
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        let result = Config::load(Some(&missing));
        assert!(matches!(result, Err(InsightError::Config(ref m)) if m.contains("absent.toml")));
    }

    #[test]
    fn test_zero_prompt_cap_rejected() {
        let config = Config {
            max_prompt_chars: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(InsightError::Config(_))));
    }

    #[test]
    fn test_blank_token_rejected() {
        let config = Config {
            api_keys: ApiKeys {
                github_token: Some(" ".into()),
                openai_api_key: None,
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
