//! Completion API integration
//!
//! This module defines the [`CompletionClient`] seam used by the insight
//! generator and its OpenAI implementation, [`OpenAIAgent`].

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use crate::error::{InsightError, Result};

pub mod analysis;

pub use analysis::{build_prompt, InsightGenerator};

/// A chat-completion backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends one system message and one user message; returns the reply text
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// Configuration for the OpenAI agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Model to use for analysis
    pub model: String,
    /// Base URL of the OpenAI-compatible API
    pub api_base: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
        }
    }
}

/// OpenAI chat-completions client wrapper
#[derive(Clone)]
pub struct OpenAIAgent {
    client: Client<OpenAIConfig>,
    config: AgentConfig,
}

impl OpenAIAgent {
    /// Create a new OpenAI agent
    ///
    /// Each completion is attempted once: a failed call surfaces immediately
    /// instead of being retried with backoff.
    pub fn new(api_key: &str, config: AgentConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(config.api_base.clone());
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Self {
            client: Client::with_config(openai_config).with_backoff(no_retry),
            config,
        }
    }

    /// Create an agent from the application configuration
    pub fn from_config(config: &crate::Config) -> Result<Self> {
        let api_key = config.openai_api_key()?;
        Ok(Self::new(
            api_key,
            AgentConfig {
                model: config.model.clone(),
                api_base: config.openai_api_base.clone(),
            },
        ))
    }

    /// Model identifier sent with each request
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl CompletionClient for OpenAIAgent {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into(),
        ];
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.config.model.as_str())
            .messages(messages)
            .build()?;

        debug!(
            "Requesting completion from {} ({} prompt chars)",
            self.config.model,
            prompt.chars().count()
        );
        let response = self.client.chat().create(request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| InsightError::CompletionApi("response contained no message content".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_config_default() {
        let config = AgentConfig::default();
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.api_base, "https://api.openai.com/v1");
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = crate::Config::default();
        assert!(matches!(OpenAIAgent::from_config(&config), Err(InsightError::Config(_))));
    }

    #[test]
    fn test_from_config_uses_model() {
        let mut config = crate::Config::default();
        config.api_keys.openai_api_key = Some("sk-test".into());
        config.model = "gpt-4o-mini".into();
        let agent = OpenAIAgent::from_config(&config).unwrap();
        assert_eq!(agent.model(), "gpt-4o-mini");
    }
}
