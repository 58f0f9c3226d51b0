use std::io;
use thiserror::Error;
use async_openai::error::OpenAIError;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, InsightError>;

/// Errors that can occur while fetching commits or generating insights
#[derive(Debug, Error)]
pub enum InsightError {
    /// Malformed or missing user input (URL, window size)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// GitHub answered with a non-success status
    #[error("GitHub API error: {status} from {url}: {message}")]
    RemoteApi {
        /// HTTP status code returned by GitHub
        status: u16,
        /// Request URL, without query string
        url: String,
        /// Body text or reason phrase
        message: String,
    },

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The completion API returned something unusable
    #[error("Completion API error: {0}")]
    CompletionApi(String),

    /// OpenAI client errors
    #[error("OpenAI error: {0}")]
    OpenAI(#[from] OpenAIError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),
}

impl InsightError {
    /// Creates an input validation error with the specified message
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Checks if this error was caused by the caller rather than by a remote
    /// service or the local environment
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = InsightError::invalid_input("empty owner");
        assert!(matches!(error, InsightError::InvalidInput(_)));
        assert_eq!(error.to_string(), "Invalid input: empty owner");
    }

    #[test]
    fn test_is_client_error() {
        let client = InsightError::invalid_input("bad url");
        let remote = InsightError::RemoteApi {
            status: 404,
            url: "https://api.github.com/users/ghost/repos".into(),
            message: "Not Found".into(),
        };

        assert!(client.is_client_error());
        assert!(!remote.is_client_error());
        assert!(!InsightError::CompletionApi("no choices".into()).is_client_error());
    }

    #[test]
    fn test_remote_api_message() {
        let error = InsightError::RemoteApi {
            status: 409,
            url: "https://api.github.com/repos/acme/empty/commits".into(),
            message: "Git Repository is empty.".into(),
        };
        assert_eq!(
            error.to_string(),
            "GitHub API error: 409 from https://api.github.com/repos/acme/empty/commits: Git Repository is empty."
        );
    }
}
