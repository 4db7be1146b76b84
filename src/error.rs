//! Error types shared by the feed and enrichment clients
//!
//! Configuration problems are kept apart from network problems so the UI can
//! tell the user to fix their environment instead of "try again later".

use thiserror::Error;

use crate::config::API_KEY_VAR;

/// Missing or unusable configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No NASA API key was provided
    #[error("NASA API key not found: set {} in the environment or .env", API_KEY_VAR)]
    MissingApiKey,
}

/// Errors talking to a remote HTTP API
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Connection, TLS or body read failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// Response body was not the JSON we expected
    #[error("Failed to parse JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request URL could not be built
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

/// Errors returned by the feed operations
#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        FeedError::Network(NetworkError::Transport(err))
    }
}

impl FeedError {
    /// Returns true if the failure came from configuration, not the network
    pub fn is_config(&self) -> bool {
        matches!(self, FeedError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_message_names_variable() {
        let err = FeedError::from(ConfigError::MissingApiKey);
        assert!(err.is_config());
        assert!(err.to_string().contains("NASA_API_KEY"));
    }

    #[test]
    fn test_status_error_is_network() {
        let err = FeedError::from(NetworkError::Status(503));
        assert!(!err.is_config());
        assert!(err.to_string().contains("503"));
    }
}
