// Error types for ghcard.
// Covers GitHub API failures, cache persistence, and configuration loading.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl CardError {
    /// Whether the upstream reported the requested user or repository as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            CardError::NotFound(_) => true,
            CardError::Api(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CardError>;
