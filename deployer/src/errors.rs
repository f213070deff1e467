//! Error types for the deployer

use thiserror::Error;

/// Main error type for the deployer
#[derive(Error, Debug)]
pub enum DeployerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Package (or its artifact listing) could not be resolved
    #[error("Not found: {0}")]
    NotFound(String),

    /// No usable anti-forgery token was returned by the service
    #[error("Token unavailable: {0}")]
    TokenUnavailable(String),

    #[error("Unknown artifact: {0}")]
    UnknownArtifact(String),

    #[error("A batch deployment is already running")]
    AlreadyRunning,

    #[error("No package has been resolved yet")]
    NoSession,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
