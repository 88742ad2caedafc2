use thiserror::Error;

/// Configuration errors are the "fail fast at startup" kind of spec.md
/// §7 error kind 1: a bad config never reaches the event loop.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    #[error("failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("configuration validation error: {0}")]
    ValidationError(String),
}

impl ConfigError {
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::ValidationError(msg.into())
    }
}
