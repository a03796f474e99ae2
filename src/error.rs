//! Knowledge Engine error types

use thiserror::Error;

/// Knowledge Engine error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Tool invocation error
    #[error("Tool error: {0}")]
    Tool(String),

    /// Agent loop error
    #[error("Agent error: {0}")]
    Agent(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Gateway error
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Knowledge Engine operations
pub type Result<T> = std::result::Result<T, Error>;
