//! Error types for Draftr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::llm::LlmError;

/// All error types that can occur in Draftr
#[derive(Debug, Error)]
pub enum DraftrError {
    /// The generate step failed or produced empty content
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The reflect step failed or produced empty content
    #[error("Reflection failed: {0}")]
    Reflection(String),

    /// A run was requested with an empty topic
    #[error("Topic must not be empty")]
    EmptyTopic,

    /// LLM API error at the client boundary
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Archive/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Draftr operations
pub type Result<T> = std::result::Result<T, DraftrError>;
