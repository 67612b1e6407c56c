//! Error types for Cognito Core
//!
//! Provides a unified error type for all backend operations.

use std::time::Duration;
use thiserror::Error;

/// Result type for Cognito Core operations
pub type Result<T> = std::result::Result<T, CognitoError>;

/// Unified error type for Cognito Core
#[derive(Error, Debug)]
pub enum CognitoError {
    /// Configuration error, fatal at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// A pipeline stage did not finish within its budget
    #[error("{stage} stage timed out after {limit:?}")]
    Timeout {
        stage: &'static str,
        limit: Duration,
    },

    /// A pipeline stage panicked or its worker was lost
    #[error("{stage} stage failed: {message}")]
    Task { stage: &'static str, message: String },
}

impl CognitoError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        CognitoError::Config(msg.into())
    }

    /// Create a task failure for a named stage
    pub fn task(stage: &'static str, msg: impl Into<String>) -> Self {
        CognitoError::Task {
            stage,
            message: msg.into(),
        }
    }
}
