//! LLM error types

use thiserror::Error;

/// Error type for LLM operations
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    /// Network/connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// API error (authentication, bad request, server fault)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limited
    #[error("Rate limited by provider")]
    RateLimited { retry_after: Option<u64> },

    /// Response arrived but did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ureq::Error> for LlmError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let retry_after = response
                    .header("retry-after")
                    .and_then(|v| v.trim().parse().ok());
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());
                if status == 429 {
                    LlmError::RateLimited { retry_after }
                } else if status == 401 || status == 403 {
                    LlmError::Api {
                        status,
                        message: "Authentication failed".to_string(),
                    }
                } else {
                    LlmError::Api { status, message }
                }
            }
            ureq::Error::Transport(transport) => LlmError::Connection(transport.to_string()),
        }
    }
}

impl From<std::io::Error> for LlmError {
    fn from(err: std::io::Error) -> Self {
        LlmError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::Internal(format!("JSON error: {}", err))
    }
}
