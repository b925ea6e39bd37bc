// core/src/error/service_error.rs
use thiserror::Error;

/// Failure reported by a session handle while executing an operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{code}: {message}")]
    Service {
        status: Option<u16>,
        code: String,
        message: String,
        retryable: bool,
    },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("response decode error: {0}")]
    Decode(String),
}

impl ServiceError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Service {
            status: None,
            code: code.into(),
            message: message.into(),
            retryable: false,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Timeout { .. } | ServiceError::Transport(_) => true,
            ServiceError::Service { retryable, .. } => *retryable,
            ServiceError::InvalidParams(_) | ServiceError::Decode(_) => false,
        }
    }
}
