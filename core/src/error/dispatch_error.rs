// core/src/error/dispatch_error.rs
use thiserror::Error;

use super::ServiceError;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown command `{command}` (not an operation of session `{session}`)")]
    Resolution { command: String, session: String },

    #[error("command `{command}` refused: {reason}")]
    PolicyViolation {
        command: String,
        reason: String,
        rule_id: String,
    },

    #[error("command `{command}` failed: {source}")]
    Execution {
        command: String,
        #[source]
        source: ServiceError,
    },
}

impl DispatchError {
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::Resolution { .. } => "ResolutionError",
            DispatchError::PolicyViolation { .. } => "PolicyViolation",
            DispatchError::Execution { .. } => "ExecutionError",
        }
    }

    /// Snake-case outcome label used by the audit trail.
    pub fn outcome(&self) -> &'static str {
        match self {
            DispatchError::Resolution { .. } => "resolution_error",
            DispatchError::PolicyViolation { .. } => "policy_violation",
            DispatchError::Execution { .. } => "execution_error",
        }
    }

    pub fn rule_id(&self) -> Option<&str> {
        match self {
            DispatchError::PolicyViolation { rule_id, .. } => Some(rule_id),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            DispatchError::Execution { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// The string handed back to the agent in place of a result.
    pub fn render(&self) -> String {
        if self.is_retryable() {
            format!("{}: {} (retryable)", self.kind(), self)
        } else {
            format!("{}: {}", self.kind(), self)
        }
    }
}
