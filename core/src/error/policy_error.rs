// core/src/error/policy_error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("invalid operation pattern `{pattern}` in {list}")]
    InvalidPattern {
        list: &'static str,
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}
