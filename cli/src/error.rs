use std::error::Error as _;

use thiserror::Error;

use s3lens_core::api::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Setup(#[from] anyhow::Error),

    #[error("{0}")]
    Command(String),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Display form of `err` followed by each underlying cause, `: `-separated.
pub fn report(err: &CliError) -> String {
    let mut out = err.to_string();
    let mut cause = err.source();
    while let Some(c) = cause {
        out.push_str(": ");
        out.push_str(&c.to_string());
        cause = c.source();
    }
    out
}
