use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use s3lens_core::api::LoggingConfig;

use crate::error::CliError;

/// Logs go to stderr so stdout stays reserved for command output. The
/// returned guard must live until exit or buffered file logs are lost.
pub fn init(cfg: &LoggingConfig) -> Result<Option<WorkerGuard>, CliError> {
    let filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), &cfg.level)?;
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    match cfg.directory.as_deref() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, &cfg.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()
                .map_err(|e| CliError::Logging(e.to_string()))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .try_init()
                .map_err(|e| CliError::Logging(e.to_string()))?;
            Ok(None)
        }
    }
}

/// `RUST_LOG` wins when it parses; otherwise the configured level applies.
fn build_filter(env_directives: Option<&str>, level: &str) -> Result<EnvFilter, CliError> {
    if let Some(directives) = env_directives.filter(|d| !d.trim().is_empty()) {
        match EnvFilter::try_new(directives) {
            Ok(f) => return Ok(f),
            Err(e) => eprintln!("s3lens: ignoring invalid RUST_LOG `{directives}`: {e}"),
        }
    }
    EnvFilter::try_new(level)
        .map_err(|e| CliError::Logging(format!("invalid level `{level}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn configured_level_applies_without_env() {
        let f = build_filter(None, "debug").unwrap();
        assert_eq!(f.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn env_directives_take_precedence() {
        let f = build_filter(Some("s3lens=trace"), "info").unwrap();
        assert_eq!(f.max_level_hint(), Some(LevelFilter::TRACE));

        let f = build_filter(Some("  "), "warn").unwrap();
        assert_eq!(f.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn unparsable_level_is_a_logging_error() {
        let err = build_filter(None, "s3lens=verbose").unwrap_err();
        assert!(matches!(err, CliError::Logging(_)), "{err}");
    }

    // The only test in this binary that installs the global subscriber.
    #[test]
    fn file_logging_returns_a_guard_and_creates_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = LoggingConfig {
            level: "info".into(),
            directory: Some(dir.path().display().to_string()),
            file_prefix: "s3lens.log".into(),
        };
        let guard = init(&cfg).unwrap();
        assert!(guard.is_some());

        tracing::info!(target: "s3lens.cli", "file logging initialised");
        drop(guard);

        let written = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .any(|e| e.file_name().to_string_lossy().starts_with("s3lens.log"));
        assert!(written);
    }
}
