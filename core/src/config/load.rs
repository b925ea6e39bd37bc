use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::{AppConfig, SessionConfig, AUDIT_STDERR_SINK, AUDIT_STDOUT_SINK};

pub const CONFIG_FILE_NAME: &str = "s3lens.toml";

/// Loads configuration from `explicit` if given, otherwise from the first
/// existing default location, otherwise defaults. Env overrides and path
/// expansion are applied last.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_with_source(explicit).map(|(cfg, _)| cfg)
}

/// Like [`load`], also returning the file the config came from (`None` when
/// only defaults applied). Front ends log it once tracing is up.
pub fn load_with_source(
    explicit: Option<&Path>,
) -> Result<(AppConfig, Option<PathBuf>), ConfigError> {
    let source = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            Some(path.to_path_buf())
        }
        None => default_search_paths().into_iter().find(|p| p.exists()),
    };
    let mut cfg = match &source {
        Some(path) => load_from_path(path)?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    expand_paths(&mut cfg);
    validate(&cfg)?;
    Ok((cfg, source))
}

pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let cfg = toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    tracing::debug!(target: "s3lens.config", path = %path.display(), "loaded config file");
    Ok(cfg)
}

pub fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("s3lens").join("config.toml"));
    }
    paths
}

pub fn apply_env_overrides(cfg: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("S3LENS_PROFILE") {
        cfg.profile = v;
    }
    if let Some(v) = non_empty("S3LENS_REGION") {
        cfg.region = v;
    }

    if let SessionConfig::Gateway(ref mut gw) = cfg.session {
        if let Some(v) = non_empty("S3LENS_GATEWAY_URL") {
            gw.base_url = v;
        }
        if let Some(v) = non_empty("S3LENS_GATEWAY_TOKEN") {
            gw.token = Some(v);
        }
    }
}

/// Expands `~` and `$VARS`; unresolvable variables leave the path untouched.
pub fn expand_path(raw: &str) -> String {
    match shellexpand::full(raw) {
        Ok(s) => s.into_owned(),
        Err(_) => shellexpand::tilde(raw).into_owned(),
    }
}

fn expand_paths(cfg: &mut AppConfig) {
    if cfg.audit.path != AUDIT_STDOUT_SINK && cfg.audit.path != AUDIT_STDERR_SINK {
        cfg.audit.path = expand_path(&cfg.audit.path);
    }
    if let Some(dir) = cfg.logging.directory.as_mut() {
        *dir = expand_path(dir);
    }
    if let SessionConfig::Fixture(ref mut fx) = cfg.session {
        fx.path = expand_path(&fx.path);
    }
}

pub fn validate(cfg: &AppConfig) -> Result<(), ConfigError> {
    if cfg.profile.trim().is_empty() {
        return Err(ConfigError::Validation("profile must not be empty".into()));
    }
    if cfg.region.trim().is_empty() {
        return Err(ConfigError::Validation("region must not be empty".into()));
    }
    if cfg.call_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "call_timeout_ms must be greater than zero".into(),
        ));
    }
    if cfg.audit.enabled && cfg.audit.channel_capacity == 0 {
        return Err(ConfigError::Validation(
            "audit.channel_capacity must be greater than zero".into(),
        ));
    }
    match &cfg.session {
        SessionConfig::Gateway(gw) if gw.base_url.trim().is_empty() => Err(
            ConfigError::Validation("session.base_url must not be empty".into()),
        ),
        SessionConfig::Fixture(fx) if fx.path.trim().is_empty() => Err(ConfigError::Validation(
            "session.path must not be empty for the fixture provider".into(),
        )),
        _ => Ok(()),
    }
}
