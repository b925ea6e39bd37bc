use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: usize = 2500;

/// Audit sink names that are not file paths.
pub const AUDIT_STDOUT_SINK: &str = "stdout:";
pub const AUDIT_STDERR_SINK: &str = "stderr:";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_profile")]
    pub profile: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Character limit applied when a request does not carry one.
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub audit: AuditConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_profile() -> String {
    "di".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_call_timeout_ms() -> u64 {
    30_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            region: default_region(),
            default_limit: default_limit(),
            call_timeout_ms: default_call_timeout_ms(),
            session: SessionConfig::default(),
            policy: PolicyConfig::default(),
            audit: AuditConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider")]
pub enum SessionConfig {
    #[serde(rename = "gateway")]
    Gateway(GatewaySessionConfig),
    #[serde(rename = "fixture")]
    Fixture(FixtureSessionConfig),
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig::Gateway(GatewaySessionConfig::default())
    }
}

/// Credential-holding gateway that executes S3 calls on our behalf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySessionConfig {
    #[serde(default = "default_gateway_url")]
    pub base_url: String,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_gateway_url() -> String {
    "http://127.0.0.1:8787".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

impl Default for GatewaySessionConfig {
    fn default() -> Self {
        Self {
            base_url: default_gateway_url(),
            token: None,
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FixtureSessionConfig {
    pub path: String,
}

/// Operator narrowing of the read-only catalog. Neither list can admit an
/// operation the catalog does not classify as read-only.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PolicyConfig {
    #[serde(default)]
    pub allowlist: Vec<PolicyRule>,

    #[serde(default)]
    pub denylist: Vec<PolicyRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Glob pattern over operation names, e.g. `get_bucket_*`.
    pub operation: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub enabled: bool,

    /// File path, `stdout:` or `stderr:`.
    #[serde(default = "default_audit_path")]
    pub path: String,

    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    #[serde(default = "default_drop_when_full")]
    pub drop_when_full: bool,
}

fn default_audit_path() -> String {
    "s3lens-audit.jsonl".to_string()
}

fn default_channel_capacity() -> usize {
    256
}

fn default_drop_when_full() -> bool {
    true
}

impl AuditConfig {
    /// True when audit lines would share stdout with command output.
    pub fn writes_to_stdout(&self) -> bool {
        self.enabled && self.path == AUDIT_STDOUT_SINK
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_audit_path(),
            channel_capacity: default_channel_capacity(),
            drop_when_full: default_drop_when_full(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// When set, logs are also written to a daily-rolling file here.
    #[serde(default)]
    pub directory: Option<String>,

    #[serde(default = "default_log_file_prefix")]
    pub file_prefix: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file_prefix() -> String {
    "s3lens.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
            file_prefix: default_log_file_prefix(),
        }
    }
}
