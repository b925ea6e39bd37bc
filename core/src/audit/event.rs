use serde::{Deserialize, Serialize};

pub const AUDIT_EVENT_TYPE: &str = "command.invoke";

/// One line of the audit trail. Argument values are never recorded, only
/// their names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub v: i32,
    #[serde(rename = "type")]
    pub event_type: String,
    pub ts: String,
    pub invocation_id: String,
    pub session: String,
    pub profile: String,
    pub region: String,
    pub command: String,
    pub arg_names: Vec<String>,
    /// `ok`, `resolution_error`, `policy_violation` or `execution_error`.
    pub outcome: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,

    #[serde(default)]
    pub retryable: bool,
    pub rendered_chars: usize,
    pub returned_chars: usize,
    pub truncated: bool,
    pub elapsed_ms: u64,
}
