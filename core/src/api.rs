//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `s3lens_core::api` instead of reaching into internal modules.

pub use crate::audit::{start_audit, AuditEvent, AuditTx, AuditWriter};
pub use crate::catalog::{classify, Classification};
pub use crate::config::{
    AppConfig, AuditConfig, FixtureSessionConfig, GatewaySessionConfig, LoggingConfig,
    PolicyConfig, PolicyRule, SessionConfig, AUDIT_STDERR_SINK, AUDIT_STDOUT_SINK, DEFAULT_LIMIT,
};
pub use crate::context::AppContext;
pub use crate::dispatcher::{CommandDispatcher, CommandRequest, DispatcherOptions, ReadOnlySurface};
pub use crate::error::{ConfigError, DispatchError, PolicyError, ServiceError};
pub use crate::policy::{PolicyDecision, PolicyDecisionKind, ReadOnlyPolicy};
pub use crate::render::{render, render_truncated, truncate_chars, Rendered};
pub use crate::session::{Params, SessionHandle, SessionProvider};
pub use crate::tool::ToolDefinition;
pub use crate::value::ResultValue;
