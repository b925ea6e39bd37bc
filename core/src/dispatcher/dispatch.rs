use std::time::{Duration, Instant};

use chrono::Utc;
use uuid::Uuid;

use crate::audit::{AuditEvent, AuditTx, AUDIT_EVENT_TYPE};
use crate::config::AppConfig;
use crate::error::{DispatchError, ServiceError};
use crate::render::{render, render_truncated, Rendered};
use crate::session::Params;
use crate::value::ResultValue;

use super::request::CommandRequest;
use super::surface::ReadOnlySurface;

#[derive(Debug, Clone)]
pub struct DispatcherOptions {
    pub profile: String,
    pub region: String,
    pub default_limit: usize,
    pub call_timeout: Duration,
}

impl DispatcherOptions {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            profile: cfg.profile.clone(),
            region: cfg.region.clone(),
            default_limit: cfg.default_limit,
            call_timeout: Duration::from_millis(cfg.call_timeout_ms),
        }
    }
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// The single agent-facing tool: resolve a command on the read-only surface,
/// run it, and hand back bounded text.
///
/// Holds no mutable state, so one instance can serve concurrent callers.
pub struct CommandDispatcher {
    surface: ReadOnlySurface,
    opts: DispatcherOptions,
    audit: Option<AuditTx>,
}

impl CommandDispatcher {
    pub fn new(surface: ReadOnlySurface, opts: DispatcherOptions) -> Self {
        Self {
            surface,
            opts,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: Option<AuditTx>) -> Self {
        self.audit = audit;
        self
    }

    pub fn surface(&self) -> &ReadOnlySurface {
        &self.surface
    }

    pub fn options(&self) -> &DispatcherOptions {
        &self.opts
    }

    /// Always returns a string: the rendered result or the rendered failure,
    /// cut to the first `limit` characters.
    pub async fn invoke(&self, command: &str, args: &Params, limit: usize) -> String {
        let started = Instant::now();
        let invocation_id = Uuid::new_v4().to_string();

        let result = self.try_invoke(command, args).await;

        let full = match &result {
            Ok(value) => render(value),
            Err(e) => {
                tracing::warn!(
                    target: "s3lens.dispatch",
                    invocation_id = %invocation_id,
                    command,
                    kind = e.kind(),
                    error = %e,
                    "command rejected or failed"
                );
                e.render()
            }
        };
        let rendered = render_truncated(full, limit);

        tracing::info!(
            target: "s3lens.dispatch",
            invocation_id = %invocation_id,
            command,
            ok = result.is_ok(),
            rendered_chars = rendered.rendered_chars,
            truncated = rendered.truncated,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "command dispatched"
        );

        if let Some(audit) = &self.audit {
            let event = self.audit_event(invocation_id, command, args, &result, &rendered, started);
            audit.send_event(&event).await;
        }

        rendered.text
    }

    pub async fn invoke_request(&self, req: &CommandRequest) -> String {
        let limit = req.limit.unwrap_or(self.opts.default_limit);
        self.invoke(&req.command, &req.args, limit).await
    }

    /// Typed variant of `invoke` for library callers: no rendering, no
    /// truncation.
    pub async fn try_invoke(
        &self,
        command: &str,
        args: &Params,
    ) -> Result<ResultValue, DispatchError> {
        self.surface.resolve(command)?;

        tracing::debug!(
            target: "s3lens.dispatch",
            command,
            session = self.surface.session_name(),
            args = args.len(),
            "executing read-only command"
        );

        let call = self.surface.handle().call(command, args);
        match tokio::time::timeout(self.opts.call_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(DispatchError::Execution {
                command: command.to_string(),
                source,
            }),
            Err(_) => Err(DispatchError::Execution {
                command: command.to_string(),
                source: ServiceError::Timeout {
                    timeout_ms: self.opts.call_timeout.as_millis() as u64,
                },
            }),
        }
    }

    fn audit_event(
        &self,
        invocation_id: String,
        command: &str,
        args: &Params,
        result: &Result<ResultValue, DispatchError>,
        rendered: &Rendered,
        started: Instant,
    ) -> AuditEvent {
        let (outcome, rule_id, retryable) = match result {
            Ok(_) => ("ok", None, false),
            Err(e) => (e.outcome(), e.rule_id().map(str::to_string), e.is_retryable()),
        };
        AuditEvent {
            v: 1,
            event_type: AUDIT_EVENT_TYPE.to_string(),
            ts: Utc::now().to_rfc3339(),
            invocation_id,
            session: self.surface.session_name().to_string(),
            profile: self.opts.profile.clone(),
            region: self.opts.region.clone(),
            command: command.to_string(),
            arg_names: args.keys().cloned().collect(),
            outcome: outcome.to_string(),
            rule_id,
            retryable,
            rendered_chars: rendered.rendered_chars,
            returned_chars: rendered.text.chars().count(),
            truncated: rendered.truncated,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }
}
