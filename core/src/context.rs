use std::sync::Arc;

use crate::audit::{start_audit, AuditWriter};
use crate::config::AppConfig;
use crate::dispatcher::{CommandDispatcher, DispatcherOptions, ReadOnlySurface};
use crate::error::PolicyError;
use crate::policy::ReadOnlyPolicy;
use crate::session::SessionHandle;

/// Process-wide state shared by the front ends: config plus the audit
/// writer, if one is running.
pub struct AppContext {
    cfg: AppConfig,
    audit: Option<AuditWriter>,
}

impl AppContext {
    pub async fn new(cfg: AppConfig) -> std::io::Result<Self> {
        let audit = start_audit(&cfg.audit).await?;
        Ok(Self { cfg, audit })
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.cfg
    }

    /// Narrows `handle` with the configured policy and wires in the audit
    /// trail.
    pub fn build_dispatcher(
        &self,
        handle: Arc<dyn SessionHandle>,
    ) -> Result<CommandDispatcher, PolicyError> {
        let policy = ReadOnlyPolicy::from_config(&self.cfg.policy)?;
        let surface = ReadOnlySurface::narrow(handle, policy);
        Ok(CommandDispatcher::new(surface, DispatcherOptions::from_config(&self.cfg))
            .with_audit(self.audit.as_ref().map(AuditWriter::sender)))
    }

    /// Flushes the audit trail. Dispatchers built from this context must be
    /// dropped first.
    pub async fn shutdown(self) {
        if let Some(writer) = self.audit {
            writer.shutdown().await;
        }
    }
}
