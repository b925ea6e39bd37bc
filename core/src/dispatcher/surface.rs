use std::collections::BTreeSet;
use std::sync::Arc;

use crate::catalog::{self, Classification};
use crate::error::DispatchError;
use crate::policy::ReadOnlyPolicy;
use crate::session::SessionHandle;

/// A session handle narrowed to the operations the policy admits.
///
/// The admitted set is computed once at construction from the catalog's
/// read-only entries; nothing outside it can be reached through `resolve`.
pub struct ReadOnlySurface {
    handle: Arc<dyn SessionHandle>,
    policy: ReadOnlyPolicy,
    allowed: BTreeSet<&'static str>,
}

impl ReadOnlySurface {
    pub fn narrow(handle: Arc<dyn SessionHandle>, policy: ReadOnlyPolicy) -> Self {
        let allowed: BTreeSet<&'static str> = catalog::read_only_operations()
            .filter(|op| policy.decide(op).is_allowed())
            .collect();

        tracing::info!(
            target: "s3lens.policy",
            session = handle.name(),
            allowed = allowed.len(),
            "session surface narrowed to read-only operations"
        );

        Self {
            handle,
            policy,
            allowed,
        }
    }

    pub fn session_name(&self) -> &str {
        self.handle.name()
    }

    pub(crate) fn handle(&self) -> &dyn SessionHandle {
        self.handle.as_ref()
    }

    /// Admitted operations the handle actually offers, sorted.
    pub fn operation_names(&self) -> Vec<String> {
        self.allowed
            .iter()
            .filter(|op| self.handle.supports(op))
            .map(|op| op.to_string())
            .collect()
    }

    /// Fails unless `command` can be executed. Never touches the network.
    pub fn resolve(&self, command: &str) -> Result<(), DispatchError> {
        let known_mutating = catalog::classify(command) == Some(Classification::Mutating);
        if !known_mutating && !self.handle.supports(command) {
            return Err(DispatchError::Resolution {
                command: command.to_string(),
                session: self.handle.name().to_string(),
            });
        }

        if !self.allowed.contains(command) {
            let decision = self.policy.decide(command);
            return Err(DispatchError::PolicyViolation {
                command: command.to_string(),
                reason: decision.reason,
                rule_id: decision.rule_id,
            });
        }

        Ok(())
    }
}
