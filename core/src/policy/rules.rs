use glob::Pattern;

use crate::catalog::{self, Classification};
use crate::config::{PolicyConfig, PolicyRule};
use crate::error::PolicyError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyDecisionKind {
    Allow,
    Deny,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyDecision {
    pub kind: PolicyDecisionKind,
    pub reason: String,
    pub rule_id: String,
}

impl PolicyDecision {
    fn allow(reason: impl Into<String>, rule_id: impl Into<String>) -> Self {
        Self {
            kind: PolicyDecisionKind::Allow,
            reason: reason.into(),
            rule_id: rule_id.into(),
        }
    }

    fn deny(reason: impl Into<String>, rule_id: impl Into<String>) -> Self {
        Self {
            kind: PolicyDecisionKind::Deny,
            reason: reason.into(),
            rule_id: rule_id.into(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.kind == PolicyDecisionKind::Allow
    }
}

#[derive(Clone, Debug)]
struct CompiledRule {
    pattern: Pattern,
    reason: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ReadOnlyPolicy {
    allowlist: Vec<CompiledRule>,
    denylist: Vec<CompiledRule>,
}

impl ReadOnlyPolicy {
    /// Catalog classification only, no operator rules.
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn from_config(cfg: &PolicyConfig) -> Result<Self, PolicyError> {
        let allowlist = compile("allowlist", &cfg.allowlist)?;
        let denylist = compile("denylist", &cfg.denylist)?;

        for rule in &allowlist {
            for (name, class) in catalog::operations() {
                if class == Classification::Mutating && rule.pattern.matches(name) {
                    tracing::warn!(
                        target: "s3lens.policy",
                        pattern = %rule.pattern,
                        operation = name,
                        "allowlist entry matches a mutating operation; it stays denied"
                    );
                }
            }
        }

        Ok(Self {
            allowlist,
            denylist,
        })
    }

    pub fn decide(&self, operation: &str) -> PolicyDecision {
        match catalog::classify(operation) {
            None => {
                return PolicyDecision::deny(
                    "operation is not classified as read-only",
                    "catalog.unclassified",
                )
            }
            Some(Classification::Mutating) => {
                return PolicyDecision::deny(
                    "operation can modify remote state; only read-only operations are permitted",
                    "catalog.mutating",
                )
            }
            Some(Classification::ReadOnly) => {}
        }

        if let Some((idx, rule)) = find_match(&self.denylist, operation) {
            return PolicyDecision::deny(
                rule.reason
                    .clone()
                    .unwrap_or_else(|| "denied by operator rule".into()),
                format!("denylist[{idx}]"),
            );
        }

        if self.allowlist.is_empty() {
            return PolicyDecision::allow("read-only operation", "catalog.read_only");
        }

        match find_match(&self.allowlist, operation) {
            Some((idx, rule)) => PolicyDecision::allow(
                rule.reason
                    .clone()
                    .unwrap_or_else(|| "allowed by operator rule".into()),
                format!("allowlist[{idx}]"),
            ),
            None => PolicyDecision::deny("not in the operator allowlist", "allowlist.miss"),
        }
    }
}

fn compile(list: &'static str, rules: &[PolicyRule]) -> Result<Vec<CompiledRule>, PolicyError> {
    rules
        .iter()
        .map(|r| {
            let pattern =
                Pattern::new(&r.operation).map_err(|source| PolicyError::InvalidPattern {
                    list,
                    pattern: r.operation.clone(),
                    source,
                })?;
            Ok(CompiledRule {
                pattern,
                reason: r.reason.clone(),
            })
        })
        .collect()
}

fn find_match<'a>(rules: &'a [CompiledRule], operation: &str) -> Option<(usize, &'a CompiledRule)> {
    rules
        .iter()
        .enumerate()
        .find(|(_, r)| r.pattern.matches(operation))
}
