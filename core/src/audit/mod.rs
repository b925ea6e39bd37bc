//! JSONL audit trail of dispatcher invocations.

pub mod event;
pub mod writer;

pub use crate::config::AuditConfig;
pub use event::{AuditEvent, AUDIT_EVENT_TYPE};
pub use writer::{start_audit, AuditTx, AuditWriter};
