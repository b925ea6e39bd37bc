//! Read-only policy: the catalog classification, narrowed further by operator
//! rules. Decisions are computed once per operation name and never widen the
//! catalog's read-only set.

mod rules;

pub use rules::{PolicyDecision, PolicyDecisionKind, ReadOnlyPolicy};
