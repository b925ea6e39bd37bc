// core/src/session/trait.rs
use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ServiceError;
use crate::value::ResultValue;

/// Named parameters for one operation call.
pub type Params = serde_json::Map<String, Value>;

/// An authenticated client surface exposing named remote operations.
///
/// Implementations must be safe to share across tasks; the dispatcher holds
/// one handle behind an `Arc` for its whole lifetime.
#[async_trait]
pub trait SessionHandle: Send + Sync {
    fn name(&self) -> &str;

    /// Operations this handle can execute.
    fn operation_names(&self) -> BTreeSet<String>;

    /// Resolution check at call time. Open surfaces may override this
    /// instead of enumerating everything up front.
    fn supports(&self, operation: &str) -> bool {
        self.operation_names().contains(operation)
    }

    async fn call(&self, operation: &str, params: &Params) -> Result<ResultValue, ServiceError>;
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn create_session_handle(
        &self,
        profile: &str,
        region: &str,
    ) -> anyhow::Result<Arc<dyn SessionHandle>>;
}
