//! Session provider serving canned responses from a JSON file.
//!
//! ```json
//! {
//!   "profiles": {
//!     "di": {
//!       "list_buckets": {"Buckets": [{"Name": "alpha"}]},
//!       "head_bucket": {"$error": {"code": "NoSuchBucket", "message": "missing"}}
//!     }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use s3lens_core::api as core_api;

const ERROR_TAG: &str = "$error";

#[derive(Debug, Deserialize)]
struct FixtureFile {
    profiles: BTreeMap<String, BTreeMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct FixtureError {
    code: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    retryable: bool,
}

pub struct FixtureSessionProvider {
    profiles: BTreeMap<String, BTreeMap<String, Value>>,
}

impl FixtureSessionProvider {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture file {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("invalid fixture file {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let file: FixtureFile = serde_json::from_str(raw)?;
        Ok(Self {
            profiles: file.profiles,
        })
    }
}

#[async_trait]
impl core_api::SessionProvider for FixtureSessionProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn create_session_handle(
        &self,
        profile: &str,
        region: &str,
    ) -> Result<Arc<dyn core_api::SessionHandle>> {
        let responses = self
            .profiles
            .get(profile)
            .cloned()
            .ok_or_else(|| anyhow!("no fixture responses for profile `{profile}`"))?;
        tracing::info!(
            target: "s3lens.session",
            profile,
            region,
            operations = responses.len(),
            "opening fixture session"
        );
        Ok(Arc::new(FixtureSessionHandle {
            name: format!("fixture:{profile}@{region}"),
            responses,
        }))
    }
}

pub struct FixtureSessionHandle {
    name: String,
    responses: BTreeMap<String, Value>,
}

#[async_trait]
impl core_api::SessionHandle for FixtureSessionHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn operation_names(&self) -> BTreeSet<String> {
        self.responses.keys().cloned().collect()
    }

    fn supports(&self, operation: &str) -> bool {
        self.responses.contains_key(operation)
    }

    async fn call(
        &self,
        operation: &str,
        _params: &core_api::Params,
    ) -> Result<core_api::ResultValue, core_api::ServiceError> {
        let response = self.responses.get(operation).ok_or_else(|| {
            core_api::ServiceError::service("NotImplemented", format!("no fixture for {operation}"))
        })?;

        if let Some(err) = response.get(ERROR_TAG) {
            let err: FixtureError = serde_json::from_value(err.clone())
                .map_err(|e| core_api::ServiceError::Decode(e.to_string()))?;
            return Err(core_api::ServiceError::Service {
                status: None,
                code: err.code,
                message: err.message,
                retryable: err.retryable,
            });
        }

        Ok(response.clone().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use s3lens_core::api::{SessionHandle, SessionProvider};
    use std::io::Write;

    const FIXTURE: &str = r#"{
        "profiles": {
            "di": {
                "list_buckets": {"Buckets": [{"Name": "alpha"}]},
                "head_bucket": {"$error": {"code": "NoSuchBucket", "message": "missing", "retryable": false}}
            }
        }
    }"#;

    #[tokio::test]
    async fn serves_canned_responses_and_errors() {
        let provider = FixtureSessionProvider::from_json_str(FIXTURE).unwrap();
        let handle = provider.create_session_handle("di", "us-east-1").await.unwrap();

        assert_eq!(handle.name(), "fixture:di@us-east-1");
        assert_eq!(
            handle.operation_names().into_iter().collect::<Vec<_>>(),
            vec!["head_bucket".to_string(), "list_buckets".to_string()]
        );

        let ok = handle.call("list_buckets", &core_api::Params::new()).await.unwrap();
        assert_eq!(core_api::render(&ok), r#"{"Buckets": [{"Name": "alpha"}]}"#);

        let err = handle
            .call("head_bucket", &core_api::Params::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "NoSuchBucket: missing");
    }

    #[tokio::test]
    async fn unknown_profile_is_an_error() {
        let provider = FixtureSessionProvider::from_json_str(FIXTURE).unwrap();
        assert!(provider.create_session_handle("prod", "us-east-1").await.is_err());
    }

    #[test]
    fn loads_from_disk() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(FIXTURE.as_bytes()).unwrap();
        assert!(FixtureSessionProvider::from_path(f.path()).is_ok());

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        bad.write_all(b"{\"profiles\": 3}").unwrap();
        assert!(FixtureSessionProvider::from_path(bad.path()).is_err());
    }
}
