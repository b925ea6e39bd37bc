//! Session provider backed by a credential-holding HTTP gateway.
//!
//! Each call is `POST {base}/v1/profiles/{profile}/regions/{region}/operations/{op}`
//! with body `{"operation": op, "params": {...}}`. The gateway answers with the
//! operation's JSON response, or a non-2xx status and `{"code", "message"}`.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};

use s3lens_core::api as core_api;
use s3lens_core::catalog;

const ERROR_SNIPPET_CHARS: usize = 200;

pub struct GatewaySessionProvider {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl GatewaySessionProvider {
    pub fn new(cfg: &core_api::GatewaySessionConfig) -> Result<Self> {
        let base_url = Url::parse(&cfg.base_url)
            .with_context(|| format!("invalid gateway base_url `{}`", cfg.base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("gateway base_url `{}` cannot carry a path", cfg.base_url);
        }
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms))
            .build()
            .context("failed to build gateway http client")?;
        Ok(Self {
            client,
            base_url,
            token: cfg.token.clone(),
        })
    }
}

#[async_trait]
impl core_api::SessionProvider for GatewaySessionProvider {
    fn name(&self) -> &str {
        "gateway"
    }

    async fn create_session_handle(
        &self,
        profile: &str,
        region: &str,
    ) -> Result<Arc<dyn core_api::SessionHandle>> {
        tracing::info!(
            target: "s3lens.session",
            base_url = %self.base_url,
            profile,
            region,
            "opening gateway session"
        );
        Ok(Arc::new(GatewaySessionHandle {
            name: format!("gateway:{profile}@{region}"),
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            profile: profile.to_string(),
            region: region.to_string(),
        }))
    }
}

pub struct GatewaySessionHandle {
    name: String,
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    profile: String,
    region: String,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl GatewaySessionHandle {
    fn operation_url(&self, operation: &str) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected when the provider was built
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "v1",
                "profiles",
                self.profile.as_str(),
                "regions",
                self.region.as_str(),
                "operations",
                operation,
            ]);
        }
        url
    }
}

#[async_trait]
impl core_api::SessionHandle for GatewaySessionHandle {
    fn name(&self) -> &str {
        &self.name
    }

    /// The gateway fronts the whole client, writes included; narrowing is the
    /// dispatcher's job.
    fn operation_names(&self) -> BTreeSet<String> {
        catalog::operations().map(|(n, _)| n.to_string()).collect()
    }

    fn supports(&self, operation: &str) -> bool {
        catalog::classify(operation).is_some()
    }

    async fn call(
        &self,
        operation: &str,
        params: &core_api::Params,
    ) -> Result<core_api::ResultValue, core_api::ServiceError> {
        let mut req = self
            .client
            .post(self.operation_url(operation))
            .json(&json!({ "operation": operation, "params": params }));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| core_api::ServiceError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| core_api::ServiceError::Transport(e.to_string()))?;

        tracing::debug!(
            target: "s3lens.session",
            operation,
            status = status.as_u16(),
            bytes = body.len(),
            "gateway response"
        );

        if status.is_success() {
            let value: Value = serde_json::from_str(&body)
                .map_err(|e| core_api::ServiceError::Decode(e.to_string()))?;
            return Ok(value.into());
        }

        Err(error_from_response(status, &body))
    }
}

fn error_from_response(status: StatusCode, body: &str) -> core_api::ServiceError {
    let parsed = serde_json::from_str::<GatewayErrorBody>(body).ok();
    let code = parsed
        .as_ref()
        .and_then(|b| b.code.clone())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("HttpError")
                .replace(' ', "")
        });
    let message = parsed
        .and_then(|b| b.message)
        .unwrap_or_else(|| core_api::truncate_chars(body.trim(), ERROR_SNIPPET_CHARS).to_string());

    core_api::ServiceError::Service {
        status: Some(status.as_u16()),
        code,
        message,
        retryable: status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use s3lens_core::api::{SessionHandle, SessionProvider};

    fn provider(base_url: String, token: Option<&str>) -> GatewaySessionProvider {
        GatewaySessionProvider::new(&core_api::GatewaySessionConfig {
            base_url,
            token: token.map(str::to_string),
            connect_timeout_ms: 1_000,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn posts_operation_and_decodes_tagged_values() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/profiles/di/regions/us-east-1/operations/get_object")
            .match_header("authorization", "Bearer t0ken")
            .match_body(mockito::Matcher::Json(json!({
                "operation": "get_object",
                "params": {"Bucket": "alpha", "Key": "a.txt"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"Body": {"$bytes": "aGk="}, "ContentLength": 2}"#)
            .create_async()
            .await;

        let handle = provider(server.url(), Some("t0ken"))
            .create_session_handle("di", "us-east-1")
            .await
            .unwrap();
        let mut params = core_api::Params::new();
        params.insert("Bucket".into(), json!("alpha"));
        params.insert("Key".into(), json!("a.txt"));

        let value = handle.call("get_object", &params).await.unwrap();
        assert_eq!(
            core_api::render(&value),
            r#"{"Body": b"hi", "ContentLength": 2}"#
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn service_errors_carry_code_and_retryability() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/profiles/di/regions/us-east-1/operations/head_bucket")
            .with_status(404)
            .with_body(r#"{"code": "NoSuchBucket", "message": "The specified bucket does not exist"}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/v1/profiles/di/regions/us-east-1/operations/list_buckets")
            .with_status(503)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let handle = provider(server.url(), None)
            .create_session_handle("di", "us-east-1")
            .await
            .unwrap();

        let err = handle
            .call("head_bucket", &core_api::Params::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "NoSuchBucket: The specified bucket does not exist");
        assert!(!err.is_retryable());

        let err = handle
            .call("list_buckets", &core_api::Params::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "ServiceUnavailable: upstream unavailable");
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn surface_is_the_full_catalog() {
        let handle = provider("http://127.0.0.1:9".into(), None)
            .create_session_handle("di", "us-east-1")
            .await
            .unwrap();
        assert!(handle.supports("delete_bucket"));
        assert!(handle.supports("list_buckets"));
        assert!(!handle.supports("nonexistent_op"));
    }

    #[test]
    fn rejects_unusable_base_url() {
        let err = GatewaySessionProvider::new(&core_api::GatewaySessionConfig {
            base_url: "mailto:ops@example.com".into(),
            token: None,
            connect_timeout_ms: 1_000,
        });
        assert!(err.is_err());
    }
}
