//! End-to-end tests for the read-only dispatcher against a stub session
//! handle that counts every call it receives.
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;

use s3lens_core::api::{
    AuditConfig, AuditEvent, CommandDispatcher, CommandRequest, DispatchError, DispatcherOptions,
    Params, PolicyConfig, PolicyRule, ReadOnlyPolicy, ReadOnlySurface, ResultValue, ServiceError,
    SessionHandle, ToolDefinition,
};

struct StubHandle {
    operations: BTreeSet<String>,
    response: ResultValue,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubHandle {
    fn new(operations: &[&str]) -> Self {
        Self {
            operations: operations.iter().map(|s| s.to_string()).collect(),
            response: json!({"Buckets": [{"Name": "alpha"}]}).into(),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionHandle for StubHandle {
    fn name(&self) -> &str {
        "stub"
    }

    fn operation_names(&self) -> BTreeSet<String> {
        self.operations.clone()
    }

    async fn call(&self, operation: &str, params: &Params) -> Result<ResultValue, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        if operation == "head_bucket" && !params.contains_key("Bucket") {
            return Err(ServiceError::InvalidParams("missing Bucket".into()));
        }
        Ok(self.response.clone())
    }
}

const SURFACE: &[&str] = &[
    "list_buckets",
    "head_bucket",
    "get_object",
    "delete_bucket",
    "put_object",
    "select_object_content",
];

fn dispatcher_with(handle: Arc<StubHandle>, policy: ReadOnlyPolicy) -> CommandDispatcher {
    let surface = ReadOnlySurface::narrow(handle, policy);
    CommandDispatcher::new(surface, DispatcherOptions::default())
}

fn setup() -> (Arc<StubHandle>, CommandDispatcher) {
    let handle = Arc::new(StubHandle::new(SURFACE));
    let dispatcher = dispatcher_with(handle.clone(), ReadOnlyPolicy::strict());
    (handle, dispatcher)
}

fn args(v: serde_json::Value) -> Params {
    match v {
        serde_json::Value::Object(m) => m,
        _ => panic!("args must be an object"),
    }
}

#[tokio::test]
async fn list_buckets_under_limit_returns_full_rendering() {
    let (handle, d) = setup();
    let out = d.invoke("list_buckets", &Params::new(), 2500).await;
    assert_eq!(out, r#"{"Buckets": [{"Name": "alpha"}]}"#);
    assert_eq!(handle.calls(), 1);
}

#[tokio::test]
async fn list_buckets_with_small_limit_returns_prefix() {
    let (_handle, d) = setup();
    let out = d.invoke("list_buckets", &Params::new(), 5).await;
    assert_eq!(out, r#"{"Buc"#);
    assert_eq!(out.chars().count(), 5);
}

#[tokio::test]
async fn zero_limit_yields_empty_string() {
    let (handle, d) = setup();
    assert_eq!(d.invoke("list_buckets", &Params::new(), 0).await, "");
    assert_eq!(handle.calls(), 1);
}

#[tokio::test]
async fn output_length_is_min_of_rendering_and_limit() {
    let (_handle, d) = setup();
    let full = d.invoke("list_buckets", &Params::new(), usize::MAX).await;
    let len = full.chars().count();
    for limit in [1, 7, len - 1, len, len + 10] {
        let out = d.invoke("list_buckets", &Params::new(), limit).await;
        assert_eq!(out.chars().count(), len.min(limit));
        assert!(full.starts_with(&out));
    }
}

#[tokio::test]
async fn delete_bucket_is_rejected_before_any_call() {
    let (handle, d) = setup();
    let out = d
        .invoke("delete_bucket", &args(json!({"Bucket": "alpha"})), 2500)
        .await;
    assert!(out.starts_with("PolicyViolation: "), "{out}");
    assert_eq!(handle.calls(), 0);
}

#[tokio::test]
async fn every_mutating_operation_is_refused_without_a_call() {
    let all: Vec<&str> = s3lens_core::catalog::operations().map(|(n, _)| n).collect();
    let handle = Arc::new(StubHandle::new(&all));
    let d = dispatcher_with(handle.clone(), ReadOnlyPolicy::strict());

    for (name, class) in s3lens_core::catalog::operations() {
        if class != s3lens_core::api::Classification::Mutating {
            continue;
        }
        let err = d.try_invoke(name, &Params::new()).await.unwrap_err();
        assert!(matches!(err, DispatchError::PolicyViolation { .. }), "{name}");
    }
    assert_eq!(handle.calls(), 0);
}

#[tokio::test]
async fn mutating_operation_missing_from_handle_is_still_a_policy_violation() {
    let handle = Arc::new(StubHandle::new(&["list_buckets"]));
    let d = dispatcher_with(handle.clone(), ReadOnlyPolicy::strict());
    let err = d.try_invoke("put_object", &Params::new()).await.unwrap_err();
    assert_eq!(err.rule_id(), Some("catalog.mutating"));
    assert_eq!(handle.calls(), 0);
}

#[tokio::test]
async fn unclassified_operation_fails_closed() {
    let (handle, d) = setup();
    let err = d
        .try_invoke("select_object_content", &Params::new())
        .await
        .unwrap_err();
    assert_eq!(err.rule_id(), Some("catalog.unclassified"));
    assert_eq!(handle.calls(), 0);
}

#[tokio::test]
async fn unknown_command_is_a_resolution_error() {
    let (handle, d) = setup();
    let out = d.invoke("nonexistent_op", &Params::new(), 2500).await;
    assert_eq!(
        out,
        "ResolutionError: unknown command `nonexistent_op` (not an operation of session `stub`)"
    );
    assert_eq!(handle.calls(), 0);
}

#[tokio::test]
async fn read_only_operation_absent_from_handle_is_a_resolution_error() {
    let (handle, d) = setup();
    let err = d.try_invoke("list_objects_v2", &Params::new()).await.unwrap_err();
    assert!(matches!(err, DispatchError::Resolution { .. }));
    assert_eq!(handle.calls(), 0);
}

#[tokio::test]
async fn identical_invocations_are_idempotent() {
    let (_handle, d) = setup();
    let a = d.invoke("list_buckets", &Params::new(), 12).await;
    let b = d.invoke("list_buckets", &Params::new(), 12).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn handle_failures_surface_as_execution_errors() {
    let (handle, d) = setup();
    let out = d.invoke("head_bucket", &Params::new(), 2500).await;
    assert_eq!(
        out,
        "ExecutionError: command `head_bucket` failed: invalid parameters: missing Bucket"
    );
    assert_eq!(handle.calls(), 1);

    let truncated = d.invoke("head_bucket", &Params::new(), 14).await;
    assert_eq!(truncated, "ExecutionError");
}

#[tokio::test]
async fn slow_calls_time_out_as_retryable_errors() {
    let handle = Arc::new(StubHandle::new(SURFACE).with_delay(Duration::from_millis(500)));
    let surface = ReadOnlySurface::narrow(handle.clone(), ReadOnlyPolicy::strict());
    let d = CommandDispatcher::new(
        surface,
        DispatcherOptions {
            call_timeout: Duration::from_millis(20),
            ..DispatcherOptions::default()
        },
    );

    let err = d.try_invoke("list_buckets", &Params::new()).await.unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(
        err,
        DispatchError::Execution {
            source: ServiceError::Timeout { timeout_ms: 20 },
            ..
        }
    ));
}

#[tokio::test]
async fn operator_denylist_narrows_the_surface() {
    let handle = Arc::new(StubHandle::new(SURFACE));
    let policy = ReadOnlyPolicy::from_config(&PolicyConfig {
        allowlist: vec![],
        denylist: vec![PolicyRule {
            operation: "get_object*".into(),
            reason: Some("object bodies stay private".into()),
        }],
    })
    .unwrap();
    let d = dispatcher_with(handle.clone(), policy);

    assert_eq!(
        d.surface().operation_names(),
        vec!["head_bucket".to_string(), "list_buckets".to_string()]
    );
    let out = d
        .invoke("get_object", &args(json!({"Bucket": "a", "Key": "k"})), 2500)
        .await;
    assert_eq!(
        out,
        "PolicyViolation: command `get_object` refused: object bodies stay private"
    );
    assert_eq!(handle.calls(), 0);
}

#[tokio::test]
async fn request_without_limit_uses_dispatcher_default() {
    let (_handle, d) = setup();
    let req: CommandRequest = serde_json::from_value(json!({"command": "list_buckets"})).unwrap();
    assert_eq!(
        d.invoke_request(&req).await,
        r#"{"Buckets": [{"Name": "alpha"}]}"#
    );
    assert_eq!(d.invoke_request(&req.clone().limit(2)).await, "{\"");
}

#[tokio::test]
async fn dispatcher_is_shareable_across_tasks() {
    let (handle, d) = setup();
    let d = Arc::new(d);
    let mut tasks = Vec::new();
    for _ in 0..8 {
        let d = d.clone();
        tasks.push(tokio::spawn(async move {
            d.invoke("list_buckets", &Params::new(), 2500).await
        }));
    }
    for t in tasks {
        assert_eq!(t.await.unwrap(), r#"{"Buckets": [{"Name": "alpha"}]}"#);
    }
    assert_eq!(handle.calls(), 8);
}

#[tokio::test]
async fn tool_definition_lists_allowed_operations() {
    let (_handle, d) = setup();
    let def = ToolDefinition::for_dispatcher(&d);
    assert_eq!(def.name, "AWSReadOnlyS3");
    assert_eq!(
        def.allowed_operations,
        vec!["get_object", "head_bucket", "list_buckets"]
    );
    assert_eq!(def.parameters["properties"]["limit"]["default"], json!(2500));
    assert_eq!(def.parameters["required"], json!(["command"]));
}

#[tokio::test]
async fn audit_trail_records_outcomes_without_argument_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let writer = s3lens_core::api::start_audit(&AuditConfig {
        enabled: true,
        path: path.display().to_string(),
        channel_capacity: 16,
        drop_when_full: false,
    })
    .await
    .unwrap()
    .unwrap();

    let handle = Arc::new(StubHandle::new(SURFACE));
    let d = dispatcher_with(handle, ReadOnlyPolicy::strict()).with_audit(Some(writer.sender()));
    d.invoke("list_buckets", &Params::new(), 5).await;
    d.invoke("delete_bucket", &args(json!({"Bucket": "top-secret"})), 2500)
        .await;
    drop(d);
    writer.shutdown().await;

    let body = std::fs::read_to_string(&path).unwrap();
    assert!(!body.contains("top-secret"));
    let events: Vec<AuditEvent> = body
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].outcome, "ok");
    assert_eq!(events[0].returned_chars, 5);
    assert!(events[0].truncated);
    assert_eq!(events[1].outcome, "policy_violation");
    assert_eq!(events[1].rule_id.as_deref(), Some("catalog.mutating"));
    assert_eq!(events[1].arg_names, vec!["Bucket".to_string()]);
}
