//! HTTP contract tests.
//!
//! Each test builds the full router with a `FakeBackend` and drives it
//! in-process via `tower::ServiceExt::oneshot` - no sockets, no Ollama.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use review_common::ollama::OllamaError;
use review_common::verdict::FallbackPolicy;
use reviewd::config::ReviewdConfig;
use reviewd::orchestrator::{FakeBackend, FakeBackendBuilder, LlmBackend};
use reviewd::server::{app, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app(backend: Arc<dyn LlmBackend>) -> Router {
    let config = ReviewdConfig::default();
    app(AppState::with_backend(&config, backend), 1024 * 1024)
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_root_liveness_message() {
    let router = test_app(Arc::new(FakeBackend::always("")));
    let (status, body) = get(router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Code Review API Server is running!");
}

// ============================================================================
// Full Review
// ============================================================================

#[tokio::test]
async fn test_review_missing_code_is_400() {
    let router = test_app(Arc::new(FakeBackend::always("unused")));
    let (status, body) = post(
        router,
        "/api/review",
        json!({"code": "", "language": "python"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("Code"), "error should mention code: {}", error);
}

#[tokio::test]
async fn test_review_happy_path_shapes_response() {
    let router = test_app(Arc::new(FakeBackend::always("### Code Review Summary\nFine.")));
    let (status, body) = post(
        router,
        "/api/review",
        json!({"code": "print(1)", "language": "python"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["review"], "### Code Review Summary\nFine.");
    assert_eq!(body["model"], "llama3.1:latest");
    assert_eq!(body["language"], "python");
    assert!(body["timestamp"].as_str().unwrap().contains('T'));
}

#[tokio::test]
async fn test_review_requested_model_is_echoed() {
    let router = test_app(Arc::new(FakeBackend::always("ok")));
    let (_, body) = post(
        router,
        "/api/review",
        json!({"code": "x", "language": "go", "model": "qwen2.5-coder"}),
    )
    .await;
    assert_eq!(body["model"], "qwen2.5-coder");
}

#[tokio::test]
async fn test_review_upstream_failure_is_500_with_hint() {
    let router = test_app(Arc::new(FakeBackend::failing(OllamaError::NotAvailable(
        "connection refused".to_string(),
    ))));
    let (status, body) = post(
        router,
        "/api/review",
        json!({"code": "x", "language": "python"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Ollama"));
    assert!(body["details"].as_str().unwrap().contains("connection refused"));
}

// ============================================================================
// Models
// ============================================================================

#[tokio::test]
async fn test_models_installed_flag_by_prefix() {
    let backend = FakeBackendBuilder::new()
        .installed(&["codellama:13b"])
        .build();
    let router = test_app(Arc::new(backend));
    let (status, body) = get(router, "/api/models").await;

    assert_eq!(status, StatusCode::OK);
    let models = body["models"].as_array().unwrap();
    let codellama = models
        .iter()
        .find(|m| m["name"] == "codellama")
        .unwrap();
    assert_eq!(codellama["installed"], true);
    let mistral = models.iter().find(|m| m["name"] == "mistral").unwrap();
    assert_eq!(mistral["installed"], false);
}

// ============================================================================
// Commit Gate
// ============================================================================

#[tokio::test]
async fn test_gate_end_to_end_ok() {
    let router = test_app(Arc::new(FakeBackend::always("OK: no issues found")));
    let (status, body) = post(router, "/api/review/commit", json!({"code": "+ x = 1"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["summary"], "OK: no issues found");
}

#[tokio::test]
async fn test_gate_empty_code_is_400_fail_shape() {
    let router = test_app(Arc::new(FakeBackend::always("unused")));
    let (status, body) = post(router, "/api/review/commit", json!({"code": "  "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["summary"], "No code provided for analysis.");
}

#[tokio::test]
async fn test_gate_upstream_failure_names_ollama() {
    let router = test_app(Arc::new(FakeBackend::failing(OllamaError::Timeout)));
    let (status, body) = post(router, "/api/review/commit", json!({"code": "+ x"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "fail");
    assert!(body["summary"].as_str().unwrap().contains("Ollama"));
}

#[tokio::test]
async fn test_gate_strict_policy_blocks_unclear_output() {
    let mut config = ReviewdConfig::default();
    config.gate.unclear_verdict = FallbackPolicy::Strict;
    let state = AppState::with_backend(
        &config,
        Arc::new(FakeBackend::always("hard to say, really")),
    );
    let router = app(state, 1024 * 1024);

    let (_, body) = post(router, "/api/review/commit", json!({"code": "+ x"})).await;
    assert_eq!(body["status"], "fail");
}

// ============================================================================
// Discussion
// ============================================================================

#[tokio::test]
async fn test_discussion_accepts_ok_marker() {
    let router = test_app(Arc::new(FakeBackend::always("OK: valid justification")));
    let (status, body) = post(
        router,
        "/api/review/discussion",
        json!({"issue": "FAIL: bad", "developer_response": "it is test code"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_discussion_unclear_reply_stays_blocked() {
    let router = test_app(Arc::new(FakeBackend::always("interesting point, perhaps")));
    let (_, body) = post(
        router,
        "/api/review/discussion",
        json!({"issue": "FAIL: bad", "developer_response": "trust me"}),
    )
    .await;
    assert_eq!(body["status"], "fail");
}

// ============================================================================
// Fix / Effort
// ============================================================================

#[tokio::test]
async fn test_fix_strips_markdown_fences() {
    let router = test_app(Arc::new(FakeBackend::always("```js\nconsole.log(1)\n```")));
    let (status, body) = post(router, "/api/review/fix", json!({"code": "console.lg(1)"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["fixed_code"], "console.log(1)");
}

#[tokio::test]
async fn test_fix_missing_code_is_400_message_shape() {
    let router = test_app(Arc::new(FakeBackend::always("unused")));
    let (status, body) = post(router, "/api/review/fix", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "No code provided.");
}

#[tokio::test]
async fn test_effort_returns_estimate() {
    let router = test_app(Arc::new(FakeBackend::always("About 20 minutes.")));
    let (status, body) = post(
        router,
        "/api/review/effort",
        json!({"summary": "FAIL: missing validation"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["estimate"], "About 20 minutes.");
}

#[tokio::test]
async fn test_effort_missing_summary_is_400() {
    let router = test_app(Arc::new(FakeBackend::always("unused")));
    let (status, body) = post(router, "/api/review/effort", json!({"summary": ""})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No summary provided.");
}

// ============================================================================
// Hook Script
// ============================================================================

#[tokio::test]
async fn test_hook_served_as_attachment() {
    let router = test_app(Arc::new(FakeBackend::always("")));
    let response = router
        .oneshot(
            Request::get("/api/pre-commit-hook")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap();
    assert_eq!(disposition, "attachment; filename=\"pre-commit\"");

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let script = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(script.starts_with("#!/bin/bash"));
    assert!(script.contains("/api/review/commit"));
}

// ============================================================================
// Commits (stub shapes)
// ============================================================================

#[tokio::test]
async fn test_commits_list_empty_shape() {
    let router = test_app(Arc::new(FakeBackend::always("")));
    let (status, body) = get(router, "/api/commits").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["commits"].as_array().unwrap().len(), 0);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 20);
    assert_eq!(body["pagination"]["total"], 0);
    assert_eq!(body["pagination"]["totalPages"], 0);
}

#[tokio::test]
async fn test_commits_invalid_status_is_400() {
    let router = test_app(Arc::new(FakeBackend::always("")));
    let (status, body) = get(router, "/api/commits/status/bogus").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("approved"));
}

#[tokio::test]
async fn test_commits_stats_shape() {
    let router = test_app(Arc::new(FakeBackend::always("")));
    let (status, body) = get(router, "/api/commits/stats/overview").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["total"], 0);
    assert_eq!(body["stats"]["approved"], 0);
}

#[tokio::test]
async fn test_commit_detail_unknown_hash_is_null() {
    let router = test_app(Arc::new(FakeBackend::always("")));
    let (status, body) = get(router, "/api/commits/deadbeef").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["commit"].is_null());
}

// ============================================================================
// Subscription (stub shapes)
// ============================================================================

#[tokio::test]
async fn test_subscription_default_status() {
    let router = test_app(Arc::new(FakeBackend::always("")));
    let (status, body) = get(router, "/api/subscription/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subscription"]["plan"], "free");
    assert_eq!(body["subscription"]["status"], "active");
    assert!(body["subscription"]["startsAt"].is_string());
    assert_eq!(body["subscription"]["billingPeriod"], "monthly");
}

#[tokio::test]
async fn test_subscribe_invalid_plan_is_400() {
    let router = test_app(Arc::new(FakeBackend::always("")));
    let (status, body) = post(
        router,
        "/api/subscription/subscribe",
        json!({"planId": "enterprise"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid plan ID");
}

#[tokio::test]
async fn test_subscribe_then_status_reflects_plan() {
    let config = ReviewdConfig::default();
    let state = AppState::with_backend(&config, Arc::new(FakeBackend::always("")));
    let router = app(state, 1024 * 1024);

    let (status, body) = post(
        router.clone(),
        "/api/subscription/subscribe",
        json!({"planId": "pro"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["planId"], "pro");

    let (_, body) = get(router, "/api/subscription/status").await;
    assert_eq!(body["subscription"]["plan"], "pro");
}

#[tokio::test]
async fn test_plans_catalog() {
    let router = test_app(Arc::new(FakeBackend::always("")));
    let (_, body) = get(router, "/api/subscription/plans").await;

    let plans = body["plans"].as_array().unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0]["id"], "free");
    assert_eq!(plans[1]["id"], "pro");
    assert_eq!(plans[1]["price"], 29);
}

#[tokio::test]
async fn test_usage_shape() {
    let router = test_app(Arc::new(FakeBackend::always("")));
    let (_, body) = get(router, "/api/subscription/usage").await;

    assert_eq!(body["success"], true);
    assert_eq!(body["usage"]["plan"], "free");
    assert_eq!(body["usage"]["reviewsUsed"], 3);
    assert_eq!(body["usage"]["reviewsLimit"], 10);
    assert!(body["usage"]["periodStart"].is_string());
}
