//! API routes for reviewd.
//!
//! Error shaping is per flow, because the consumers differ:
//! - `/api/review` and `/api/models` return `{ error, details }` for the UI;
//! - `/api/review/commit` and `/discussion` return `{ status, summary }`,
//!   which the pre-commit hook script parses;
//! - `/api/review/fix` and `/effort` return `{ status, message }` on
//!   failure.

use crate::hook::{HOOK_FILENAME, PRE_COMMIT_HOOK};
use crate::orchestrator::OrchestratorError;
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use review_common::api::{
    DiscussionRequest, EffortRequest, EffortResponse, ErrorBody, FailMessage, FixRequest,
    FixResponse, GateRequest, ModelsResponse, ReviewRequest, ReviewResponse, Verdict,
};
use review_common::store::{
    is_valid_plan, plan_catalog, CommitPage, CommitRecord, CommitStats, Plan, ReviewStatus,
    Subscription, Usage,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

type AppStateArc = Arc<AppState>;

/// Message shown to the user when the inference provider fails.
const OLLAMA_DOWN_HINT: &str =
    "Failed to get response from Ollama. Make sure Ollama is running and the model is downloaded.";

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Serialize)]
struct RootResponse {
    message: &'static str,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/", get(root))
}

/// Liveness probe; the hook script checks this before gating a commit.
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Code Review API Server is running!",
    })
}

// ============================================================================
// Model Routes
// ============================================================================

pub fn models_routes() -> Router<AppStateArc> {
    Router::new().route("/api/models", get(list_models))
}

async fn list_models(
    State(state): State<AppStateArc>,
) -> Result<Json<ModelsResponse>, (StatusCode, Json<ErrorBody>)> {
    match state.orchestrator.models().await {
        Ok(models) => Ok(Json(ModelsResponse { models })),
        Err(e) => {
            warn!("Failed to fetch models: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::with_details("Failed to fetch models", e.to_string())),
            ))
        }
    }
}

// ============================================================================
// Review Routes
// ============================================================================

pub fn review_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/review", post(full_review))
        .route("/api/review/commit", post(commit_gate))
        .route("/api/review/discussion", post(discussion))
        .route("/api/review/fix", post(auto_fix))
        .route("/api/review/effort", post(effort))
}

async fn full_review(
    State(state): State<AppStateArc>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, (StatusCode, Json<ErrorBody>)> {
    info!(language = %req.language, "Review requested");
    match state.orchestrator.review(&req).await {
        Ok(resp) => Ok(Json(resp)),
        Err(OrchestratorError::Validation(msg)) => {
            Err((StatusCode::BAD_REQUEST, Json(ErrorBody::new(msg))))
        }
        Err(OrchestratorError::Upstream(e)) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::with_details(OLLAMA_DOWN_HINT, e.to_string())),
        )),
    }
}

async fn commit_gate(
    State(state): State<AppStateArc>,
    Json(req): Json<GateRequest>,
) -> Result<Json<Verdict>, (StatusCode, Json<Verdict>)> {
    match state.orchestrator.gate(&req.code).await {
        Ok(verdict) => Ok(Json(verdict)),
        Err(OrchestratorError::Validation(msg)) => {
            Err((StatusCode::BAD_REQUEST, Json(Verdict::fail(msg))))
        }
        Err(OrchestratorError::Upstream(e)) => {
            warn!("Commit gate inference failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Verdict::fail(format!("Error analyzing code. {}", OLLAMA_DOWN_HINT))),
            ))
        }
    }
}

async fn discussion(
    State(state): State<AppStateArc>,
    Json(req): Json<DiscussionRequest>,
) -> Result<Json<Verdict>, (StatusCode, Json<Verdict>)> {
    match state
        .orchestrator
        .discussion(&req.issue, &req.developer_response)
        .await
    {
        Ok(verdict) => Ok(Json(verdict)),
        Err(OrchestratorError::Validation(msg)) => {
            Err((StatusCode::BAD_REQUEST, Json(Verdict::fail(msg))))
        }
        Err(OrchestratorError::Upstream(e)) => {
            warn!("Discussion inference failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Verdict::fail("Error during discussion.")),
            ))
        }
    }
}

async fn auto_fix(
    State(state): State<AppStateArc>,
    Json(req): Json<FixRequest>,
) -> Result<Json<FixResponse>, (StatusCode, Json<FailMessage>)> {
    match state.orchestrator.fix(&req.code).await {
        Ok(resp) => Ok(Json(resp)),
        Err(OrchestratorError::Validation(msg)) => {
            Err((StatusCode::BAD_REQUEST, Json(FailMessage::new(msg))))
        }
        Err(OrchestratorError::Upstream(e)) => {
            warn!("Auto-fix inference failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FailMessage::new("Error generating fix.")),
            ))
        }
    }
}

async fn effort(
    State(state): State<AppStateArc>,
    Json(req): Json<EffortRequest>,
) -> Result<Json<EffortResponse>, (StatusCode, Json<FailMessage>)> {
    match state.orchestrator.effort(&req.summary).await {
        Ok(resp) => Ok(Json(resp)),
        Err(OrchestratorError::Validation(msg)) => {
            Err((StatusCode::BAD_REQUEST, Json(FailMessage::new(msg))))
        }
        Err(OrchestratorError::Upstream(e)) => {
            warn!("Effort estimation inference failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FailMessage::new("Error estimating effort.")),
            ))
        }
    }
}

// ============================================================================
// Hook Routes
// ============================================================================

pub fn hook_routes() -> Router<AppStateArc> {
    Router::new().route("/api/pre-commit-hook", get(pre_commit_hook))
}

/// Serve the hook script as a downloadable attachment.
async fn pre_commit_hook() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/plain".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", HOOK_FILENAME),
            ),
        ],
        PRE_COMMIT_HOOK,
    )
}

// ============================================================================
// Commit Routes
// ============================================================================

#[derive(Debug, Deserialize)]
struct PageParams {
    #[serde(default = "default_page")]
    page: usize,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    page: usize,
    limit: usize,
    total: usize,
    total_pages: usize,
}

impl Pagination {
    fn new(page: usize, limit: usize, total: usize) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: if limit == 0 { 0 } else { total.div_ceil(limit) },
        }
    }
}

#[derive(Debug, Serialize)]
struct CommitListResponse {
    success: bool,
    commits: Vec<CommitRecord>,
    pagination: Pagination,
}

impl CommitListResponse {
    fn from_page(page: CommitPage, params: &PageParams) -> Self {
        Self {
            success: true,
            pagination: Pagination::new(params.page, params.limit, page.total),
            commits: page.commits,
        }
    }
}

#[derive(Debug, Serialize)]
struct CommitDetailResponse {
    success: bool,
    commit: Option<CommitRecord>,
}

#[derive(Debug, Serialize)]
struct CommitDiffResponse {
    success: bool,
    diff: Option<String>,
}

#[derive(Debug, Serialize)]
struct CommitStatsResponse {
    success: bool,
    stats: CommitStats,
}

#[derive(Debug, Serialize)]
struct StubError {
    success: bool,
    error: String,
}

impl StubError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

pub fn commit_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/commits", get(list_commits))
        .route("/api/commits/stats/overview", get(commit_stats))
        .route("/api/commits/author/:email", get(commits_by_author))
        .route("/api/commits/status/:status", get(commits_by_status))
        .route("/api/commits/:hash", get(get_commit))
        .route("/api/commits/:hash/diff", get(get_commit_diff))
}

async fn list_commits(
    State(state): State<AppStateArc>,
    Query(params): Query<PageParams>,
) -> Json<CommitListResponse> {
    let page = state.commits.list(params.page, params.limit);
    Json(CommitListResponse::from_page(page, &params))
}

async fn get_commit(
    State(state): State<AppStateArc>,
    Path(hash): Path<String>,
) -> Json<CommitDetailResponse> {
    Json(CommitDetailResponse {
        success: true,
        commit: state.commits.get(&hash),
    })
}

async fn get_commit_diff(
    State(state): State<AppStateArc>,
    Path(hash): Path<String>,
) -> Json<CommitDiffResponse> {
    Json(CommitDiffResponse {
        success: true,
        diff: state.commits.diff(&hash),
    })
}

async fn commits_by_author(
    State(state): State<AppStateArc>,
    Path(email): Path<String>,
    Query(params): Query<PageParams>,
) -> Json<CommitListResponse> {
    let page = state.commits.by_author(&email, params.page, params.limit);
    Json(CommitListResponse::from_page(page, &params))
}

async fn commits_by_status(
    State(state): State<AppStateArc>,
    Path(status): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<CommitListResponse>, (StatusCode, Json<StubError>)> {
    let status: ReviewStatus = status.parse().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(StubError::new(
                "Invalid status. Must be: approved, rejected, or pending",
            )),
        )
    })?;
    let page = state.commits.by_status(status, params.page, params.limit);
    Ok(Json(CommitListResponse::from_page(page, &params)))
}

async fn commit_stats(State(state): State<AppStateArc>) -> Json<CommitStatsResponse> {
    Json(CommitStatsResponse {
        success: true,
        stats: state.commits.stats(),
    })
}

// ============================================================================
// Subscription Routes
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlanSelection {
    #[serde(rename = "planId", default)]
    plan_id: String,
}

#[derive(Debug, Serialize)]
struct SubscriptionStatusResponse {
    success: bool,
    subscription: Subscription,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanChangeResponse {
    success: bool,
    message: String,
    plan_id: String,
}

#[derive(Debug, Serialize)]
struct CancelResponse {
    success: bool,
    message: String,
}

#[derive(Debug, Serialize)]
struct PlansResponse {
    success: bool,
    plans: Vec<Plan>,
}

#[derive(Debug, Serialize)]
struct UsageResponse {
    success: bool,
    usage: Usage,
}

pub fn subscription_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/subscription/status", get(subscription_status))
        .route("/api/subscription/subscribe", post(subscribe))
        .route("/api/subscription/cancel", post(cancel_subscription))
        .route("/api/subscription/update", post(update_subscription))
        .route("/api/subscription/plans", get(list_plans))
        .route("/api/subscription/usage", get(subscription_usage))
}

async fn subscription_status(State(state): State<AppStateArc>) -> Json<SubscriptionStatusResponse> {
    Json(SubscriptionStatusResponse {
        success: true,
        subscription: state.subscriptions.status(),
    })
}

fn validate_plan(plan_id: &str) -> Result<(), (StatusCode, Json<StubError>)> {
    if is_valid_plan(plan_id) {
        Ok(())
    } else {
        Err((
            StatusCode::BAD_REQUEST,
            Json(StubError::new("Invalid plan ID")),
        ))
    }
}

async fn subscribe(
    State(state): State<AppStateArc>,
    Json(req): Json<PlanSelection>,
) -> Result<Json<PlanChangeResponse>, (StatusCode, Json<StubError>)> {
    validate_plan(&req.plan_id)?;
    state.subscriptions.subscribe(&req.plan_id);
    info!(plan = %req.plan_id, "Subscription created");
    Ok(Json(PlanChangeResponse {
        success: true,
        message: "Subscription created".to_string(),
        plan_id: req.plan_id,
    }))
}

async fn cancel_subscription(State(state): State<AppStateArc>) -> Json<CancelResponse> {
    state.subscriptions.cancel();
    info!("Subscription cancelled");
    Json(CancelResponse {
        success: true,
        message: "Subscription cancelled".to_string(),
    })
}

async fn update_subscription(
    State(state): State<AppStateArc>,
    Json(req): Json<PlanSelection>,
) -> Result<Json<PlanChangeResponse>, (StatusCode, Json<StubError>)> {
    validate_plan(&req.plan_id)?;
    state.subscriptions.update(&req.plan_id);
    info!(plan = %req.plan_id, "Subscription updated");
    Ok(Json(PlanChangeResponse {
        success: true,
        message: "Subscription updated".to_string(),
        plan_id: req.plan_id,
    }))
}

async fn list_plans() -> Json<PlansResponse> {
    Json(PlansResponse {
        success: true,
        plans: plan_catalog(),
    })
}

async fn subscription_usage(State(state): State<AppStateArc>) -> Json<UsageResponse> {
    Json(UsageResponse {
        success: true,
        usage: state.subscriptions.usage(),
    })
}
