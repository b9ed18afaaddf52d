//! Wire types for the reviewd HTTP API.
//!
//! Every shape here is request-scoped: built for one HTTP exchange and
//! dropped at its end. The pre-commit hook script consumes the gate-flow
//! shapes (`status` / `summary` / `fixed_code` / `estimate`), so field
//! names are part of the external contract.

use serde::{Deserialize, Serialize};

/// Pass/fail status attached to machine-consumed review outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Fail,
}

/// Full review request: source code plus how to review it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub language: String,
    /// Model override; the configured default is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Opaque custom ruleset, serialized verbatim into the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruleset: Option<serde_json::Value>,
}

/// Full review response: the raw model output plus request echo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub review: String,
    /// Model that actually served the request.
    pub model: String,
    pub language: String,
    /// ISO-8601, set when the response is shaped.
    pub timestamp: String,
}

/// Commit-gate request: the staged diff (or file contents).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateRequest {
    #[serde(default)]
    pub code: String,
}

/// Classified outcome for the gate and discussion flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: Status,
    pub summary: String,
}

impl Verdict {
    pub fn ok(summary: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            summary: summary.into(),
        }
    }

    pub fn fail(summary: impl Into<String>) -> Self {
        Self {
            status: Status::Fail,
            summary: summary.into(),
        }
    }
}

/// Discussion request: a finding and the developer's rebuttal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionRequest {
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub developer_response: String,
}

/// Auto-fix request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixRequest {
    #[serde(default)]
    pub code: String,
}

/// Auto-fix response: sanitized source text, not a classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixResponse {
    pub status: Status,
    pub fixed_code: String,
}

/// Effort-estimate request: a finding summary to size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffortRequest {
    #[serde(default)]
    pub summary: String,
}

/// Effort-estimate response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffortResponse {
    pub status: Status,
    pub estimate: String,
}

/// Error shape for the fix/effort flows (the hook script reads `message`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailMessage {
    pub status: Status,
    pub message: String,
}

impl FailMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: Status::Fail,
            message: message.into(),
        }
    }
}

/// Uniform error body for the review/models flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// One catalog entry in the `/api/models` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub name: String,
    pub display: String,
    pub recommended: bool,
    pub installed: bool,
}

/// `/api/models` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelStatus>,
}
