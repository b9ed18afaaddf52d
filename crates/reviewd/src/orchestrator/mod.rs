//! Review orchestration.
//!
//! The composition root behind every review endpoint: validate the
//! request, render the prompt, call the LLM backend, classify or sanitize
//! the output, and shape the response. Backend failures never leave this
//! module unmapped.

mod backend;

pub use backend::{
    FakeBackend, FakeBackendBuilder, LlmBackend, OllamaBackend, RecordedCall,
};

use chrono::Utc;
use review_common::api::{
    EffortResponse, FixResponse, ModelStatus, ReviewRequest, ReviewResponse, Status, Verdict,
};
use review_common::catalog::catalog_with_installed;
use review_common::ollama::OllamaError;
use review_common::prompts;
use review_common::verdict::{classify, strip_code_fences, FallbackPolicy};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Sentinel when the full-review flow gets no completion text.
const NO_REVIEW_SENTINEL: &str = "No review generated";

/// Sentinel when the fix flow gets no completion text.
const NO_FIX_SENTINEL: &str = "// No fix generated.";

/// Sentinel when the effort flow gets no completion text.
const NO_ESTIMATE_SENTINEL: &str = "Unable to estimate effort.";

/// Why an orchestrated flow did not produce a result.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Missing or empty required input; maps to HTTP 400.
    #[error("{0}")]
    Validation(&'static str),

    /// The inference provider failed or is unreachable; maps to HTTP 500.
    #[error(transparent)]
    Upstream(#[from] OllamaError),
}

/// Per-request façade over the prompt builders, backend, and classifier.
pub struct ReviewOrchestrator {
    backend: Arc<dyn LlmBackend>,
    default_model: String,
    gate_policy: FallbackPolicy,
}

impl ReviewOrchestrator {
    pub fn new(
        backend: Arc<dyn LlmBackend>,
        default_model: impl Into<String>,
        gate_policy: FallbackPolicy,
    ) -> Self {
        Self {
            backend,
            default_model: default_model.into(),
            gate_policy,
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Full review: raw model output, no classification.
    pub async fn review(&self, req: &ReviewRequest) -> Result<ReviewResponse, OrchestratorError> {
        if req.code.trim().is_empty() || req.language.trim().is_empty() {
            return Err(OrchestratorError::Validation(
                "Code and language are required",
            ));
        }

        let model = req
            .model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(&self.default_model)
            .to_string();
        let prompt = prompts::build_full_review(&req.language, &req.code, req.ruleset.as_ref());

        info!(
            language = %req.language,
            model = %model,
            prompt_chars = prompt.len(),
            "Running full review"
        );
        let raw = self.generate(&model, &prompt).await?;
        let review = match raw.trim() {
            "" => NO_REVIEW_SENTINEL.to_string(),
            text => text.to_string(),
        };

        Ok(ReviewResponse {
            review,
            model,
            language: req.language.clone(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    /// Commit gate: strict diff review classified with the configured
    /// fallback policy.
    pub async fn gate(&self, code: &str) -> Result<Verdict, OrchestratorError> {
        if code.trim().is_empty() {
            return Err(OrchestratorError::Validation(
                "No code provided for analysis.",
            ));
        }

        let prompt = prompts::build_commit_gate(code);
        info!(prompt_chars = prompt.len(), "Running commit gate review");
        let raw = self.generate(&self.default_model, &prompt).await?;
        Ok(classify(&raw, self.gate_policy))
    }

    /// Discussion: re-evaluate a finding against the developer's reply.
    /// Classified strictly: a reply that does not start with `OK:` keeps
    /// the commit blocked.
    pub async fn discussion(
        &self,
        issue: &str,
        developer_response: &str,
    ) -> Result<Verdict, OrchestratorError> {
        let prompt = prompts::build_discussion(issue, developer_response);
        info!(prompt_chars = prompt.len(), "Running discussion review");
        let raw = self.generate(&self.default_model, &prompt).await?;
        Ok(classify(&raw, FallbackPolicy::Strict))
    }

    /// Auto-fix: sanitized corrected source, no classification.
    pub async fn fix(&self, code: &str) -> Result<FixResponse, OrchestratorError> {
        if code.trim().is_empty() {
            return Err(OrchestratorError::Validation("No code provided."));
        }

        let prompt = prompts::build_fix(code);
        info!(prompt_chars = prompt.len(), "Running auto-fix");
        let raw = self.generate(&self.default_model, &prompt).await?;
        let fixed_code = if raw.trim().is_empty() {
            NO_FIX_SENTINEL.to_string()
        } else {
            strip_code_fences(&raw)
        };

        Ok(FixResponse {
            status: Status::Ok,
            fixed_code,
        })
    }

    /// Effort estimate for a finding summary.
    pub async fn effort(&self, summary: &str) -> Result<EffortResponse, OrchestratorError> {
        if summary.trim().is_empty() {
            return Err(OrchestratorError::Validation("No summary provided."));
        }

        let prompt = prompts::build_effort(summary);
        info!(prompt_chars = prompt.len(), "Running effort estimation");
        let raw = self.generate(&self.default_model, &prompt).await?;
        let estimate = match raw.trim() {
            "" => NO_ESTIMATE_SENTINEL.to_string(),
            text => text.to_string(),
        };

        Ok(EffortResponse {
            status: Status::Ok,
            estimate,
        })
    }

    /// Model catalog with the `installed` flag resolved from the provider.
    pub async fn models(&self) -> Result<Vec<ModelStatus>, OrchestratorError> {
        let installed = self.backend.list_installed().await?;
        Ok(catalog_with_installed(&installed))
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<String, OllamaError> {
        match self.backend.generate(model, prompt).await {
            Ok(text) => Ok(text),
            Err(e) => {
                error!(model = %model, "Inference call failed: {}", e);
                Err(e)
            }
        }
    }
}
