//! HTTP client for the local Ollama API.
//!
//! Endpoints used:
//! - GET / - health check
//! - GET /api/tags - list installed models
//! - POST /api/generate - non-streaming generation
//!
//! No retries and no local state between calls. The original service had
//! no timeout at all; a bounded one is applied here so a wedged provider
//! cannot pin a request forever.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default Ollama API endpoint.
pub const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";

/// Default timeout for tag listing and health checks (ms).
pub const TAGS_TIMEOUT_MS: u64 = 2_000;

/// Default timeout for generation (ms). Full reviews on CPU-only hosts are
/// slow, so this is deliberately generous.
pub const GENERATE_TIMEOUT_MS: u64 = 120_000;

/// Error from Ollama operations.
#[derive(Debug, Clone, Error)]
pub enum OllamaError {
    #[error("Ollama not available: {0}")]
    NotAvailable(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generate error: {0}")]
    Generate(String),
}

/// Model info from /api/tags.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaModel {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub modified_at: String,
}

/// Response from /api/tags.
#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<OllamaModel>,
}

/// Request for /api/generate. `stream` is always false; the orchestrator
/// wants one completed body, not chunks.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

/// Response from /api/generate (non-streaming).
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub model: String,
    /// Completion text. Defaulted so a provider that omits the field
    /// surfaces as empty text for the caller's sentinel, not a parse error.
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub total_duration: u64,
    #[serde(default)]
    pub eval_count: u32,
}

/// Ollama client for local LLM calls.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    generate_timeout_ms: u64,
    tags_timeout_ms: u64,
}

impl OllamaClient {
    /// Create a client for the given base URL.
    pub fn new(url: &str) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            generate_timeout_ms: GENERATE_TIMEOUT_MS,
            tags_timeout_ms: TAGS_TIMEOUT_MS,
        }
    }

    /// Set the generation timeout in milliseconds.
    pub fn with_generate_timeout(mut self, timeout_ms: u64) -> Self {
        self.generate_timeout_ms = timeout_ms;
        self
    }

    /// Set the tag-listing timeout in milliseconds.
    pub fn with_tags_timeout(mut self, timeout_ms: u64) -> Self {
        self.tags_timeout_ms = timeout_ms;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn http_client(&self, timeout_ms: u64) -> Result<reqwest::Client, OllamaError> {
        reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| OllamaError::Http(e.to_string()))
    }

    fn map_transport_error(e: reqwest::Error) -> OllamaError {
        if e.is_timeout() {
            OllamaError::Timeout
        } else if e.is_connect() {
            OllamaError::NotAvailable(e.to_string())
        } else {
            OllamaError::Http(e.to_string())
        }
    }

    /// Check if Ollama is reachable.
    pub async fn is_available(&self) -> bool {
        let client = match self.http_client(self.tags_timeout_ms) {
            Ok(c) => c,
            Err(_) => return false,
        };
        match client.get(&self.base_url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// List installed models.
    pub async fn list_models(&self) -> Result<Vec<OllamaModel>, OllamaError> {
        let client = self.http_client(self.tags_timeout_ms)?;
        let url = format!("{}/api/tags", self.base_url);
        let resp = client
            .get(&url)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !resp.status().is_success() {
            return Err(OllamaError::Http(format!("Status: {}", resp.status())));
        }

        let tags: TagsResponse = resp
            .json()
            .await
            .map_err(|e| OllamaError::Parse(e.to_string()))?;
        Ok(tags.models)
    }

    /// Generate a completion (non-streaming).
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<GenerateResponse, OllamaError> {
        let client = self.http_client(self.generate_timeout_ms)?;
        let request = GenerateRequest {
            model: model.to_string(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let url = format!("{}/api/generate", self.base_url);
        let resp = client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            if status.as_u16() == 404 {
                return Err(OllamaError::ModelNotFound(model.to_string()));
            }
            return Err(OllamaError::Generate(format!("Status {}: {}", status, body)));
        }

        resp.json()
            .await
            .map_err(|e| OllamaError::Parse(e.to_string()))
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new(OLLAMA_DEFAULT_URL)
    }
}
