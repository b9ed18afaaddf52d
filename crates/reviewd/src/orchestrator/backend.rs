//! LLM backend trait abstraction.
//!
//! The orchestrator talks to the inference provider through this trait so
//! tests run deterministically without a network. Production code uses
//! `OllamaBackend`; tests use `FakeBackend` with scripted replies.

use async_trait::async_trait;
use review_common::ollama::{OllamaClient, OllamaError};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Minimal interface the orchestrator needs from the inference provider.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Run one non-streaming generation and return the completion text.
    /// An empty string is a legal result; each flow substitutes its own
    /// sentinel.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, OllamaError>;

    /// Names of the models installed on the provider.
    async fn list_installed(&self) -> Result<Vec<String>, OllamaError>;
}

// ============================================================================
// Ollama Backend (Production)
// ============================================================================

/// Real backend calling the local Ollama HTTP API.
pub struct OllamaBackend {
    client: OllamaClient,
}

impl OllamaBackend {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, OllamaError> {
        let response = self.client.generate(model, prompt).await?;
        Ok(response.response)
    }

    async fn list_installed(&self) -> Result<Vec<String>, OllamaError> {
        let models = self.client.list_models().await?;
        Ok(models.into_iter().map(|m| m.name).collect())
    }
}

// ============================================================================
// Fake Backend (Testing)
// ============================================================================

/// Record of one generate call, for asserting what reached the provider.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
}

/// Deterministic backend with scripted replies.
///
/// Replies are consumed in order; when the queue is empty the default
/// reply is returned. `calls()` exposes everything the orchestrator sent.
pub struct FakeBackend {
    replies: Mutex<VecDeque<Result<String, OllamaError>>>,
    default_reply: Result<String, OllamaError>,
    installed: Vec<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeBackend {
    /// A backend that always answers with `reply`.
    pub fn always(reply: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            default_reply: Ok(reply.to_string()),
            installed: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A backend that always fails with `error`.
    pub fn failing(error: OllamaError) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            default_reply: Err(error),
            installed: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// All generate calls made so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmBackend for FakeBackend {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, OllamaError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                model: model.to_string(),
                prompt: prompt.to_string(),
            });
        }

        let queued = self.replies.lock().ok().and_then(|mut q| q.pop_front());
        queued.unwrap_or_else(|| self.default_reply.clone())
    }

    async fn list_installed(&self) -> Result<Vec<String>, OllamaError> {
        Ok(self.installed.clone())
    }
}

/// Builder for `FakeBackend` with convenient test setup.
pub struct FakeBackendBuilder {
    replies: VecDeque<Result<String, OllamaError>>,
    default_reply: Result<String, OllamaError>,
    installed: Vec<String>,
}

impl FakeBackendBuilder {
    pub fn new() -> Self {
        Self {
            replies: VecDeque::new(),
            default_reply: Ok(String::new()),
            installed: Vec::new(),
        }
    }

    /// Queue one successful reply.
    pub fn reply(mut self, text: &str) -> Self {
        self.replies.push_back(Ok(text.to_string()));
        self
    }

    /// Queue one failing reply.
    pub fn error(mut self, error: OllamaError) -> Self {
        self.replies.push_back(Err(error));
        self
    }

    /// Reply used once the queue is exhausted.
    pub fn default_reply(mut self, text: &str) -> Self {
        self.default_reply = Ok(text.to_string());
        self
    }

    /// Models the fake provider reports as installed.
    pub fn installed(mut self, models: &[&str]) -> Self {
        self.installed = models.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn build(self) -> FakeBackend {
        FakeBackend {
            replies: Mutex::new(self.replies),
            default_reply: self.default_reply,
            installed: self.installed,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl Default for FakeBackendBuilder {
    fn default() -> Self {
        Self::new()
    }
}
