//! Shared library for the reviewd code-review service.
//!
//! Holds everything both the daemon and its tests need: the HTTP API wire
//! types, the per-language guideline table, the prompt builders, the
//! response classifier, the model catalog, the repository traits, and the
//! Ollama client.

pub mod api;
pub mod catalog;
pub mod guidelines;
pub mod ollama;
pub mod prompts;
pub mod store;
pub mod verdict;

pub use api::{
    DiscussionRequest, EffortRequest, EffortResponse, ErrorBody, FailMessage, FixRequest,
    FixResponse, GateRequest, ModelStatus, ModelsResponse, ReviewRequest, ReviewResponse, Status,
    Verdict,
};
pub use catalog::{catalog_with_installed, CatalogEntry, MODEL_CATALOG};
pub use guidelines::{guidelines_for, supported_languages, GENERIC_GUIDELINE};
pub use ollama::{GenerateResponse, OllamaClient, OllamaError, OLLAMA_DEFAULT_URL};
pub use store::{
    is_valid_plan, plan_catalog, CommitPage, CommitRecord, CommitStats, CommitStore,
    InMemoryCommitStore, InMemorySubscriptionStore, Plan, ReviewStatus, Subscription,
    SubscriptionStore, Usage,
};
pub use verdict::{classify, strip_code_fences, FallbackPolicy, NO_RESPONSE_SENTINEL};
