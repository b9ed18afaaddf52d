//! reviewd - local AI code-review daemon.
//!
//! Serves the review API over HTTP and drives a local Ollama instance for
//! inference. The orchestration pipeline lives in [`orchestrator`]; the
//! prompt templates, classifier, and wire types live in `review_common`.

pub mod config;
pub mod hook;
pub mod orchestrator;
pub mod routes;
pub mod server;
