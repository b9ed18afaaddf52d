//! Configuration for reviewd.
//!
//! Loads settings from a TOML file (`REVIEWD_CONFIG`, falling back to
//! `/etc/reviewd/config.toml`) and applies environment overrides on top:
//! `OLLAMA_URL`, `OLLAMA_MODEL`, and `REVIEWD_BIND`. Every field has a
//! default; a missing file is not an error.

use review_common::verdict::FallbackPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default config file path.
pub const CONFIG_PATH: &str = "/etc/reviewd/config.toml";

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address. The original service listened on port 3001.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Request body cap in bytes; review payloads can carry whole files.
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_bind() -> String {
    "127.0.0.1:3001".to_string()
}

fn default_body_limit() -> usize {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

/// Inference provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub url: String,

    /// Model used when a request does not name one.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Generation timeout. The original had none at all; a wedged provider
    /// would pin the request forever.
    #[serde(default = "default_generate_timeout")]
    pub generate_timeout_secs: u64,

    /// Timeout for /api/tags probing.
    #[serde(default = "default_tags_timeout")]
    pub tags_timeout_secs: u64,
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.1:latest".to_string()
}

fn default_generate_timeout() -> u64 {
    120
}

fn default_tags_timeout() -> u64 {
    2
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: default_ollama_url(),
            default_model: default_model(),
            generate_timeout_secs: default_generate_timeout(),
            tags_timeout_secs: default_tags_timeout(),
        }
    }
}

/// Commit-gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GateConfig {
    /// What an unclear model verdict means for the gate. `permissive`
    /// (the historical behavior) lets the commit through; `strict` blocks
    /// it. Deployments gating for security should set `strict`.
    #[serde(default)]
    pub unclear_verdict: FallbackPolicy,
}

/// Full daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReviewdConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub gate: GateConfig,
}

impl ReviewdConfig {
    /// Load config from disk and apply environment overrides.
    pub fn load() -> Self {
        let path = std::env::var("REVIEWD_CONFIG").unwrap_or_else(|_| CONFIG_PATH.to_string());
        let mut config = Self::load_from(Path::new(&path));
        config.apply_env_overrides();
        config
    }

    fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Invalid config at {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("OLLAMA_URL") {
            if !url.is_empty() {
                self.ollama.url = url;
            }
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            if !model.is_empty() {
                self.ollama.default_model = model;
            }
        }
        if let Ok(bind) = std::env::var("REVIEWD_BIND") {
            if !bind.is_empty() {
                self.server.bind = bind;
            }
        }
    }

    /// Load from an explicit path, without environment overrides.
    pub fn from_file(path: &Path) -> Self {
        Self::load_from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ReviewdConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:3001");
        assert_eq!(config.ollama.url, "http://localhost:11434");
        assert_eq!(config.ollama.default_model, "llama3.1:latest");
        assert_eq!(config.gate.unclear_verdict, FallbackPolicy::Permissive);
    }

    #[test]
    fn test_missing_file_is_defaults() {
        let config = ReviewdConfig::from_file(Path::new("/nonexistent/reviewd.toml"));
        assert_eq!(config.server.bind, "127.0.0.1:3001");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[ollama]\nurl = \"http://10.0.0.5:11434\"\n\n[gate]\nunclear_verdict = \"strict\"\n"
        )
        .unwrap();

        let config = ReviewdConfig::from_file(file.path());
        assert_eq!(config.ollama.url, "http://10.0.0.5:11434");
        assert_eq!(config.gate.unclear_verdict, FallbackPolicy::Strict);
        // Unspecified sections keep their defaults.
        assert_eq!(config.ollama.default_model, "llama3.1:latest");
        assert_eq!(config.server.body_limit_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml [[[").unwrap();
        let config = ReviewdConfig::from_file(file.path());
        assert_eq!(config.ollama.default_model, "llama3.1:latest");
    }
}
