//! Model catalog for the `/api/models` endpoint.
//!
//! The catalog is static; only the `installed` flag is computed, by
//! matching the provider's installed model names. Ollama names carry tags
//! (`codellama:13b`), so a catalog entry matches either exactly or as the
//! `name:` prefix of an installed tag.

use crate::api::ModelStatus;

/// A model the UI offers, independent of what is installed locally.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub display: &'static str,
    pub recommended: bool,
}

/// Models offered in the UI picker.
pub const MODEL_CATALOG: &[CatalogEntry] = &[
    CatalogEntry { name: "llama3.2", display: "Llama 3.2", recommended: true },
    CatalogEntry { name: "llama3.1:latest", display: "Llama 3.1", recommended: false },
    CatalogEntry { name: "codellama", display: "CodeLlama", recommended: true },
    CatalogEntry { name: "deepseek-coder", display: "DeepSeek Coder", recommended: true },
    CatalogEntry { name: "mistral", display: "Mistral", recommended: false },
    CatalogEntry { name: "qwen2.5-coder", display: "Qwen2.5 Coder", recommended: true },
    CatalogEntry { name: "granite-code", display: "Granite Code", recommended: false },
];

/// True when `installed` satisfies the catalog `name`, exactly or by tag.
fn matches_installed(name: &str, installed: &str) -> bool {
    installed == name || installed.starts_with(&format!("{}:", name))
}

/// Mark each catalog entry installed against the provider's model list.
pub fn catalog_with_installed(installed: &[String]) -> Vec<ModelStatus> {
    MODEL_CATALOG
        .iter()
        .map(|entry| ModelStatus {
            name: entry.name.to_string(),
            display: entry.display.to_string(),
            recommended: entry.recommended,
            installed: installed.iter().any(|i| matches_installed(entry.name, i)),
        })
        .collect()
}
