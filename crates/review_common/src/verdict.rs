//! Free-text model output -> pass/fail classification.
//!
//! The gate, discussion, fix, and effort flows ask the model for a single
//! line starting with `OK:` or `FAIL:`. Models do not always comply, so
//! classification runs an ordered decision table: explicit markers first
//! (prefix match), then the implicit failure keywords (substring match),
//! then a configurable fallback. The prefix/substring asymmetry is part of
//! the contract, not an accident.

use crate::api::{Status, Verdict};
use serde::{Deserialize, Serialize};

/// Sentinel substituted for an empty or missing model response.
pub const NO_RESPONSE_SENTINEL: &str = "No AI response received.";

/// What to do when the model output matches no rule.
///
/// `Permissive` keeps the original behavior: unclear output does not block
/// a commit. `Strict` flips that for security-sensitive deployments; the
/// discussion flow always classifies strictly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    #[default]
    Permissive,
    Strict,
}

impl FallbackPolicy {
    fn status(self) -> Status {
        match self {
            FallbackPolicy::Permissive => Status::Ok,
            FallbackPolicy::Strict => Status::Fail,
        }
    }
}

/// How a rule inspects the lower-cased response text.
enum Matcher {
    Prefix(&'static str),
    Contains(&'static str),
}

/// Ordered rules; the first match wins, so an explicit marker always beats
/// the keyword heuristic.
const RULES: &[(Matcher, Status)] = &[
    (Matcher::Prefix("ok:"), Status::Ok),
    (Matcher::Prefix("fail:"), Status::Fail),
    (Matcher::Contains("error"), Status::Fail),
    (Matcher::Contains("issue"), Status::Fail),
];

/// Classify a raw completion into a pass/fail verdict.
///
/// The summary is always the trimmed original text (sentinel-substituted
/// when empty), never the lower-cased working copy.
pub fn classify(raw: &str, fallback: FallbackPolicy) -> Verdict {
    let text = raw.trim();
    let text = if text.is_empty() {
        NO_RESPONSE_SENTINEL
    } else {
        text
    };

    let lower = text.to_lowercase();
    for (matcher, status) in RULES {
        let hit = match matcher {
            Matcher::Prefix(p) => lower.starts_with(p),
            Matcher::Contains(s) => lower.contains(s),
        };
        if hit {
            return Verdict {
                status: *status,
                summary: text.to_string(),
            };
        }
    }

    Verdict {
        status: fallback.status(),
        summary: text.to_string(),
    }
}

/// Strip one leading and one trailing markdown code fence, if present.
///
/// The fix prompt forbids fences, but models add them anyway. Only the
/// outermost pair is removed (` ```lang ` on its own opening line, ` ``` `
/// at the end); inner fences in the fixed code are left alone.
pub fn strip_code_fences(raw: &str) -> String {
    let mut text = raw.trim();

    if text.starts_with("```") {
        // Drop the opening fence together with its optional language tag.
        text = match text.find('\n') {
            Some(pos) => &text[pos + 1..],
            None => "",
        };
    }

    if let Some(stripped) = text.trim_end().strip_suffix("```") {
        text = stripped;
    }

    text.trim().to_string()
}
