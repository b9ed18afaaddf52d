//! Pre-commit hook script emitter.
//!
//! The script is a versioned asset baked in at build time, not assembled
//! per request. It drives the gate, effort, discussion, and fix endpoints
//! from a local git pre-commit hook:
//!
//! ```text
//! curl http://localhost:3001/api/pre-commit-hook > .git/hooks/pre-commit
//! chmod +x .git/hooks/pre-commit
//! ```

/// The pre-commit hook script, verbatim.
pub const PRE_COMMIT_HOOK: &str = include_str!("../assets/pre-commit.sh");

/// Filename suggested to the downloading client.
pub const HOOK_FILENAME: &str = "pre-commit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_is_a_shell_script() {
        assert!(PRE_COMMIT_HOOK.starts_with("#!/bin/bash"));
    }

    #[test]
    fn test_hook_drives_all_gate_endpoints() {
        for endpoint in [
            "/api/review/commit",
            "/api/review/effort",
            "/api/review/discussion",
            "/api/review/fix",
        ] {
            assert!(
                PRE_COMMIT_HOOK.contains(endpoint),
                "hook script does not call {}",
                endpoint
            );
        }
    }

    #[test]
    fn test_hook_reads_contract_fields() {
        assert!(PRE_COMMIT_HOOK.contains("jq -r '.status'"));
        assert!(PRE_COMMIT_HOOK.contains("jq -r '.summary'"));
        assert!(PRE_COMMIT_HOOK.contains("jq -r '.fixed_code'"));
        assert!(PRE_COMMIT_HOOK.contains("jq -r '.estimate'"));
    }
}
