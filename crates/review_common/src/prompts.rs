//! Prompt templates for the five review flows.
//!
//! Each builder is a pure function of its inputs: same request, same
//! prompt, byte for byte. The full-review template mandates a structured
//! output format (severity / module / location / explanation / impact /
//! recommendation / standard reference per finding); the UI currently
//! renders it as text, but the markers are a contract for a future
//! structured parser and must not drift.
//!
//! The gate, discussion, fix, and effort templates request the `OK:` /
//! `FAIL:` single-line convention that `verdict::classify` parses.

use crate::guidelines::guidelines_for;

/// Render the optional custom-ruleset section, delimited so the model can
/// tell developer-supplied rules from the built-in guideline list. The
/// ruleset is serialized verbatim; it only shapes the model's attention
/// and is never executed, so no structural validation happens here.
fn ruleset_section(ruleset: Option<&serde_json::Value>) -> String {
    match ruleset {
        Some(rules) => {
            let pretty = serde_json::to_string_pretty(rules)
                .unwrap_or_else(|_| rules.to_string());
            format!(
                "\n\n### Custom Coding Standards\nYou must also apply these custom rules:\n{}\n",
                pretty
            )
        }
        None => String::new(),
    }
}

/// Full-review prompt: guideline-aware, modular, with the mandatory
/// finding structure.
pub fn build_full_review(
    language: &str,
    code: &str,
    ruleset: Option<&serde_json::Value>,
) -> String {
    let guidelines = guidelines_for(language);
    let guideline_bullets = guidelines
        .iter()
        .map(|g| format!("- {}", g))
        .collect::<Vec<_>>()
        .join("\n");
    let guideline_list = guidelines.join(", ");
    let doc_guideline = guidelines
        .iter()
        .find(|g| g.contains("Doc") || g.contains("doc"))
        .copied()
        .unwrap_or("standard docstring format");
    let custom_rules = ruleset_section(ruleset);

    format!(
        r#"You are an expert senior software engineer and code reviewer with deep knowledge of {language} coding standards.

**CRITICAL: You must evaluate code against these official coding standards:**
{guideline_bullets}
{custom_rules}
---

**MODULAR EVALUATION REQUIRED - Analyze across these distinct dimensions:**

1. **LINTING ANALYSIS**
   - Check syntax errors, formatting violations
   - Verify naming conventions per {language} standards
   - Identify style violations (indentation, spacing, line length)
   - Check for unused imports/variables
   - Validate code structure and organization

2. **SECURITY ANALYSIS**
   - Identify vulnerabilities (SQL injection, XSS, CSRF, etc.)
   - Check for hardcoded secrets, credentials, or API keys
   - Review input validation and sanitization
   - Check authorization and authentication patterns
   - Identify unsafe patterns, deprecated APIs, or weak cryptography
   - Review error handling that might leak sensitive information

3. **ARCHITECTURE ANALYSIS**
   - Evaluate design patterns usage (appropriate vs. over-engineered)
   - Check SOLID principles adherence
   - Analyze coupling and cohesion
   - Review module/component structure and separation of concerns
   - Check for code duplication (DRY principle)
   - Evaluate scalability and extensibility

4. **TESTING ANALYSIS**
   - Assess test coverage needs
   - Identify testable vs untestable code
   - Check for missing unit tests
   - Review testing patterns (mocking, fixtures, assertions)
   - Identify edge cases that need testing
   - Check testability (dependency injection, etc.)

5. **CI/CD ANALYSIS**
   - Check build configuration compatibility
   - Identify dependency management issues
   - Review environment configuration needs
   - Check for CI/CD pipeline compatibility
   - Identify deployment considerations
   - Review version compatibility

6. **DOCUMENTATION ANALYSIS**
   - Identify missing docstrings/comments
   - Check for outdated documentation
   - Suggest README updates
   - Review API documentation needs
   - Identify inline documentation gaps
   - Check for missing type hints (where applicable)

---

### Input Code
```{language}
{code}
```

---

### Output Format (MANDATORY STRUCTURE)

#### 🧠 Code Review Summary
Brief overview of code functionality and overall quality assessment.

#### 📋 Modular Findings

**EACH FINDING MUST FOLLOW THIS EXACT STRUCTURE:**

---

##### Finding #1: [Brief Descriptive Title]

**Severity:** [Critical/High/Medium/Low]

**Module:** [Linting/Security/Architecture/Testing/CI-CD/Documentation]

**Location:**
- File: [filename if known, or "provided code"]
- Line(s): [exact line numbers, e.g., "Line 15", "Lines 23-27"]

**Explanation:**
[Clear, detailed explanation of what the issue is. Be specific about what's wrong, why it's problematic, and what standard/guideline it violates.]

**Impact:**
[Explain the consequences:
- What happens if this is not fixed?
- How does it affect the codebase/users/security/performance/maintainability?
- What are the risks?
Be specific and realistic.]

**Recommendation:**
[Provide a detailed recommendation with:
1. Specific steps to fix the issue
2. Code example showing the problematic code
3. Code example showing the corrected code
4. Explanation of why this fix works
5. Best practices to follow going forward]

**Standard Reference:**
[Reference the specific coding standard violated:
- For {language}: {guideline_list}
- Include specific rule numbers, section names, or guideline names when possible
- If custom ruleset violation, reference the custom rule]

---

##### Finding #2: [Brief Title]
[Repeat the same structure as Finding #1]

---

[Continue for ALL findings, numbering sequentially]

#### 🛠️ Priority Summary
List all findings sorted by severity:
- **Critical:** [count] findings (must fix before merging)
- **High:** [count] findings (should fix soon)
- **Medium:** [count] findings (consider fixing)
- **Low:** [count] findings (nice to have)

#### 📚 Documentation Recommendations

**README Updates Needed:**
- [Specific section/feature to document with suggested content]

**Code Documentation Needed:**
- Function [name] (Line X): [Missing docstring - provide example following {language} conventions]
- Class [name] (Line Y): [Missing class docstring - provide example]

**API Documentation Needed:**
- [If applicable: endpoints, parameters, return types, examples]

**Inline Comments Needed:**
- Line X: [Complex logic that needs explanation - provide example comment]

**Documentation Standards:**
- Follow {language} documentation conventions (e.g., {doc_guideline})

#### ✅ Fixed / Improved Code
Provide the full corrected and improved code below.
It must be syntactically correct, runnable, and follow ALL {language} best practices and standards mentioned above.

```{language}
<fixed version of the code>
```

---

**CRITICAL INSTRUCTIONS:**
- EVERY finding MUST include ALL 6 elements: Severity, Module, Location, Explanation, Impact, Recommendation, Standard Reference
- Be extremely specific with line numbers when possible
- Provide actual code examples in the Recommendation section
- Reference real, specific coding standards (don't just say "best practices")
- If no issues are found, state that clearly but still provide suggestions for improvement
- Keep your tone professional and constructive
- Ensure the fixed code integrates all recommended improvements
- Document all functions, classes, and complex logic in the fixed code"#,
        language = language,
        guideline_bullets = guideline_bullets,
        custom_rules = custom_rules,
        guideline_list = guideline_list,
        doc_guideline = doc_guideline,
        code = code,
    )
}

/// Commit-gate prompt: strict pass/fail evaluation of a staged diff.
pub fn build_commit_gate(code: &str) -> String {
    format!(
        r#"
You are an AI code reviewer evaluating a git diff for a pre-commit hook.

Be extremely strict and detailed. Your review will block commits if issues are found.

**EVALUATION CRITERIA:**

1. **Syntax & Compilation**
   - Any syntax errors or incomplete statements
   - Any non-compilable code (invalid syntax)
   - Any gibberish, meaningless text, or profanity
   - Any malformed code structures

2. **Security Issues**
   - Hardcoded secrets, passwords, API keys, or credentials
   - SQL injection vulnerabilities
   - XSS vulnerabilities
   - Unsafe eval() or code execution
   - Missing input validation
   - Insecure cryptographic practices

3. **Code Quality**
   - Bad practices or logical issues
   - Code that violates basic coding standards
   - Potentially harmful or malicious code patterns
   - Dead code or unreachable statements

4. **Guideline Compliance**
   - Check against common coding standards
   - Identify obvious style violations
   - Detect anti-patterns

**OUTPUT FORMAT:**
- If code contains issues: Start with "FAIL:" and provide a clear, concise explanation
- If code is safe and clean: Start with "OK:" and briefly explain why
- Always return ONE clear line starting with either "OK:" or "FAIL:"
- Be specific: mention what type of issue (security, syntax, quality, etc.)

Git diff to analyze:
{code}
"#,
        code = code,
    )
}

/// Discussion prompt: re-evaluate a finding against the developer's reply.
pub fn build_discussion(issue: &str, developer_response: &str) -> String {
    format!(
        r#"
You are the AI code reviewer in a discussion with a developer.

**CONTEXT:**
Original issue you identified:
"{issue}"

Developer's response/explanation:
"{developer_response}"

**YOUR TASK:**
Reevaluate the original issue considering the developer's explanation.

**EVALUATION:**
- If the developer's explanation resolves the issue or provides valid justification, start with "OK:" and acknowledge the resolution
- If the issue is still problematic despite the explanation, start with "FAIL:" and briefly explain why
- If the developer's response raises new concerns, start with "FAIL:" and explain the new issues
- Be constructive and professional in your response

**OUTPUT FORMAT:**
- Start with "OK:" if resolved, or "FAIL:" if still problematic
- Provide a brief, clear explanation
- Keep response concise but informative
"#,
        issue = issue,
        developer_response = developer_response,
    )
}

/// Auto-fix prompt: corrected code only, no commentary, no fences.
pub fn build_fix(code: &str) -> String {
    format!(
        r#"
You are an AI developer assistant specializing in code fixes.

**TASK:**
Fix the following code by making minimal necessary changes.

**REQUIREMENTS:**
- Fix syntax errors, security issues, and obvious bugs
- Make code valid, secure, and professional
- Maintain original functionality
- Follow coding best practices
- Apply appropriate security fixes
- Improve code quality where critical

**CRITICAL:**
- Return ONLY the fixed code
- Do NOT include explanations, comments, or markdown
- Do NOT wrap code in code fences (```)
- Return raw code that can be directly written to a file
- Preserve the original code structure and logic where possible

Code to fix:
{code}
"#,
        code = code,
    )
}

/// Effort-estimate prompt: size the fix for a finding summary.
pub fn build_effort(summary: &str) -> String {
    format!(
        r#"
You are an experienced software engineer estimating development effort.

**TASK:**
Estimate how long it would take to fix the issue described below.

**CONSIDER:**
- Time to understand the issue
- Time to implement the fix
- Time to test the fix
- Time to verify the solution
- Complexity of the issue
- Potential side effects or related changes needed

**OUTPUT FORMAT:**
- Provide a realistic estimate in minutes or hours
- Be concise (1-2 sentences maximum)
- If unsure, provide a range (e.g., "15-30 minutes")
- Consider a typical developer's pace

Issue description:
{summary}
"#,
        summary = summary,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guidelines::{guidelines_for, supported_languages, GENERIC_GUIDELINE};

    #[test]
    fn test_full_review_contains_every_guideline_name() {
        for lang in supported_languages() {
            let prompt = build_full_review(lang, "fn main() {}", None);
            for guideline in guidelines_for(lang) {
                assert!(
                    prompt.contains(guideline),
                    "prompt for '{}' is missing guideline '{}'",
                    lang,
                    guideline
                );
            }
        }
    }

    #[test]
    fn test_full_review_unknown_language_uses_generic_entry() {
        let prompt = build_full_review("brainfuck", "+++", None);
        assert!(prompt.contains(GENERIC_GUIDELINE));
        assert!(prompt.contains("```brainfuck"));
    }

    #[test]
    fn test_full_review_is_idempotent() {
        let ruleset = serde_json::json!({"max_line_length": 100});
        let a = build_full_review("python", "print(1)", Some(&ruleset));
        let b = build_full_review("python", "print(1)", Some(&ruleset));
        assert_eq!(a, b);
    }

    #[test]
    fn test_full_review_embeds_code_fenced_with_language() {
        let prompt = build_full_review("rust", "fn main() {}", None);
        assert!(prompt.contains("```rust\nfn main() {}\n```"));
    }

    #[test]
    fn test_full_review_output_format_markers_present() {
        let prompt = build_full_review("go", "package main", None);
        for marker in [
            "### Output Format (MANDATORY STRUCTURE)",
            "**Severity:**",
            "**Module:**",
            "**Location:**",
            "**Explanation:**",
            "**Impact:**",
            "**Recommendation:**",
            "**Standard Reference:**",
        ] {
            assert!(prompt.contains(marker), "missing marker {}", marker);
        }
    }

    #[test]
    fn test_full_review_ruleset_serialized_verbatim() {
        let ruleset = serde_json::json!({"forbid": ["eval", "exec"]});
        let prompt = build_full_review("javascript", "eval(x)", Some(&ruleset));
        assert!(prompt.contains("### Custom Coding Standards"));
        assert!(prompt.contains("\"forbid\""));
        assert!(prompt.contains("\"eval\""));
    }

    #[test]
    fn test_full_review_without_ruleset_has_no_custom_section() {
        let prompt = build_full_review("javascript", "let x = 1;", None);
        assert!(!prompt.contains("### Custom Coding Standards"));
    }

    #[test]
    fn test_commit_gate_embeds_diff_and_markers() {
        let prompt = build_commit_gate("+ let password = \"hunter2\";");
        assert!(prompt.contains("+ let password = \"hunter2\";"));
        assert!(prompt.contains("\"OK:\""));
        assert!(prompt.contains("\"FAIL:\""));
    }

    #[test]
    fn test_discussion_embeds_both_sides() {
        let prompt = build_discussion("FAIL: hardcoded secret", "it is a test fixture");
        assert!(prompt.contains("FAIL: hardcoded secret"));
        assert!(prompt.contains("it is a test fixture"));
    }

    #[test]
    fn test_fix_prompt_forbids_fences() {
        let prompt = build_fix("console.log(1)");
        assert!(prompt.contains("Do NOT wrap code in code fences"));
        assert!(prompt.contains("console.log(1)"));
    }

    #[test]
    fn test_effort_prompt_embeds_summary() {
        let prompt = build_effort("FAIL: missing input validation");
        assert!(prompt.contains("FAIL: missing input validation"));
        assert!(prompt.contains("15-30 minutes"));
    }
}
