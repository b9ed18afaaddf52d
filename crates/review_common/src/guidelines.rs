//! Per-language coding guideline table.
//!
//! Every prompt that references coding standards pulls its guideline names
//! from here. Lookup is a case-sensitive exact match on the language key;
//! anything unknown gets the single generic entry so prompt building can
//! never fail on an unrecognized language.

/// Fallback entry for languages without a registered guideline list.
pub const GENERIC_GUIDELINE: &str = "General coding best practices";

/// Static language -> ordered guideline names mapping.
pub const GUIDELINE_TABLE: &[(&str, &[&str])] = &[
    (
        "javascript",
        &[
            "ESLint recommended rules",
            "Airbnb JavaScript Style Guide",
            "Google JavaScript Style Guide",
            "MDN JavaScript Best Practices",
        ],
    ),
    (
        "python",
        &[
            "PEP 8 (Style Guide for Python Code)",
            "PEP 257 (Docstring Conventions)",
            "Google Python Style Guide",
            "PEP 484 (Type Hints)",
        ],
    ),
    (
        "java",
        &[
            "Google Java Style Guide",
            "Oracle Code Conventions for Java",
            "Effective Java by Joshua Bloch",
        ],
    ),
    (
        "typescript",
        &[
            "TypeScript Style Guide",
            "ESLint TypeScript Rules",
            "Google TypeScript Style Guide",
        ],
    ),
    (
        "go",
        &[
            "Effective Go",
            "Go Code Review Comments",
            "Uber Go Style Guide",
        ],
    ),
    (
        "rust",
        &["Rust API Guidelines", "rustfmt defaults", "Clippy lints"],
    ),
    (
        "cpp",
        &[
            "Google C++ Style Guide",
            "C++ Core Guidelines",
            "MISRA C++",
        ],
    ),
    (
        "c",
        &[
            "MISRA C",
            "C99/C11 Standard",
            "SEI CERT C Coding Standard",
        ],
    ),
    (
        "php",
        &[
            "PSR-12 (Extended Coding Style)",
            "PSR-1 (Basic Coding Standard)",
            "PSR-5 (PHPDoc)",
        ],
    ),
    (
        "ruby",
        &[
            "Ruby Style Guide",
            "RuboCop defaults",
            "Community Ruby Style Guide",
        ],
    ),
];

/// Guideline names registered for `language`, or the generic fallback.
pub fn guidelines_for(language: &str) -> &'static [&'static str] {
    GUIDELINE_TABLE
        .iter()
        .find(|(lang, _)| *lang == language)
        .map(|(_, list)| *list)
        .unwrap_or(&[GENERIC_GUIDELINE])
}

/// All language keys with a registered guideline list.
pub fn supported_languages() -> impl Iterator<Item = &'static str> {
    GUIDELINE_TABLE.iter().map(|(lang, _)| *lang)
}
