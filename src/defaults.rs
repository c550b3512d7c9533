//! Built-in default filter.
//!
//! The baseline profanity list applied to every book. Custom per-book
//! specifications are merged on top of this; it is never replaced.

use crate::models::FilterSpec;
use std::sync::LazyLock;

/// Curated baseline word list. Whole-word matched, case-insensitive.
const DEFAULT_WORDS: &[&str] = &[
    "damn",
    "damned",
    "damning",
    "hell",
    "fuck",
    "fucking",
    "fucked",
    "fucks",
    "shit",
    "shitting",
    "shitted",
    "shits",
    "ass",
    "asses",
    "asshole",
    "bitch",
    "penis",
    "pussy",
    "vagina",
    "clit",
    "motherfuck",
    "motherfucker",
    "motherfucking",
    "motherfuckers",
];

static DEFAULT_FILTER: LazyLock<FilterSpec> = LazyLock::new(|| FilterSpec {
    words: DEFAULT_WORDS.iter().map(|word| (*word).to_string()).collect(),
    ..FilterSpec::default()
});

/// Returns the process-wide default filter specification.
///
/// Initialized once on first use and never mutated. Callers needing an
/// owned copy (e.g. to merge with a custom specification) clone it.
#[must_use]
pub fn default_filter() -> &'static FilterSpec {
    &DEFAULT_FILTER
}
