//! Per-specification compiled filter.
//!
//! Escaping and compiling every term on each fragment would repeat work
//! in the render loop, so a specification is compiled once per reading
//! session and reused for every fragment. Observable behavior is
//! identical to compiling per call.

use crate::models::{FilterSpec, Replacement, Section};
use crate::normalize::normalize;
use regex::{NoExpand, Regex};
use std::borrow::Cow;
use tracing::warn;

/// Fixed mask substituted for every matched word.
const WORD_MASK: &str = "***";

/// A section rule: span pattern plus the text that replaces the span.
struct SpanRule {
    pattern: Regex,
    replacement: String,
}

/// A phrase rule: substring pattern plus its length-proportional mask.
struct MaskRule {
    pattern: Regex,
    mask: String,
}

/// A replacement rule: whole-word pattern plus literal substitute.
struct SwapRule {
    pattern: Regex,
    replacement: String,
}

/// A filter specification with all patterns escaped and compiled.
///
/// Construction never fails: empty terms are dropped, and a term whose
/// pattern cannot compile is skipped with a logged warning. The filter
/// pass itself is total and must never fail the render path.
pub struct CompiledFilter {
    sections: Vec<SpanRule>,
    phrases: Vec<MaskRule>,
    words: Vec<Regex>,
    replacements: Vec<SwapRule>,
}

impl CompiledFilter {
    /// Compiles a specification into reusable pass rules.
    #[must_use]
    pub fn new(spec: &FilterSpec) -> Self {
        Self {
            sections: spec.sections.iter().filter_map(compile_section).collect(),
            phrases: spec
                .phrases
                .iter()
                .filter_map(|phrase| compile_phrase(phrase))
                .collect(),
            words: spec
                .words
                .iter()
                .filter_map(|word| compile_bounded(word))
                .collect(),
            replacements: spec
                .replacements
                .iter()
                .filter_map(compile_replacement)
                .collect(),
        }
    }

    /// Returns true if no rule survived compilation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
            && self.phrases.is_empty()
            && self.words.is_empty()
            && self.replacements.is_empty()
    }

    /// Runs the four redaction passes over a content fragment.
    ///
    /// The content is normalized once, then each pass operates on the
    /// output of the previous one. Matches within a pass are replaced
    /// left-to-right, non-overlapping.
    #[must_use]
    pub fn apply(&self, content: &str) -> String {
        let mut filtered = normalize(content);

        for rule in &self.sections {
            replace_in_place(&mut filtered, &rule.pattern, &rule.replacement);
        }
        for rule in &self.phrases {
            replace_in_place(&mut filtered, &rule.pattern, &rule.mask);
        }
        for pattern in &self.words {
            replace_in_place(&mut filtered, pattern, WORD_MASK);
        }
        for rule in &self.replacements {
            replace_in_place(&mut filtered, &rule.pattern, &rule.replacement);
        }

        filtered
    }
}

/// Replaces all matches, leaving `content` untouched when nothing matched.
///
/// `NoExpand` keeps replacement text literal: a `$` in a mask or a
/// configured replacement is content, not a capture reference.
fn replace_in_place(content: &mut String, pattern: &Regex, replacement: &str) {
    let replaced = pattern.replace_all(content.as_str(), NoExpand(replacement));
    if let Cow::Owned(next) = replaced {
        *content = next;
    }
}

/// Builds the span pattern for one section entry.
///
/// Non-greedy, case-insensitive, dot-matches-newline: the shortest span
/// from `start` to the next `end`, crossing arbitrary markup. Delimiters
/// are substring-matched, not word-bounded.
fn compile_section(section: &Section) -> Option<SpanRule> {
    let start = normalize(&section.start);
    let end = normalize(&section.end);
    if start.is_empty() || end.is_empty() {
        return None;
    }
    let pattern = compile(&format!(
        "(?is){}.*?{}",
        regex::escape(&start),
        regex::escape(&end)
    ))?;
    Some(SpanRule {
        pattern,
        replacement: section.replacement.clone().unwrap_or_default(),
    })
}

fn compile_phrase(phrase: &str) -> Option<MaskRule> {
    let normalized = normalize(phrase);
    if normalized.is_empty() {
        return None;
    }
    let pattern = compile(&format!("(?i){}", regex::escape(&normalized)))?;
    Some(MaskRule {
        pattern,
        mask: "*".repeat(phrase.chars().count()),
    })
}

/// Whole-word pattern shared by the word and replacement passes.
fn compile_bounded(term: &str) -> Option<Regex> {
    let normalized = normalize(term);
    if normalized.is_empty() {
        return None;
    }
    compile(&format!(r"(?i)\b{}\b", regex::escape(&normalized)))
}

fn compile_replacement(swap: &Replacement) -> Option<SwapRule> {
    let pattern = compile_bounded(&swap.original)?;
    Some(SwapRule {
        pattern,
        replacement: swap.replacement.clone(),
    })
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            // Terms are reader/AI-supplied; log the failure, not the term.
            warn!(error = %err, "skipping filter term whose pattern failed to compile");
            None
        },
    }
}
