//! Redaction engine.
//!
//! Applies a filter specification to one HTML fragment. Four passes run
//! in fixed order, each on the output of the previous one:
//!
//! 1. **Sections** - shortest span from `start` to `end`, case-insensitive,
//!    crossing any intervening markup; replaced wholesale or collapsed.
//! 2. **Phrases** - literal substring matches, masked with a `*` run of
//!    the phrase's character length.
//! 3. **Words** - whole-word matches, masked with `***`.
//! 4. **Replacements** - whole-word matches, substituted with literal text.
//!
//! Filter terms are always literal text, never patterns: every term is
//! regex-escaped before compilation, and replacement text is inserted
//! verbatim. Content is normalized once ([`crate::normalize`]) before the
//! first pass so typographic punctuation cannot defeat a match.

mod compiled;

pub use compiled::CompiledFilter;

use crate::models::FilterSpec;

/// Applies a filter specification to a content fragment.
///
/// With `None`, the content is returned unchanged (filtering is optional,
/// never fatal). With an empty specification, the result is the
/// normalized content. Compiles patterns on the fly; callers on the
/// per-fragment hot path should build a [`CompiledFilter`] once per
/// specification instead.
#[must_use]
pub fn apply_filters(content: &str, spec: Option<&FilterSpec>) -> String {
    match spec {
        Some(spec) => CompiledFilter::new(spec).apply(content),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::models::{Replacement, Section};
    use crate::normalize::normalize;
    use test_case::test_case;

    fn words(entries: &[&str]) -> FilterSpec {
        FilterSpec {
            words: entries.iter().map(|w| (*w).to_string()).collect(),
            ..FilterSpec::default()
        }
    }

    fn phrases(entries: &[&str]) -> FilterSpec {
        FilterSpec {
            phrases: entries.iter().map(|p| (*p).to_string()).collect(),
            ..FilterSpec::default()
        }
    }

    fn sections(entries: Vec<Section>) -> FilterSpec {
        FilterSpec {
            sections: entries,
            ..FilterSpec::default()
        }
    }

    #[test]
    fn test_no_spec_is_identity() {
        // Not even normalized: the curly quote survives untouched.
        let content = "Don\u{2019}t touch this.";
        assert_eq!(apply_filters(content, None), content);
    }

    #[test]
    fn test_empty_spec_equals_normalize() {
        let content = "\u{201C}Don\u{2019}t,\u{201D} she said.";
        let spec = FilterSpec::empty();
        assert_eq!(apply_filters(content, Some(&spec)), normalize(content));
    }

    #[test_case("Damn it", "*** it" ; "capitalized")]
    #[test_case("damn it", "*** it" ; "lowercase")]
    #[test_case("DAMN it", "*** it" ; "uppercase")]
    fn test_word_masking_is_case_insensitive(content: &str, expected: &str) {
        let spec = words(&["damn"]);
        assert_eq!(apply_filters(content, Some(&spec)), expected);
    }

    #[test]
    fn test_word_mask_is_fixed_length() {
        let spec = words(&["motherfucker"]);
        assert_eq!(apply_filters("you motherfucker!", Some(&spec)), "you ***!");
    }

    #[test]
    fn test_whole_word_boundary_respected() {
        let spec = words(&["ass"]);
        assert_eq!(apply_filters("a classic tale", Some(&spec)), "a classic tale");
        assert_eq!(apply_filters("kicked his ass.", Some(&spec)), "kicked his ***.");
    }

    #[test]
    fn test_phrase_mask_is_proportional() {
        let spec = phrases(&["bad stuff"]);
        assert_eq!(
            apply_filters("some bad stuff here", Some(&spec)),
            "some ********* here"
        );
    }

    #[test]
    fn test_phrase_matches_inside_words() {
        // Phrases are substring targets, not word-bounded.
        let spec = phrases(&["lass"]);
        assert_eq!(apply_filters("classic", Some(&spec)), "c****ic");
    }

    #[test]
    fn test_section_redaction_spans_markup() {
        let content = "<p>keep</p><p>START bad stuff</p><p>END</p><p>keep</p>";
        let spec = sections(vec![Section::new("START", "END", None)]);
        assert_eq!(
            apply_filters(content, Some(&spec)),
            "<p>keep</p><p></p><p>keep</p>"
        );
    }

    #[test]
    fn test_section_replacement_text_substituted() {
        let content = "before START very explicit END after";
        let spec = sections(vec![Section::new(
            "START",
            "END",
            Some("[scene omitted]".to_string()),
        )]);
        assert_eq!(
            apply_filters(content, Some(&spec)),
            "before [scene omitted] after"
        );
    }

    #[test]
    fn test_section_span_is_non_greedy() {
        let content = "A END x A END y";
        let spec = sections(vec![Section::new("A", "END", None)]);
        // Each span ends at the NEXT end delimiter, so both collapse.
        assert_eq!(apply_filters(content, Some(&spec)), " x  y");
    }

    #[test]
    fn test_section_without_end_has_no_effect() {
        let content = "START but the closing marker never shows up";
        let spec = sections(vec![Section::new("START", "FINIS", None)]);
        assert_eq!(apply_filters(content, Some(&spec)), content);
    }

    #[test]
    fn test_section_crosses_newlines() {
        let content = "keep\nSTART\nbad\nlines\nEND\nkeep";
        let spec = sections(vec![Section::new("START", "END", None)]);
        assert_eq!(apply_filters(content, Some(&spec)), "keep\n\nkeep");
    }

    #[test]
    fn test_replacement_swaps_literal_text() {
        let spec = FilterSpec {
            replacements: vec![Replacement::new("damn", "darn")],
            ..FilterSpec::default()
        };
        assert_eq!(apply_filters("Damn that cat", Some(&spec)), "darn that cat");
    }

    #[test]
    fn test_replacement_is_word_bounded() {
        let spec = FilterSpec {
            replacements: vec![Replacement::new("hell", "heck")],
            ..FilterSpec::default()
        };
        assert_eq!(apply_filters("hello hell", Some(&spec)), "hello heck");
    }

    #[test]
    fn test_sections_run_before_word_masking() {
        // The word pass sees the section's output: "damn" inside the span
        // is already gone, leaving nothing to mask.
        let content = "keep START damn END keep";
        let spec = FilterSpec {
            words: vec!["damn".to_string()],
            sections: vec![Section::new("START", "END", None)],
            ..FilterSpec::default()
        };
        assert_eq!(apply_filters(content, Some(&spec)), "keep  keep");
    }

    #[test]
    fn test_curly_apostrophe_content_matches_straight_term() {
        let spec = phrases(&["don't"]);
        assert_eq!(apply_filters("I don\u{2019}t care", Some(&spec)), "I ***** care");
    }

    #[test]
    fn test_curly_quotes_in_term_match_straight_content() {
        let spec = phrases(&["don\u{2019}t"]);
        assert_eq!(apply_filters("I don't care", Some(&spec)), "I ***** care");
    }

    #[test]
    fn test_regex_special_characters_matched_literally() {
        let spec = phrases(&["$5 (cheap)"]);
        assert_eq!(apply_filters("only $5 (cheap) today", Some(&spec)), "only ********** today");
        // A dot in a term must not act as a wildcard.
        let spec = phrases(&["a.b"]);
        assert_eq!(apply_filters("axb a.b", Some(&spec)), "axb ***");
    }

    #[test]
    fn test_replacement_text_is_not_expanded() {
        // "$1" in replacement text is literal, never a capture reference.
        let spec = sections(vec![Section::new(
            "START",
            "END",
            Some("$1 left intact".to_string()),
        )]);
        assert_eq!(
            apply_filters("START x END", Some(&spec)),
            "$1 left intact"
        );
    }

    #[test]
    fn test_empty_terms_are_skipped() {
        let spec = FilterSpec {
            words: vec![String::new()],
            phrases: vec![String::new()],
            sections: vec![Section::new("", "", None)],
            ..FilterSpec::default()
        };
        assert_eq!(apply_filters("left alone", Some(&spec)), "left alone");
    }

    #[test]
    fn test_masking_is_idempotent() {
        let spec = FilterSpec {
            words: vec!["damn".to_string()],
            phrases: vec!["bad stuff".to_string()],
            ..FilterSpec::default()
        };
        let once = apply_filters("damn, such bad stuff", Some(&spec));
        let twice = apply_filters(&once, Some(&spec));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_default_filter_spot_check() {
        let spec = crate::defaults::default_filter();
        let filtered = apply_filters("What the hell, don't say fuck.", Some(spec));
        assert_eq!(filtered, "What the ***, don't say ***.");
    }
}
