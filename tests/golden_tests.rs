//! Golden fragment tests for the redaction engine.
//!
//! Each case pins the exact redacted output for a realistic chapter
//! fragment, so a change in pass order, masking, or normalization shows
//! up as a concrete diff rather than a property violation.

// Golden tests use expect/unwrap/panic for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use purli_filter::{FilterSpec, Replacement, Section, apply_filters};

struct GoldenCase {
    name: &'static str,
    spec: FilterSpec,
    input: &'static str,
    expected: &'static str,
}

fn word_spec(words: &[&str]) -> FilterSpec {
    FilterSpec {
        words: words.iter().map(|w| (*w).to_string()).collect(),
        ..FilterSpec::default()
    }
}

fn golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            name: "single word in paragraph",
            spec: word_spec(&["damn"]),
            input: "<p>Well, damn, said the captain.</p>",
            expected: "<p>Well, ***, said the captain.</p>",
        },
        GoldenCase {
            name: "word at fragment boundaries",
            spec: word_spec(&["hell"]),
            input: "hell is other people's hell",
            expected: "*** is other people's ***",
        },
        GoldenCase {
            name: "mixed case and punctuation",
            spec: word_spec(&["damn", "hell"]),
            input: "<p>DAMN it all to Hell!</p>",
            expected: "<p>*** it all to ***!</p>",
        },
        GoldenCase {
            name: "typographic apostrophes in content",
            spec: FilterSpec {
                phrases: vec!["don't go".to_string()],
                ..FilterSpec::default()
            },
            input: "<em>Don\u{2019}t go</em>, she whispered.",
            expected: "<em>********</em>, she whispered.",
        },
        GoldenCase {
            name: "section collapsed across paragraphs",
            spec: FilterSpec {
                sections: vec![Section::new("He pulled her close", "the next morning.", None)],
                ..FilterSpec::default()
            },
            input: "<p>Dinner ended.</p><p>He pulled her close and\u{2026}</p>\n<p>It was the next morning.</p><p>Breakfast.</p>",
            expected: "<p>Dinner ended.</p><p></p><p>Breakfast.</p>",
        },
        GoldenCase {
            name: "section replaced with summary text",
            spec: FilterSpec {
                sections: vec![Section::new(
                    "The fight began",
                    "it was finally over.",
                    Some("The fight happened.".to_string()),
                )],
                ..FilterSpec::default()
            },
            input: "<p>The fight began with a roar; blood everywhere; it was finally over.</p>",
            expected: "<p>The fight happened.</p>",
        },
        GoldenCase {
            name: "replacement swaps euphemism",
            spec: FilterSpec {
                replacements: vec![Replacement::new("damn", "darn")],
                ..FilterSpec::default()
            },
            input: "Damn right, damn wrong.",
            expected: "darn right, darn wrong.",
        },
        GoldenCase {
            name: "all four passes in order",
            spec: FilterSpec {
                words: vec!["blood".to_string()],
                phrases: vec!["with a roar".to_string()],
                sections: vec![Section::new("SCENE:", ":END", None)],
                replacements: vec![Replacement::new("fight", "disagreement")],
            },
            input: "The fight started with a roar. SCENE: blood :END Then blood dried.",
            expected: "The disagreement started ***********.  Then *** dried.",
        },
    ]
}

#[test]
fn test_golden_fragments() {
    for case in golden_cases() {
        let actual = apply_filters(case.input, Some(&case.spec));
        assert_eq!(
            actual, case.expected,
            "golden case '{}' diverged",
            case.name
        );
    }
}

#[test]
fn test_golden_fragments_are_stable_under_reapplication() {
    // Masked output re-filtered with the same spec must not change:
    // replacements targets are gone and masks contain no letters.
    for case in golden_cases() {
        // The euphemism cases are legitimately not fixed points ("darn"
        // stays "darn", but a second pass still matches nothing).
        let once = apply_filters(case.input, Some(&case.spec));
        let twice = apply_filters(&once, Some(&case.spec));
        assert_eq!(once, twice, "golden case '{}' not stable", case.name);
    }
}
