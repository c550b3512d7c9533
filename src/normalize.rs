//! Text normalization for stable pattern matching.
//!
//! Book text frequently uses typographic punctuation (“don’t”) that
//! would defeat literal matching against filter terms authored with
//! straight quotes. Both content and terms are run through the same
//! normalization so matches are stable across encodings.

use unicode_normalization::UnicodeNormalization;

/// Canonicalizes typographic quote variants to ASCII, then applies
/// Unicode NFKC normalization.
///
/// Pure and total: never fails, including on the empty string.
#[must_use]
pub fn normalize(text: &str) -> String {
    let folded = text.chars().map(|c| match c {
        // Single-quote variants: left/right curly, reversed, prime
        '\u{2018}' | '\u{2019}' | '\u{201B}' | '\u{2032}' => '\'',
        // Double-quote variants: left/right curly, reversed, double prime
        '\u{201C}' | '\u{201D}' | '\u{201F}' | '\u{2033}' => '"',
        other => other,
    });
    folded.nfkc().collect()
}
