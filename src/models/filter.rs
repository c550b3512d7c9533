//! Filter specification types and validation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashSet;

/// A start/end-delimited span of content redacted or replaced wholesale.
///
/// Used for scene-level (not word-level) filtering: everything from the
/// first occurrence of `start` through the next occurrence of `end` is
/// removed, including the delimiters themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Text marking the beginning of the span.
    pub start: String,
    /// Text marking the end of the span.
    pub end: String,
    /// Literal text substituted for the entire matched span.
    /// `None` collapses the span to the empty string.
    #[serde(default)]
    pub replacement: Option<String>,
}

impl Section {
    /// Creates a new section entry.
    #[must_use]
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
        replacement: Option<String>,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            replacement,
        }
    }
}

/// A literal word substitution (e.g. a euphemism swap).
///
/// Unlike words and phrases, the match is not masked with `*` runs;
/// the replacement text is spliced in as genuine content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Whole word to match, case-insensitively.
    pub original: String,
    /// Literal text substituted for every match.
    pub replacement: String,
}

impl Replacement {
    /// Creates a new replacement pair.
    #[must_use]
    pub fn new(original: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            replacement: replacement.into(),
        }
    }
}

/// The contract consumed by the redaction engine.
///
/// Fetched once per book per reading session and immutable from then on;
/// the engine never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive whole-word targets, masked with `***`.
    #[serde(default)]
    pub words: Vec<String>,
    /// Case-insensitive substring targets, masked with a `*` run of the
    /// phrase's character length.
    #[serde(default)]
    pub phrases: Vec<String>,
    /// Delimiter pairs marking content spans to redact or replace.
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Literal substitution pairs, applied after all masking passes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replacements: Vec<Replacement>,
}

impl FilterSpec {
    /// Creates a specification with no filter entries.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if no pass would have any effect.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
            && self.phrases.is_empty()
            && self.sections.is_empty()
            && self.replacements.is_empty()
    }

    /// The JSON document written when a book has no filter yet.
    ///
    /// Matches the wire shape produced by the filter-generation service:
    /// the three base keys present and empty, `replacements` omitted.
    #[must_use]
    pub fn empty_document() -> Value {
        json!({
            "words": [],
            "phrases": [],
            "sections": [],
        })
    }

    /// Validates the shape of a raw filter document and constructs a
    /// typed specification from it.
    ///
    /// `words` and `phrases` must be present as string arrays and
    /// `sections` as an array of `{start, end, replacement}` triples with
    /// `replacement` string-or-null. `replacements` is optional; when
    /// present each entry must be an `{original, replacement}` string
    /// pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFilterDocument`] on any shape mismatch.
    /// The caller degrades to the default specification rather than
    /// propagating this to the reading UI.
    pub fn from_document(document: &Value) -> Result<Self> {
        let object = document
            .as_object()
            .ok_or_else(|| invalid("document is not an object"))?;

        let words = string_array(object, "words")?;
        let phrases = string_array(object, "phrases")?;
        let sections = section_array(object)?;
        let replacements = replacement_array(object)?;

        Ok(Self {
            words,
            phrases,
            sections,
            replacements,
        })
    }

    /// Merges a custom specification into a base (the built-in default).
    ///
    /// `words` and `phrases` are deduplicated preserving first-occurrence
    /// order, base entries first, so the baseline list is always active
    /// and custom entries are additive. `sections` and `replacements` are
    /// concatenated (the base has none in practice).
    #[must_use]
    pub fn merge(base: &Self, custom: &Self) -> Self {
        Self {
            words: merge_unique(&base.words, &custom.words),
            phrases: merge_unique(&base.phrases, &custom.phrases),
            sections: base
                .sections
                .iter()
                .chain(custom.sections.iter())
                .cloned()
                .collect(),
            replacements: base
                .replacements
                .iter()
                .chain(custom.replacements.iter())
                .cloned()
                .collect(),
        }
    }
}

fn invalid(reason: impl Into<String>) -> Error {
    Error::InvalidFilterDocument(reason.into())
}

/// Extracts a required array-of-strings key.
fn string_array(object: &Map<String, Value>, key: &str) -> Result<Vec<String>> {
    let entries = object
        .get(key)
        .ok_or_else(|| invalid(format!("missing key '{key}'")))?
        .as_array()
        .ok_or_else(|| invalid(format!("'{key}' is not an array")))?;

    entries
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .map(ToString::to_string)
                .ok_or_else(|| invalid(format!("'{key}' contains a non-string entry")))
        })
        .collect()
}

fn section_array(object: &Map<String, Value>) -> Result<Vec<Section>> {
    let entries = object
        .get("sections")
        .ok_or_else(|| invalid("missing key 'sections'"))?
        .as_array()
        .ok_or_else(|| invalid("'sections' is not an array"))?;

    entries
        .iter()
        .map(|entry| {
            let section = entry
                .as_object()
                .ok_or_else(|| invalid("'sections' contains a non-object entry"))?;
            let start = required_string(section, "sections", "start")?;
            let end = required_string(section, "sections", "end")?;
            // Absent and null both mean "collapse the span".
            let replacement = match section.get("replacement") {
                Some(Value::String(text)) => Some(text.clone()),
                Some(Value::Null) | None => None,
                Some(_) => {
                    return Err(invalid("section 'replacement' is neither string nor null"));
                },
            };
            Ok(Section {
                start,
                end,
                replacement,
            })
        })
        .collect()
}

fn replacement_array(object: &Map<String, Value>) -> Result<Vec<Replacement>> {
    let Some(value) = object.get("replacements") else {
        return Ok(Vec::new());
    };
    let entries = value
        .as_array()
        .ok_or_else(|| invalid("'replacements' is not an array"))?;

    entries
        .iter()
        .map(|entry| {
            let pair = entry
                .as_object()
                .ok_or_else(|| invalid("'replacements' contains a non-object entry"))?;
            Ok(Replacement {
                original: required_string(pair, "replacements", "original")?,
                replacement: required_string(pair, "replacements", "replacement")?,
            })
        })
        .collect()
}

fn required_string(object: &Map<String, Value>, context: &str, key: &str) -> Result<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| invalid(format!("{context} entry is missing string '{key}'")))
}

/// Concatenates two term lists, dropping duplicates while preserving
/// first-occurrence order.
fn merge_unique(base: &[String], custom: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    base.iter()
        .chain(custom.iter())
        .filter(|entry| seen.insert((*entry).clone()))
        .cloned()
        .collect()
}
