//! Per-book reading session.

use super::FilterRepository;
use crate::engine::CompiledFilter;
use crate::models::FilterSpec;

/// One reader's session with one book.
///
/// The filter specification is fetched once when the session opens and
/// held immutable for the session's lifetime; every fragment redaction
/// after that is synchronous and lock-free. Patterns are compiled once
/// here rather than per fragment.
pub struct ReadingSession {
    spec: Option<FilterSpec>,
    compiled: Option<CompiledFilter>,
}

impl ReadingSession {
    /// Opens a session, resolving the book's filter specification.
    ///
    /// Infallible: resolution degrades to the default filter on any
    /// store problem (see [`FilterRepository::filter_for_book`]).
    pub async fn open(
        repository: &FilterRepository,
        title: &str,
        author: &str,
        user_id: &str,
    ) -> Self {
        let spec = repository.filter_for_book(title, author, user_id).await;
        Self::with_spec(spec)
    }

    /// Creates a session over an already-resolved specification.
    #[must_use]
    pub fn with_spec(spec: FilterSpec) -> Self {
        Self {
            compiled: Some(CompiledFilter::new(&spec)),
            spec: Some(spec),
        }
    }

    /// Creates a session with no filter at all.
    ///
    /// Models the cancelled-fetch path: if the reader navigates away
    /// before the specification resolves, the result is discarded and
    /// fragments pass through unchanged.
    #[must_use]
    pub const fn without_filter() -> Self {
        Self {
            spec: None,
            compiled: None,
        }
    }

    /// Returns the session's specification, if one was resolved.
    #[must_use]
    pub const fn spec(&self) -> Option<&FilterSpec> {
        self.spec.as_ref()
    }

    /// Redacts one content fragment.
    ///
    /// Synchronous; called once per fragment by the render bridge. With
    /// no specification the fragment is returned unchanged.
    #[must_use]
    pub fn redact(&self, body: &str) -> String {
        match &self.compiled {
            Some(filter) => filter.apply(body),
            None => body.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::store::{FilterStore, MemoryStore};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_open_fetches_once_and_redacts_many() {
        let store = Arc::new(MemoryStore::new());
        let book = store.add_book("u-1", "Dune", "Frank Herbert");
        store.put_document(
            &book.id,
            json!({"words": ["melange"], "phrases": [], "sections": []}),
        );

        let repository = FilterRepository::new(Arc::clone(&store) as Arc<dyn FilterStore>);
        let session = ReadingSession::open(&repository, "Dune", "Frank Herbert", "u-1").await;

        assert_eq!(session.redact("the melange trade"), "the *** trade");
        assert_eq!(session.redact("pure melange"), "pure ***");
        assert!(session.spec().is_some());
    }

    #[test]
    fn test_without_filter_passes_through() {
        let session = ReadingSession::without_filter();
        let body = "completely untouched, even d\u{2019}accord";
        assert_eq!(session.redact(body), body);
        assert!(session.spec().is_none());
    }

    #[test]
    fn test_with_spec_applies_default_words() {
        let session = ReadingSession::with_spec(crate::defaults::default_filter().clone());
        assert_eq!(session.redact("what the hell"), "what the ***");
    }
}
