//! Filter specification resolution.

use crate::defaults::default_filter;
use crate::models::{BookId, FilterSpec};
use crate::store::FilterStore;
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves filter specifications for books.
///
/// Resolution is fail-open towards safety: whatever goes wrong (no book
/// record, no filter document, invalid document shape, store failure),
/// the caller receives the baseline default filter so *some* filtering
/// is always active. Errors are logged, never surfaced to the reading
/// UI.
pub struct FilterRepository {
    store: Arc<dyn FilterStore>,
    defaults: FilterSpec,
}

impl FilterRepository {
    /// Creates a repository over a store, using the built-in default
    /// filter as the baseline.
    #[must_use]
    pub fn new(store: Arc<dyn FilterStore>) -> Self {
        Self::with_defaults(store, default_filter().clone())
    }

    /// Creates a repository with an explicit baseline specification.
    #[must_use]
    pub fn with_defaults(store: Arc<dyn FilterStore>, defaults: FilterSpec) -> Self {
        Self { store, defaults }
    }

    /// Returns the baseline specification.
    #[must_use]
    pub const fn defaults(&self) -> &FilterSpec {
        &self.defaults
    }

    /// Resolves the filter specification for a book.
    ///
    /// Never fails: every error path degrades to the baseline default.
    /// When a book exists without a filter document, an empty document is
    /// created in the background (fire-and-forget) so the filter service
    /// has a row to fill in later; the current call still returns the
    /// default.
    pub async fn filter_for_book(&self, title: &str, author: &str, user_id: &str) -> FilterSpec {
        match self.resolve(title, author, user_id).await {
            Ok(spec) => spec,
            Err(err) => {
                warn!(title, author, error = %err, "filter lookup failed; using default filter");
                self.defaults.clone()
            },
        }
    }

    async fn resolve(&self, title: &str, author: &str, user_id: &str) -> Result<FilterSpec> {
        let Some(book) = self.store.find_book(title, author, user_id).await? else {
            debug!(title, author, "no book record; using default filter");
            return Ok(self.defaults.clone());
        };

        let Some(document) = self.store.fetch_document(&book.id).await? else {
            debug!(book_id = %book.id, "no filter document; creating an empty one");
            self.spawn_create_empty(book.id.clone());
            return Ok(self.defaults.clone());
        };

        match FilterSpec::from_document(&document) {
            Ok(custom) => Ok(FilterSpec::merge(&self.defaults, &custom)),
            Err(err @ Error::InvalidFilterDocument(_)) => {
                warn!(book_id = %book.id, error = %err, "invalid filter document; using default filter");
                Ok(self.defaults.clone())
            },
            Err(err) => Err(err),
        }
    }

    /// Spawns the empty-document creation off the read path.
    ///
    /// The task is detached: its failure is logged, never propagated, and
    /// the caller does not wait for it.
    fn spawn_create_empty(&self, book_id: BookId) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            let document = FilterSpec::empty_document();
            if let Err(err) = store.create_document(&book_id, &document).await {
                warn!(book_id = %book_id, error = %err, "failed to create empty filter document");
            }
        });
    }
}
