//! Filter store backends.
//!
//! The store is the externally-owned home of book records and their
//! filter documents. The repository resolves specifications against it
//! and degrades to the default filter on any failure, so backends report
//! errors honestly instead of papering over them.
//!
//! Three backends:
//! - [`MemoryStore`]: in-process, for tests and embedding
//! - [`SqliteStore`]: local `SQLite` database
//! - [`RestStore`]: PostgREST-style HTTP API (the hosted product's store)
//!
//! Documents cross this seam as raw [`serde_json::Value`]s; shape
//! validation happens in the repository, so a malformed row degrades to
//! the default specification rather than failing the store call.

mod memory;
mod rest;
mod sqlite;

pub use memory::MemoryStore;
pub use rest::{ENV_STORE_KEY, ENV_STORE_URL, RestStore};
pub use sqlite::SqliteStore;

use crate::Result;
use crate::models::{BookId, BookRecord};
use async_trait::async_trait;
use serde_json::Value;

/// Trait for filter store backends.
#[async_trait]
pub trait FilterStore: Send + Sync {
    /// Resolves a book record by exact `(title, author, user_id)` match.
    async fn find_book(
        &self,
        title: &str,
        author: &str,
        user_id: &str,
    ) -> Result<Option<BookRecord>>;

    /// Fetches the raw filter document for a book, if one exists.
    async fn fetch_document(&self, book_id: &BookId) -> Result<Option<Value>>;

    /// Creates a filter document for a book.
    async fn create_document(&self, book_id: &BookId, document: &Value) -> Result<()>;
}
