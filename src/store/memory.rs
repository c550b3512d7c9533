//! In-memory filter store.

use super::FilterStore;
use crate::models::{BookId, BookRecord};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    books: Vec<BookRecord>,
    documents: HashMap<BookId, Value>,
}

/// In-process filter store backed by a `HashMap`.
///
/// Useful for tests and for embedding the engine without an external
/// store. Thread-safe; poisoned locks are recovered since the maps stay
/// valid across a panicking reader.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a book record, generating a fresh ID.
    pub fn add_book(
        &self,
        user_id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> BookRecord {
        let record = BookRecord::new(Uuid::new_v4().to_string(), user_id, title, author);
        self.write().books.push(record.clone());
        record
    }

    /// Inserts or replaces the filter document for a book.
    pub fn put_document(&self, book_id: &BookId, document: Value) {
        self.write().documents.insert(book_id.clone(), document);
    }

    /// Returns a copy of the stored document for a book, if any.
    #[must_use]
    pub fn document(&self, book_id: &BookId) -> Option<Value> {
        self.read().documents.get(book_id).cloned()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl FilterStore for MemoryStore {
    async fn find_book(
        &self,
        title: &str,
        author: &str,
        user_id: &str,
    ) -> Result<Option<BookRecord>> {
        let inner = self.read();
        Ok(inner
            .books
            .iter()
            .find(|book| book.user_id == user_id && book.title == title && book.author == author)
            .cloned())
    }

    async fn fetch_document(&self, book_id: &BookId) -> Result<Option<Value>> {
        Ok(self.read().documents.get(book_id).cloned())
    }

    async fn create_document(&self, book_id: &BookId, document: &Value) -> Result<()> {
        let mut inner = self.write();
        if inner.documents.contains_key(book_id) {
            return Err(Error::operation(
                "create_document",
                format!("document already exists for book {book_id}"),
            ));
        }
        inner.documents.insert(book_id.clone(), document.clone());
        Ok(())
    }
}
