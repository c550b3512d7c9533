//! `SQLite` filter store.

use super::FilterStore;
use crate::models::{BookId, BookRecord};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// `SQLite`-backed filter store.
///
/// # Concurrency Model
///
/// Uses a `Mutex<Connection>` because `rusqlite::Connection` is not
/// `Sync`. WAL mode and a `busy_timeout` pragma mitigate contention;
/// store traffic is one fetch per reading session plus rare document
/// creations, so a single connection is plenty.
///
/// # Schema
///
/// - `books(id, user_id, title, author, created_at)` with a unique index
///   on the `(user_id, title, author)` identity
/// - `filters(id, book_id, content, created_at)` where `content` is the
///   filter document as JSON text
pub struct SqliteStore {
    conn: Mutex<Connection>,
    /// Path to the database (None for in-memory).
    db_path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens (creating if needed) a filter store at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        let conn =
            Connection::open(&db_path).map_err(|e| Error::operation("open_sqlite", e))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Creates an in-memory filter store (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::operation("open_sqlite_in_memory", e))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: None,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub const fn db_path(&self) -> Option<&PathBuf> {
        self.db_path.as_ref()
    }

    /// Adds a book record, generating a fresh ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including on a duplicate
    /// `(user_id, title, author)` identity).
    pub fn add_book(
        &self,
        user_id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Result<BookRecord> {
        let record = BookRecord::new(Uuid::new_v4().to_string(), user_id, title, author);
        let conn = self.acquire();
        conn.execute(
            "INSERT INTO books (id, user_id, title, author, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id.as_str(),
                record.user_id,
                record.title,
                record.author,
                Utc::now().timestamp(),
            ],
        )
        .map_err(|e| Error::operation("add_book", e))?;
        Ok(record)
    }

    fn initialize(&self) -> Result<()> {
        let conn = self.acquire();

        // WAL for concurrent readers; journal_mode returns a row, so the
        // result is ignored rather than executed as a batch statement.
        let _ = conn.pragma_update(None, "journal_mode", "WAL");
        let _ = conn.pragma_update(None, "synchronous", "NORMAL");
        let _ = conn.pragma_update(None, "busy_timeout", "5000");

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS books (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_books_identity
                ON books (user_id, title, author);
            CREATE TABLE IF NOT EXISTS filters (
                id TEXT PRIMARY KEY,
                book_id TEXT NOT NULL REFERENCES books (id),
                content TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_filters_book ON filters (book_id);",
        )
        .map_err(|e| Error::operation("initialize_schema", e))
    }

    /// Acquires the connection mutex with poison recovery.
    fn acquire(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("SQLite mutex was poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }
}

#[async_trait]
impl FilterStore for SqliteStore {
    async fn find_book(
        &self,
        title: &str,
        author: &str,
        user_id: &str,
    ) -> Result<Option<BookRecord>> {
        let conn = self.acquire();
        conn.query_row(
            "SELECT id, user_id, title, author FROM books
             WHERE user_id = ?1 AND title = ?2 AND author = ?3
             LIMIT 1",
            params![user_id, title, author],
            |row| {
                Ok(BookRecord {
                    id: BookId::new(row.get::<_, String>(0)?),
                    user_id: row.get(1)?,
                    title: row.get(2)?,
                    author: row.get(3)?,
                })
            },
        )
        .optional()
        .map_err(|e| Error::operation("find_book", e))
    }

    async fn fetch_document(&self, book_id: &BookId) -> Result<Option<Value>> {
        let conn = self.acquire();
        let content: Option<String> = conn
            .query_row(
                "SELECT content FROM filters WHERE book_id = ?1 LIMIT 1",
                params![book_id.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| Error::operation("fetch_document", e))?;

        content
            .map(|text| {
                serde_json::from_str(&text).map_err(|e| Error::operation("parse_document", e))
            })
            .transpose()
    }

    async fn create_document(&self, book_id: &BookId, document: &Value) -> Result<()> {
        let content = document.to_string();
        let conn = self.acquire();
        conn.execute(
            "INSERT INTO filters (id, book_id, content, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                Uuid::new_v4().to_string(),
                book_id.as_str(),
                content,
                Utc::now().timestamp(),
            ],
        )
        .map_err(|e| Error::operation("create_document", e))?;
        Ok(())
    }
}
