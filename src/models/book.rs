//! Book identity types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a book record in the filter store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    /// Creates a new book ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A book owned by one reader.
///
/// Filter specifications are resolved by exact `(title, author, user_id)`
/// match, so two readers uploading the same book get independent filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Unique identifier.
    pub id: BookId,
    /// Owning reader's identity (supplied by the auth collaborator).
    pub user_id: String,
    /// Book title, exactly as stored at upload time.
    pub title: String,
    /// Book author, exactly as stored at upload time.
    pub author: String,
}

impl BookRecord {
    /// Creates a new book record.
    #[must_use]
    pub fn new(
        id: impl Into<BookId>,
        user_id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            title: title.into(),
            author: author.into(),
        }
    }
}
