//! # Purli Filter
//!
//! Render-time content filtering engine for the Purli e-reader.
//!
//! Readers upload their own EPUB files and view them with objectionable
//! content (profanity, explicit scenes) suppressed as each chapter is
//! rendered. This crate is the filtering core: it resolves a filter
//! specification for a book, then rewrites every rendered HTML fragment
//! before it reaches the display surface.
//!
//! ## Features
//!
//! - Four ordered redaction passes: delimited sections, phrases, words,
//!   literal replacements
//! - Unicode-stable matching (typographic quote folding + NFKC)
//! - Always-on baseline profanity filter, merged with per-book custom
//!   filters
//! - Pluggable filter stores (in-memory, `SQLite`, PostgREST)
//! - Fail-open resolution: any store failure degrades to the baseline
//!   filter, never to an error in the reading UI
//!
//! ## Example
//!
//! ```rust,ignore
//! use purli_filter::{FilterRepository, ReadingSession, RenderBridge};
//!
//! let repository = FilterRepository::new(store);
//! let session = ReadingSession::open(&repository, "Dune", "Frank Herbert", user_id).await;
//! let bridge = RenderBridge::new(session.into());
//!
//! // Called by the EPUB renderer for every chapter fragment:
//! let clean_html = bridge.on_content(&chapter_html);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod defaults;
pub mod engine;
pub mod models;
pub mod normalize;
pub mod render;
pub mod services;
pub mod store;

// Re-exports for convenience
pub use config::{PurliConfig, StoreConfig};
pub use defaults::default_filter;
pub use engine::{CompiledFilter, apply_filters};
pub use models::{BookId, BookRecord, FilterSpec, Replacement, Section};
pub use normalize::normalize;
pub use render::{ContentFragment, ContentHook, RenderBridge};
pub use services::{FilterRepository, ReadingSession};
pub use store::{FilterStore, MemoryStore, RestStore, SqliteStore};

/// Error type for filter operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// Errors never reach the reading UI: the repository catches every variant
/// and degrades to the built-in default filter ([`defaults::default_filter`]).
/// They surface only through logs and in store/config return values.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidFilterDocument` | A fetched filter document fails shape validation |
/// | `OperationFailed` | Store queries fail, HTTP requests fail, config cannot be read |
#[derive(Debug, ThisError)]
pub enum Error {
    /// A filter document failed shape validation.
    ///
    /// Raised when:
    /// - `words` or `phrases` is missing or not an array of strings
    /// - `sections` is missing or an entry is not a well-formed
    ///   `{start, end, replacement}` triple
    /// - `replacements` is present but an entry is not a `{original,
    ///   replacement}` string pair
    ///
    /// See [`models::FilterSpec::from_document`] for the validation rules.
    #[error("invalid filter document: {0}")]
    InvalidFilterDocument(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - `SQLite` queries fail or a stored document is not valid JSON
    /// - PostgREST requests fail or return an error status
    /// - The config file cannot be read or parsed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Builds an `OperationFailed` from an operation name and any error.
    pub(crate) fn operation(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for filter operations.
pub type Result<T> = std::result::Result<T, Error>;
