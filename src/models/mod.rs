//! Data models for the filter engine.
//!
//! This module contains the filter specification contract and the book
//! identity types used to resolve specifications from a store.

mod book;
mod filter;

pub use book::{BookId, BookRecord};
pub use filter::{FilterSpec, Replacement, Section};
