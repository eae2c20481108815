//! # Error Types
//!
//! Errors surfaced by the document store collaborator.

use thiserror::Error;

/// Errors from the user document store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No document matched the lookup.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// A document with this reference already exists.
    #[error("Duplicate document: {0}")]
    Duplicate(String),

    /// The backing store failed.
    #[error("Store backend error: {0}")]
    Backend(String),
}
