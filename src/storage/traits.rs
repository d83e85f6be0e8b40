//! Storage traits and error types
//!
//! This module defines the trait interface for persistence backends and
//! associated error types.

use crate::storage::{FailureList, FailureRecord, IndexEntry};
use crate::url::{NormalizedUrl, Scope, Slug};
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed index line {line}: {message}")]
    MalformedIndex { line: usize, message: String },

    #[error("Failed to encode index entry: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for persistence backend implementations
///
/// A store owns the output documents, the URL index and the failure lists of
/// one output directory.
pub trait DocumentStore: Send {
    // ===== Documents =====

    /// Returns true if a document for this slug already exists
    fn exists(&self, slug: &Slug) -> bool;

    /// Writes a sanitized document and records it in the URL index
    ///
    /// Rewriting a URL replaces its index entry.
    ///
    /// # Arguments
    ///
    /// * `url` - The normalized URL the document was rendered from
    /// * `slug` - The output slug for that URL
    /// * `text` - The sanitized document text
    fn write_document(&mut self, url: &NormalizedUrl, slug: &Slug, text: &str)
        -> StorageResult<()>;

    // ===== URL Index =====

    /// Loads every entry of the URL index (empty if there is none)
    fn load_index(&self) -> StorageResult<Vec<IndexEntry>>;

    /// Returns the URLs that earlier runs already wrote documents for
    ///
    /// Uses the URL index when present. Otherwise the URLs are rebuilt from the
    /// document file names, which is lossy for hyphenated path segments.
    fn scraped_urls(&self, scope: &Scope) -> StorageResult<HashSet<NormalizedUrl>>;

    // ===== Failure Lists =====

    /// Reads the URLs of a failure list (empty if the list does not exist)
    fn read_failures(&self, list: FailureList) -> StorageResult<Vec<String>>;

    /// Replaces a failure list with the given records
    fn write_failures(&mut self, list: FailureList, failures: &[FailureRecord])
        -> StorageResult<()>;

    /// Removes a failure list
    fn clear_failures(&mut self, list: FailureList) -> StorageResult<()>;
}
