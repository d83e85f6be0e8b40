//! Storage module for persisting crawl output
//!
//! This module handles everything written to the output directory:
//! - One sanitized Markdown document per page (`<slug>.md`)
//! - The URL index mapping each written URL to its slug (JSON Lines)
//! - The failure lists used to re-seed a `--retry-failed` run

mod fs;
mod traits;

pub use fs::FsStore;
pub use traits::{DocumentStore, StorageError, StorageResult};

use crate::url::{NormalizedUrl, Slug};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File name of the URL index inside the output directory
pub const INDEX_FILE: &str = ".scribe-index.jsonl";

/// A URL whose every attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub url: NormalizedUrl,
    pub last_error: String,
}

/// One line of the URL index, stored as a JSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub url: NormalizedUrl,
    pub slug: Slug,
    pub scraped_at: DateTime<Utc>,
}

/// The failure list written by each traversal strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureList {
    /// Written by link-following
    Links,
    /// Written by click-navigation
    Clicks,
}

impl FailureList {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Links => "failed_urls.txt",
            Self::Clicks => "failed_clicks.txt",
        }
    }
}
