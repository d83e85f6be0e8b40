//! URL handling module for Sumi-Scribe
//!
//! This module provides URL normalization, slug derivation for output file names,
//! and the scope rule that decides which discovered links belong to the crawl.

mod normalize;
mod scope;
mod slug;

use crate::UrlError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use url::Url;

// Re-export main functions
pub use normalize::normalize;
pub use scope::Scope;
pub use slug::{reconstruct_url, slug, slug_from_path, Slug};

/// A canonical, comparable key for a crawled page
///
/// The key is the URL string with its fragment removed and one trailing `/`
/// stripped. Equality and hashing use the key only, so two raw links that differ
/// by a trailing slash or a fragment are the same page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NormalizedUrl {
    key: String,
    url: Url,
}

impl NormalizedUrl {
    pub(crate) fn new(key: String, url: Url) -> Self {
        Self { key, url }
    }

    /// Returns the normalized key
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Returns the parsed form of the URL
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// Returns the URL path (always starts with `/`)
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

impl PartialEq for NormalizedUrl {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for NormalizedUrl {}

impl Hash for NormalizedUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl TryFrom<String> for NormalizedUrl {
    type Error = UrlError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        normalize(&raw)
    }
}

impl From<NormalizedUrl> for String {
    fn from(url: NormalizedUrl) -> Self {
        url.key
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
