use crate::url::{normalize, NormalizedUrl};
use crate::UrlResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Slug used for the site root
pub const INDEX_SLUG: &str = "index";

/// Filesystem-safe output file stem derived from a URL path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Wraps an existing file stem
    pub fn new(stem: impl Into<String>) -> Self {
        Self(stem.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Output file name for this slug (`<slug>.md`)
    pub fn file_name(&self) -> String {
        format!("{}.md", self.0)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the output slug for a normalized URL
///
/// The path is split on `/`, empty segments are dropped and the rest are joined
/// with `-`. An empty path becomes `index`. The function is pure, so the same
/// URL always maps to the same file across runs. It is not invertible: a path
/// segment that itself contains `-` collides with a deeper path.
///
/// # Examples
///
/// ```
/// use sumi_scribe::url::{normalize, slug};
///
/// let url = normalize("https://example.com/docs/a/b").unwrap();
/// assert_eq!(slug(&url).as_str(), "docs-a-b");
/// ```
pub fn slug(url: &NormalizedUrl) -> Slug {
    slug_from_path(url.path())
}

/// Derives a slug directly from a URL path
pub fn slug_from_path(path: &str) -> Slug {
    let joined = path
        .trim_end_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if joined.is_empty() {
        Slug::new(INDEX_SLUG)
    } else {
        Slug::new(joined)
    }
}

/// Rebuilds a URL from a slug by turning every `-` back into `/`
///
/// This is lossy. It is only used to recognise earlier output when no URL
/// index exists in the output directory.
pub fn reconstruct_url(origin: &Url, slug: &Slug) -> UrlResult<NormalizedUrl> {
    let root = origin.origin().ascii_serialization();
    if slug.as_str() == INDEX_SLUG {
        normalize(&root)
    } else {
        normalize(&format!("{}/{}", root, slug.as_str().replace('-', "/")))
    }
}
