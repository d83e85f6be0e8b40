use crate::url::NormalizedUrl;
use url::{Origin, Url};

/// The crawl scope: same origin as the base URL and a path under the base path
///
/// The path check is a plain string prefix test, so a base of `/docs` also
/// admits `/docs-v2`.
#[derive(Debug, Clone)]
pub struct Scope {
    origin: Origin,
    base_path: String,
    root: Url,
}

impl Scope {
    /// Builds the scope from the normalized base URL
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_scribe::url::{normalize, Scope};
    ///
    /// let scope = Scope::from_base(&normalize("https://example.com/docs/").unwrap());
    /// assert!(scope.contains(&normalize("https://example.com/docs/intro").unwrap()));
    /// assert!(!scope.contains(&normalize("https://example.com/blog").unwrap()));
    /// assert!(!scope.contains(&normalize("https://other.com/docs").unwrap()));
    /// ```
    pub fn from_base(base: &NormalizedUrl) -> Self {
        let mut root = base.as_url().clone();
        root.set_path("/");
        root.set_query(None);

        Self {
            origin: base.as_url().origin(),
            base_path: base.path().trim_end_matches('/').to_string(),
            root,
        }
    }

    /// Returns true if the URL shares the base origin and path prefix
    pub fn contains(&self, url: &NormalizedUrl) -> bool {
        url.as_url().origin() == self.origin && url.path().starts_with(&self.base_path)
    }

    /// The base path without a trailing slash (empty for the site root)
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// The site root of the base origin
    pub fn root(&self) -> &Url {
        &self.root
    }
}
