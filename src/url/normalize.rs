use crate::url::NormalizedUrl;
use crate::UrlError;
use url::Url;

/// Normalizes a raw link into a comparable page key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject schemes other than HTTP and HTTPS, and URLs without a host
/// 3. Remove fragment (everything after #)
/// 4. Remove one trailing slash from the path
///
/// The site root keeps its `/` in the parsed URL but not in the key, so
/// `https://example.com/` and `https://example.com` share the key
/// `https://example.com`.
///
/// # Arguments
///
/// * `raw` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(NormalizedUrl)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse the URL
///
/// # Examples
///
/// ```
/// use sumi_scribe::url::normalize;
///
/// let url = normalize("https://example.com/docs/intro/#setup").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs/intro");
/// ```
pub fn normalize(raw: &str) -> Result<NormalizedUrl, UrlError> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", raw.trim(), e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    let path = url.path().to_string();
    if let Some(trimmed) = path.strip_suffix('/') {
        if !trimmed.is_empty() {
            url.set_path(trimmed);
        }
    }

    let mut key = url.to_string();
    if url.path() == "/" && url.query().is_none() {
        key.pop();
    }

    Ok(NormalizedUrl::new(key, url))
}
