//! Link extraction from rendered documents
//!
//! Anchors are selected with a CSS selector (`a[href]` for link-following, the
//! sidebar selector for click-navigation) and resolved against the page URL.

use scraper::{Html, Selector};
use url::Url;

/// Extracts the absolute `href` of every element matching `selector`
///
/// # Exclusion Rules
///
/// - Elements without an `href` attribute
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links (same page anchors)
/// - Anything that does not resolve to an HTTP(S) URL
///
/// An unparsable selector yields no links.
///
/// # Example
///
/// ```
/// use sumi_scribe::render::extract_links;
/// use url::Url;
///
/// let html = r#"<nav class="sidebar"><a href="intro">Intro</a></nav><a href="/blog">Blog</a>"#;
/// let base_url = Url::parse("https://example.com/docs/").unwrap();
/// let links = extract_links(html, &base_url, ".sidebar a");
/// assert_eq!(links, vec!["https://example.com/docs/intro".to_string()]);
/// ```
pub fn extract_links(html: &str, base_url: &Url, selector: &str) -> Vec<String> {
    let selector = match Selector::parse(selector) {
        Ok(selector) => selector,
        Err(e) => {
            tracing::warn!("Invalid link selector '{}': {:?}", selector, e);
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for element in document.select(&selector) {
        // Skip if it has the download attribute
        if element.value().attr("download").is_some() {
            continue;
        }

        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_link(href, base_url) {
                links.push(absolute_url);
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url.to_string())
    } else {
        None
    }
}
