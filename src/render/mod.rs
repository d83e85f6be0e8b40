//! Rendering collaborator
//!
//! The traversal engine never talks to a browser or HTTP client directly. It
//! drives a [`Renderer`] opened by a [`Launcher`]:
//!
//! - `navigate` loads a URL directly
//! - `click` reaches a URL by activating a navigation element
//! - `wait_for_selector` checks DOM readiness
//! - `extract_links` and `raw_html` read the loaded page
//!
//! [`HttpLauncher`] is the built-in implementation. It loads documents over
//! HTTP(S), optionally through a proxy, and never requests images, stylesheets
//! or fonts.

mod http;
mod links;

pub(crate) use http::build_proxy;
pub use http::{HttpLauncher, HttpRenderer, LaunchOptions};
pub use links::{extract_links, resolve_link};

use crate::config::ProxyConfig;
use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// A page as loaded by the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Final URL after redirects
    pub url: Url,

    /// Serialized document
    pub html: String,
}

/// Errors reported by a renderer
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Navigation timed out: {0}")]
    Timeout(String),

    #[error("Waiting for selector '{selector}' failed on {url}")]
    SelectorTimeout { selector: String, url: String },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Page content appears too short or failed to load properly ({length} < {minimum} bytes)")]
    ContentTooShort { length: usize, minimum: usize },

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Proxy tunnel failed: {0}")]
    Tunnel(String),

    #[error("Page crashed: {0}")]
    Crash(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Failed to launch renderer: {0}")]
    Launch(String),
}

/// One open rendering session
///
/// A session owns a single page and is driven strictly sequentially.
#[async_trait]
pub trait Renderer: Send {
    /// Loads `target` directly
    async fn navigate(&mut self, target: &Url) -> Result<RenderedPage, RenderError>;

    /// Reaches `target` by activating the link to it on the current page
    async fn click(&mut self, target: &Url) -> Result<RenderedPage, RenderError>;

    /// Succeeds once an element matching `selector` exists on the page
    async fn wait_for_selector(
        &mut self,
        page: &RenderedPage,
        selector: &str,
    ) -> Result<(), RenderError>;

    /// Returns the absolute `href` of every element matching `selector`
    fn extract_links(&self, page: &RenderedPage, selector: &str) -> Vec<String> {
        extract_links(&page.html, &page.url, selector)
    }

    /// Returns the serialized document
    fn raw_html(&self, page: &RenderedPage) -> String {
        page.html.clone()
    }

    /// Reports a crash signalled since the last call, if any
    ///
    /// The traversal loop polls this between pages; a renderer must never abort
    /// the process from its own event handlers.
    fn take_crash(&mut self) -> Option<String> {
        None
    }

    /// Releases the session
    async fn close(&mut self) {}
}

/// Opens rendering sessions
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Opens a session, routed through `proxy` when one is given
    async fn launch(&self, proxy: Option<&ProxyConfig>) -> Result<Box<dyn Renderer>, RenderError>;
}

/// Converts a rendered document to Markdown
pub fn to_markdown(html: &str) -> String {
    html2md::parse_html(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_markdown_keeps_text() {
        let markdown = to_markdown("<html><body><h1>Guide</h1><p>Install the CLI.</p></body></html>");
        assert!(markdown.contains("Guide"));
        assert!(markdown.contains("Install the CLI."));
    }

    #[test]
    fn test_tunnel_error_text() {
        let error = RenderError::Tunnel("unsuccessful tunnel".to_string());
        assert!(error.to_string().to_lowercase().contains("tunnel"));
    }
}
