//! HTTP renderer implementation
//!
//! This module loads documents with `reqwest`, including:
//! - Building one client per session with user agent, language and timeout
//! - Routing every request through the session proxy, with credentials
//! - Readiness checks by matching a selector against the loaded document
//! - Error classification (timeout, proxy tunnel, HTTP status)
//!
//! The renderer has no script engine. A click is carried out as a direct load
//! of the link target, and subresources are never requested.

use crate::config::{Config, ProxyConfig};
use crate::render::{Launcher, RenderError, RenderedPage, Renderer};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// Settings applied to every session opened by [`HttpLauncher`]
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub user_agent: String,
    pub accept_language: String,
    pub timeout: Duration,
    pub headless: bool,
}

impl LaunchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            user_agent: config.browser.user_agent.clone(),
            accept_language: config.browser.accept_language.clone(),
            timeout: config.crawl.timeout(),
            headless: config.browser.headless,
        }
    }
}

/// Opens [`HttpRenderer`] sessions
#[derive(Debug, Clone)]
pub struct HttpLauncher {
    options: LaunchOptions,
}

impl HttpLauncher {
    pub fn new(options: LaunchOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(LaunchOptions::from_config(config))
    }

    /// Builds the HTTP client for one session
    ///
    /// Without a session proxy, system proxy settings are ignored as well so a
    /// fallback session really goes out directly.
    fn build_client(&self, proxy: Option<&ProxyConfig>) -> Result<Client, RenderError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.1"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&self.options.accept_language)
                .map_err(|e| RenderError::Launch(format!("invalid Accept-Language: {}", e)))?,
        );

        let mut builder = Client::builder()
            .user_agent(self.options.user_agent.as_str())
            .default_headers(headers)
            .timeout(self.options.timeout)
            .connect_timeout(self.options.timeout.min(Duration::from_secs(10)))
            .gzip(true)
            .brotli(true);

        builder = match proxy {
            Some(proxy) => builder.proxy(build_proxy(proxy)?),
            None => builder.no_proxy(),
        };

        builder
            .build()
            .map_err(|e| RenderError::Launch(error_chain(&e)))
    }
}

#[async_trait]
impl Launcher for HttpLauncher {
    async fn launch(&self, proxy: Option<&ProxyConfig>) -> Result<Box<dyn Renderer>, RenderError> {
        if !self.options.headless {
            tracing::debug!("HTTP renderer has no window; --headless=false has no effect");
        }

        match proxy {
            Some(proxy) => tracing::info!("Using proxy: {}", proxy.url()),
            None => tracing::debug!("Opening session without proxy"),
        }

        let client = self.build_client(proxy)?;

        Ok(Box::new(HttpRenderer {
            client,
            proxied: proxy.is_some(),
            current: None,
        }))
    }
}

/// Builds the reqwest proxy, carrying credentials in the proxy URL
pub(crate) fn build_proxy(proxy: &ProxyConfig) -> Result<reqwest::Proxy, RenderError> {
    let mut url = Url::parse(&proxy.url())
        .map_err(|e| RenderError::Launch(format!("invalid proxy {}: {}", proxy.url(), e)))?;

    if let Some(credentials) = &proxy.credentials {
        let rejected =
            |_| RenderError::Launch(format!("proxy {} cannot carry credentials", proxy.url()));
        url.set_username(&credentials.username).map_err(rejected)?;
        url.set_password(Some(&credentials.password)).map_err(rejected)?;
    }

    reqwest::Proxy::all(url.as_str())
        .map_err(|e| RenderError::Launch(format!("invalid proxy {}: {}", proxy.url(), e)))
}

/// One HTTP rendering session
pub struct HttpRenderer {
    client: Client,
    proxied: bool,
    current: Option<RenderedPage>,
}

impl HttpRenderer {
    /// Classifies a request error
    ///
    /// Connection failures while a proxy is configured are failures to open the
    /// proxy tunnel.
    fn classify(&self, error: reqwest::Error) -> RenderError {
        let message = error_chain(&error);

        if message.to_lowercase().contains("tunnel") {
            RenderError::Tunnel(message)
        } else if self.proxied && error.is_connect() {
            RenderError::Tunnel(format!("proxy tunnel could not be established: {}", message))
        } else if error.is_timeout() {
            RenderError::Timeout(message)
        } else {
            RenderError::Navigation(message)
        }
    }

    fn current_links_to(&self, target: &Url) -> bool {
        self.current.as_ref().is_some_and(|page| {
            super::extract_links(&page.html, &page.url, "a[href]")
                .iter()
                .any(|href| Url::parse(href).is_ok_and(|mut href| {
                    href.set_fragment(None);
                    href == *target
                }))
        })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn navigate(&mut self, target: &Url) -> Result<RenderedPage, RenderError> {
        let response = match self.client.get(target.clone()).send().await {
            Ok(response) => response,
            Err(e) => return Err(self.classify(e)),
        };

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(status_error(status, &final_url, self.proxied));
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => return Err(self.classify(e)),
        };

        let page = RenderedPage {
            url: final_url,
            html,
        };
        self.current = Some(page.clone());

        Ok(page)
    }

    async fn click(&mut self, target: &Url) -> Result<RenderedPage, RenderError> {
        if self.current.is_some() && !self.current_links_to(target) {
            tracing::debug!("No link to {} on the current page; loading it directly", target);
        }
        self.navigate(target).await
    }

    async fn wait_for_selector(
        &mut self,
        page: &RenderedPage,
        selector: &str,
    ) -> Result<(), RenderError> {
        if document_matches(&page.html, selector)? {
            Ok(())
        } else {
            Err(RenderError::SelectorTimeout {
                selector: selector.to_string(),
                url: page.url.to_string(),
            })
        }
    }

    async fn close(&mut self) {
        self.current = None;
    }
}

/// Maps a non-success status to an error
///
/// A 407 while proxied means the proxy rejected the session, not the page.
fn status_error(status: StatusCode, url: &Url, proxied: bool) -> RenderError {
    if proxied && status == StatusCode::PROXY_AUTHENTICATION_REQUIRED {
        RenderError::Tunnel(format!("proxy refused {}: {}", url, status))
    } else {
        RenderError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        }
    }
}

/// Returns true if any element in the document matches the selector
fn document_matches(html: &str, selector: &str) -> Result<bool, RenderError> {
    let selector = Selector::parse(selector)
        .map_err(|e| RenderError::InvalidSelector(format!("{}: {:?}", selector, e)))?;
    let document = Html::parse_document(html);
    let matched = document.select(&selector).next().is_some();
    Ok(matched)
}

/// Joins an error with all of its sources
///
/// reqwest keeps the interesting part (for example hyper's "unsuccessful
/// tunnel") in the source chain rather than in its own message.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_proxy, ProxyKind};

    fn create_test_options() -> LaunchOptions {
        LaunchOptions {
            user_agent: "TestScribe/1.0".to_string(),
            accept_language: "en-US".to_string(),
            timeout: Duration::from_secs(5),
            headless: true,
        }
    }

    #[tokio::test]
    async fn test_launch_without_proxy() {
        let launcher = HttpLauncher::new(create_test_options());
        assert!(launcher.launch(None).await.is_ok());
    }

    #[tokio::test]
    async fn test_launch_with_authenticated_proxy() {
        let launcher = HttpLauncher::new(create_test_options());
        let proxy = parse_proxy("user:secret@127.0.0.1:3128", ProxyKind::Http).unwrap();
        assert!(launcher.launch(Some(&proxy)).await.is_ok());
    }

    #[test]
    fn test_build_proxy_socks5() {
        let proxy = parse_proxy("user:p@ss@127.0.0.1:1080", ProxyKind::Socks5).unwrap();
        assert!(build_proxy(&proxy).is_ok());
    }

    #[test]
    fn test_document_matches() {
        let html = "<html><body><main><p>Hi</p></main></body></html>";
        assert!(document_matches(html, "main, .content, article").unwrap());
        assert!(!document_matches(html, ".sidebar").unwrap());
        assert!(matches!(
            document_matches(html, "main[").unwrap_err(),
            RenderError::InvalidSelector(_)
        ));
    }

    #[test]
    fn test_proxy_auth_status_is_tunnel_failure() {
        let url = Url::parse("http://x.dev/docs").unwrap();
        let status = StatusCode::PROXY_AUTHENTICATION_REQUIRED;

        assert!(matches!(status_error(status, &url, true), RenderError::Tunnel(_)));
        assert!(matches!(
            status_error(status, &url, false),
            RenderError::Status { status: 407, .. }
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, &url, true),
            RenderError::Status { status: 404, .. }
        ));
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "unsuccessful tunnel");
        let outer = std::io::Error::new(std::io::ErrorKind::Other, inner);
        assert!(error_chain(&outer).contains("unsuccessful tunnel"));
    }
}
