//! Page load step
//!
//! One attempt at loading a page: navigate or click, wait for the ready
//! selector, let scripts settle, then check that the document is not a stub.

use crate::config::Config;
use crate::crawler::{FetchOutcome, FetchStep};
use crate::render::{RenderError, RenderedPage, Renderer};
use crate::url::NormalizedUrl;
use async_trait::async_trait;
use std::time::Duration;

/// How the renderer reaches the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAction {
    Navigate,
    Click,
}

/// Loads one page through the renderer
pub struct PageLoad<'a> {
    renderer: &'a mut dyn Renderer,
    action: LoadAction,
    ready_selector: &'a str,
    settle: Duration,
    min_content_length: usize,
}

impl<'a> PageLoad<'a> {
    pub fn new(
        renderer: &'a mut dyn Renderer,
        action: LoadAction,
        ready_selector: &'a str,
        settle: Duration,
        min_content_length: usize,
    ) -> Self {
        Self {
            renderer,
            action,
            ready_selector,
            settle,
            min_content_length,
        }
    }

    /// Direct navigation, ready once `body` (or the configured selector) exists
    pub fn navigate(renderer: &'a mut dyn Renderer, config: &'a Config) -> Self {
        Self::new(
            renderer,
            LoadAction::Navigate,
            &config.crawl.ready_selector,
            config.crawl.settle(),
            config.crawl.min_content_length,
        )
    }

    /// Click navigation, ready once the main content container exists
    pub fn click(renderer: &'a mut dyn Renderer, config: &'a Config) -> Self {
        Self::new(
            renderer,
            LoadAction::Click,
            &config.crawl.click_ready_selector,
            config.crawl.settle(),
            config.crawl.min_content_length,
        )
    }

    async fn load(&mut self, url: &NormalizedUrl) -> Result<RenderedPage, RenderError> {
        let page = match self.action {
            LoadAction::Navigate => self.renderer.navigate(url.as_url()).await?,
            LoadAction::Click => self.renderer.click(url.as_url()).await?,
        };

        self.renderer
            .wait_for_selector(&page, self.ready_selector)
            .await?;

        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }

        let html = self.renderer.raw_html(&page);
        if html.len() < self.min_content_length {
            return Err(RenderError::ContentTooShort {
                length: html.len(),
                minimum: self.min_content_length,
            });
        }

        Ok(RenderedPage {
            url: page.url,
            html,
        })
    }
}

#[async_trait]
impl<'a> FetchStep for PageLoad<'a> {
    type Output = RenderedPage;

    async fn fetch(&mut self, url: &NormalizedUrl, attempt: u32) -> FetchOutcome<RenderedPage> {
        match self.action {
            LoadAction::Navigate => tracing::debug!("Loading {} (attempt {})", url, attempt),
            LoadAction::Click => tracing::debug!("Clicking {} (attempt {})", url, attempt),
        }

        let result = self.load(url).await;

        // A crash reported while loading outranks the load error itself
        if let Some(crash) = self.renderer.take_crash() {
            return FetchOutcome::Fatal(crash);
        }

        result.into()
    }
}
