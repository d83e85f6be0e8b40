//! State shared by both traversal strategies
//!
//! A [`Traversal`] borrows the open rendering session and the store for one
//! strategy run and accumulates the [`CrawlReport`].

use crate::config::Config;
use crate::crawler::{Attempt, PageLoad, RetryController};
use crate::output::{CrawlMode, CrawlReport};
use crate::render::{to_markdown, RenderedPage, Renderer};
use crate::sanitize::Sanitizer;
use crate::storage::{DocumentStore, FailureList};
use crate::url::{slug, NormalizedUrl};
use crate::ScribeError;

pub(crate) struct Traversal<'a> {
    pub config: &'a Config,
    pub renderer: &'a mut dyn Renderer,
    pub store: &'a mut dyn DocumentStore,
    pub report: CrawlReport,
    sanitizer: Sanitizer,
    retry: RetryController,
}

impl<'a> Traversal<'a> {
    pub fn new(
        config: &'a Config,
        renderer: &'a mut dyn Renderer,
        store: &'a mut dyn DocumentStore,
        mode: CrawlMode,
    ) -> Self {
        Self {
            config,
            renderer,
            store,
            report: CrawlReport::new(mode),
            sanitizer: Sanitizer::new(&config.sanitizer),
            retry: RetryController::from_config(config),
        }
    }

    /// Fails with `RenderCrash` if the renderer reported a crash since the last poll
    pub fn poll_crash(&mut self, url: &NormalizedUrl) -> Result<(), ScribeError> {
        match self.renderer.take_crash() {
            Some(message) => Err(ScribeError::RenderCrash {
                url: url.to_string(),
                message,
            }),
            None => Ok(()),
        }
    }

    /// Loads a page directly under the retry policy
    ///
    /// Returns `None` after recording a failure when every attempt failed.
    pub async fn navigate(&mut self, url: &NormalizedUrl) -> Result<Option<RenderedPage>, ScribeError> {
        let mut step = PageLoad::navigate(&mut *self.renderer, self.config);
        let attempt = self.retry.attempt(url, &mut step).await?;
        Ok(self.settle_attempt(attempt))
    }

    /// Reaches a page by clicking its navigation link under the retry policy
    pub async fn click(&mut self, url: &NormalizedUrl) -> Result<Option<RenderedPage>, ScribeError> {
        let mut step = PageLoad::click(&mut *self.renderer, self.config);
        let attempt = self.retry.attempt(url, &mut step).await?;
        Ok(self.settle_attempt(attempt))
    }

    fn settle_attempt(&mut self, attempt: Attempt<RenderedPage>) -> Option<RenderedPage> {
        match attempt {
            Attempt::Succeeded(page) => Some(page),
            Attempt::Exhausted(failure) => {
                self.report.failures.push(failure);
                None
            }
        }
    }

    /// Converts, sanitizes and writes a page unless it is already on disk in
    /// skip-existing mode
    pub fn save(&mut self, url: &NormalizedUrl, page: &RenderedPage) -> Result<(), ScribeError> {
        let slug = slug(url);

        if self.config.mode.skip_existing && self.store.exists(&slug) {
            tracing::info!("Skipping existing: {}", url);
            self.report.pages_skipped += 1;
            return Ok(());
        }

        let markdown = to_markdown(&page.html);
        let cleaned = self.sanitizer.clean(&markdown);
        self.store.write_document(url, &slug, &cleaned.text)?;

        tracing::info!("Saved {} -> {}", url, slug.file_name());
        self.report.pages_written += 1;
        self.report.lines_removed += cleaned.removed_lines as u64;

        Ok(())
    }

    /// Writes or clears the failure list and closes the report
    pub fn finish(mut self, list: FailureList) -> Result<CrawlReport, ScribeError> {
        if !self.report.failures.is_empty() {
            self.store.write_failures(list, &self.report.failures)?;
            tracing::warn!(
                "{} page(s) failed: logged to {}",
                self.report.failures.len(),
                list.file_name()
            );
        } else if self.config.mode.retry_failed {
            self.store.clear_failures(list)?;
            tracing::info!("All previously failed pages recovered; removed {}", list.file_name());
        }

        self.report.finish();
        tracing::info!(
            "Done: {} visited, {} written, {} skipped, {} failed",
            self.report.pages_visited,
            self.report.pages_written,
            self.report.pages_skipped,
            self.report.failures.len()
        );

        Ok(self.report)
    }
}
