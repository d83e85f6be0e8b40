//! Retry controller
//!
//! Runs one fetch step up to a fixed number of times with a fixed delay in
//! between. Transient failures are retried and, once exhausted, turned into a
//! [`FailureRecord`]; tunnel failures and crashes end the attempt immediately.

use crate::config::Config;
use crate::crawler::FetchOutcome;
use crate::storage::FailureRecord;
use crate::url::NormalizedUrl;
use crate::ScribeError;
use async_trait::async_trait;
use std::time::Duration;

/// One unit of work that may be attempted several times
#[async_trait]
pub trait FetchStep: Send {
    type Output: Send;

    /// Performs attempt number `attempt` (starting at 1) for `url`
    async fn fetch(&mut self, url: &NormalizedUrl, attempt: u32) -> FetchOutcome<Self::Output>;
}

/// Result of a retried step that did not end the crawl
#[derive(Debug)]
pub enum Attempt<T> {
    Succeeded(T),
    Exhausted(FailureRecord),
}

/// Fixed-count, fixed-delay retry policy
#[derive(Debug, Clone, Copy)]
pub struct RetryController {
    max_attempts: u32,
    delay: Duration,
}

impl RetryController {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.crawl.retries, config.crawl.delay())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs `step` until it succeeds or the attempts are used up
    ///
    /// # Returns
    ///
    /// * `Ok(Attempt::Succeeded)` - The step produced a value
    /// * `Ok(Attempt::Exhausted)` - Every attempt failed transiently
    /// * `Err(ScribeError::Tunnel)` - The proxy tunnel failed
    /// * `Err(ScribeError::RenderCrash)` - The renderer crashed
    pub async fn attempt<S: FetchStep>(
        &self,
        url: &NormalizedUrl,
        step: &mut S,
    ) -> Result<Attempt<S::Output>, ScribeError> {
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match step.fetch(url, attempt).await {
                FetchOutcome::Success(value) => return Ok(Attempt::Succeeded(value)),
                FetchOutcome::Retryable(message) => {
                    tracing::warn!(
                        "Failed to load {} (attempt {}/{}): {}",
                        url,
                        attempt,
                        self.max_attempts,
                        message
                    );
                    last_error = message;

                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.delay).await;
                    }
                }
                FetchOutcome::ProxyFallback(message) => {
                    return Err(ScribeError::Tunnel {
                        url: url.to_string(),
                        message,
                    });
                }
                FetchOutcome::Fatal(message) => {
                    return Err(ScribeError::RenderCrash {
                        url: url.to_string(),
                        message,
                    });
                }
            }
        }

        tracing::error!(
            "Giving up on {} after {} attempts: {}",
            url,
            self.max_attempts,
            last_error
        );

        Ok(Attempt::Exhausted(FailureRecord {
            url: url.clone(),
            last_error,
        }))
    }
}
