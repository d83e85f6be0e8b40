//! Proxy candidate checker
//!
//! Fetches a plain-text list of `ip:port` or `user:pass@ip:port` candidates and
//! keeps the ones that can complete a request to an IP echo endpoint. Working
//! candidates can be passed straight to `--proxy`.

use crate::config::{parse_proxy, ProxyKind};
use crate::render::build_proxy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Echo endpoint answering `{"origin": "<ip>"}`
pub const DEFAULT_TEST_URL: &str = "http://httpbin.org/ip";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while fetching or checking candidates
#[derive(Debug, Error)]
pub enum ProxyCheckError {
    #[error("Failed to fetch candidates from {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("Invalid candidate: {0}")]
    Candidate(String),

    #[error("Request through proxy failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Echo endpoint answered HTTP {0}")]
    Status(u16),

    #[error("Unexpected echo response: {0}")]
    Echo(#[from] serde_json::Error),
}

/// How candidates are checked
#[derive(Debug, Clone)]
pub struct CheckSettings {
    pub kind: ProxyKind,
    pub test_url: String,
    pub timeout: Duration,
    /// Checks in flight at once
    pub concurrency: usize,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            kind: ProxyKind::Http,
            test_url: DEFAULT_TEST_URL.to_string(),
            timeout: Duration::from_secs(5),
            concurrency: 10,
        }
    }
}

/// A candidate that completed the echo request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingProxy {
    pub candidate: String,
    /// Address the echo endpoint saw
    pub origin: String,
}

#[derive(Debug, Deserialize)]
struct EchoResponse {
    origin: String,
}

/// Splits a candidate list, skipping blank lines and `#` comments
pub fn parse_candidates(body: &str, limit: Option<usize>) -> Vec<String> {
    let candidates = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string);

    match limit {
        Some(limit) => candidates.take(limit).collect(),
        None => candidates.collect(),
    }
}

/// Downloads a candidate list from a plain-text API
pub async fn fetch_candidates(
    api_url: &str,
    limit: Option<usize>,
) -> Result<Vec<String>, ProxyCheckError> {
    let fetch_error = |source| ProxyCheckError::Fetch {
        url: api_url.to_string(),
        source,
    };

    let client = Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(fetch_error)?;
    let body = client
        .get(api_url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(fetch_error)?
        .text()
        .await
        .map_err(fetch_error)?;

    Ok(parse_candidates(&body, limit))
}

/// Sends one request through a candidate and returns the echoed origin
pub async fn check_proxy(
    candidate: &str,
    settings: &CheckSettings,
) -> Result<String, ProxyCheckError> {
    let proxy = parse_proxy(candidate, settings.kind)
        .map_err(|e| ProxyCheckError::Candidate(e.to_string()))?;
    let proxy = build_proxy(&proxy).map_err(|e| ProxyCheckError::Candidate(e.to_string()))?;

    let client = Client::builder()
        .proxy(proxy)
        .timeout(settings.timeout)
        .build()?;
    let response = client.get(&settings.test_url).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(ProxyCheckError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    let echo: EchoResponse = serde_json::from_str(&body)?;
    Ok(echo.origin)
}

/// Checks every candidate, at most `concurrency` at a time
///
/// Working proxies are returned in completion order.
pub async fn check_all(candidates: Vec<String>, settings: &CheckSettings) -> Vec<WorkingProxy> {
    let semaphore = Arc::new(Semaphore::new(settings.concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for candidate in candidates {
        let semaphore = Arc::clone(&semaphore);
        let settings = settings.clone();
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok()?;
            match check_proxy(&candidate, &settings).await {
                Ok(origin) => {
                    tracing::info!("Working {} proxy: {} -> {}", settings.kind, candidate, origin);
                    Some(WorkingProxy { candidate, origin })
                }
                Err(e) => {
                    tracing::debug!("Rejected {} proxy {}: {}", settings.kind, candidate, e);
                    None
                }
            }
        });
    }

    let mut working = Vec::new();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Some(proxy)) => working.push(proxy),
            Ok(None) => {}
            Err(e) => tracing::warn!("Proxy check task failed: {}", e),
        }
    }

    working
}
