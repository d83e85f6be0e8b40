//! Crawl session driver
//!
//! This module opens the rendering session, runs the selected traversal
//! strategy, always closes the session, and restarts the whole traversal once
//! without the proxy when the proxy tunnel fails.

use crate::config::{Config, ProxyConfig};
use crate::crawler::{click_navigate, link_follow};
use crate::output::CrawlReport;
use crate::render::{HttpLauncher, Launcher, RenderError, Renderer};
use crate::storage::{DocumentStore, FsStore};
use crate::ScribeError;

/// Runs a complete crawl
///
/// This is the main entry point. It will:
/// 1. Open the output directory
/// 2. Launch an HTTP rendering session (through the proxy, if configured)
/// 3. Run link-following or click-navigation
/// 4. Fall back to a direct session once if the proxy tunnel fails
///
/// # Arguments
///
/// * `config` - The run configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed (possibly with failed pages)
/// * `Err(ScribeError)` - Crawl aborted
pub async fn crawl(config: &Config) -> Result<CrawlReport, ScribeError> {
    let mut store = FsStore::open(&config.output_dir)?;
    let launcher = HttpLauncher::from_config(config);
    run_with_fallback(config, &launcher, &mut store).await
}

/// Runs the traversal, restarting once without the proxy on a tunnel failure
///
/// The restart walks the site again from the start; visited pages and failures
/// of the abandoned session are not carried over. A second tunnel failure, or
/// a tunnel failure without a proxy, is returned as an error.
pub async fn run_with_fallback(
    config: &Config,
    launcher: &dyn Launcher,
    store: &mut dyn DocumentStore,
) -> Result<CrawlReport, ScribeError> {
    let Some(proxy) = config.proxy.as_ref() else {
        return run_session(config, launcher, store, None).await;
    };

    match run_session(config, launcher, store, Some(proxy)).await {
        Err(e) if e.is_tunnel() => {
            tracing::warn!("Proxy failed due to tunnel error ({}). Retrying without proxy...", e);
            let mut report = run_session(config, launcher, store, None).await?;
            report.proxy_fallback = true;
            Ok(report)
        }
        other => other,
    }
}

/// Runs one traversal in a fresh rendering session
async fn run_session(
    config: &Config,
    launcher: &dyn Launcher,
    store: &mut dyn DocumentStore,
    proxy: Option<&ProxyConfig>,
) -> Result<CrawlReport, ScribeError> {
    let mut renderer = launcher.launch(proxy).await.map_err(|e| match e {
        RenderError::Tunnel(message) => ScribeError::Tunnel {
            url: config.base_url.to_string(),
            message,
        },
        other => ScribeError::Render(other),
    })?;

    let result = traverse(config, renderer.as_mut(), store).await;
    renderer.close().await;

    if result.is_ok() {
        tracing::info!("Done scraping {}", config.base_url);
    }
    result
}

/// Runs the traversal strategy selected by the configuration
pub async fn traverse(
    config: &Config,
    renderer: &mut dyn Renderer,
    store: &mut dyn DocumentStore,
) -> Result<CrawlReport, ScribeError> {
    if config.mode.click_nav {
        click_navigate(config, renderer, store).await
    } else {
        link_follow(config, renderer, store).await
    }
}
