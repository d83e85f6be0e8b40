//! Link-following traversal
//!
//! Depth-first walk over every in-scope `<a href>` reachable from the base URL
//! (or from the previous run's failed URLs in retry-failed mode).

use crate::config::Config;
use crate::crawler::traversal::Traversal;
use crate::crawler::{Frontier, VisitOrder};
use crate::output::{CrawlMode, CrawlReport};
use crate::render::Renderer;
use crate::storage::{DocumentStore, FailureList};
use crate::url::Scope;
use crate::ScribeError;

const LINK_SELECTOR: &str = "a[href]";

/// Crawls the site by following hyperlinks
///
/// # Arguments
///
/// * `config` - The run configuration
/// * `renderer` - An open rendering session
/// * `store` - Output directory store
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The frontier was exhausted
/// * `Err(ScribeError)` - Tunnel failure, renderer crash, malformed seed or write error
pub async fn link_follow(
    config: &Config,
    renderer: &mut dyn Renderer,
    store: &mut dyn DocumentStore,
) -> Result<CrawlReport, ScribeError> {
    let mut frontier = Frontier::new(Scope::from_base(&config.base_url), VisitOrder::Lifo);

    if config.mode.retry_failed {
        let seeds = store.read_failures(FailureList::Links)?;
        tracing::info!("Retrying {} failed URL(s)", seeds.len());
        for seed in &seeds {
            frontier.push(seed, None)?;
        }
    } else {
        frontier.push(config.base_url.as_str(), None)?;
    }

    let mut traversal = Traversal::new(config, renderer, store, CrawlMode::LinkFollow);

    while let Some(entry) = frontier.pop() {
        traversal.poll_crash(&entry.url)?;
        traversal.report.pages_visited += 1;
        tracing::info!("Scraping: {} ({} queued)", entry.url, frontier.len());

        let Some(page) = traversal.navigate(&entry.url).await? else {
            continue;
        };

        traversal.save(&entry.url, &page)?;

        let mut queued = 0;
        for href in traversal.renderer.extract_links(&page, LINK_SELECTOR) {
            match frontier.push(&href, Some(&entry.url)) {
                Ok(true) => queued += 1,
                Ok(false) => {}
                Err(e) => tracing::debug!("Ignoring link {}: {}", href, e),
            }
        }
        tracing::debug!("Queued {} new link(s) from {}", queued, entry.url);
    }

    traversal.finish(FailureList::Links)
}
