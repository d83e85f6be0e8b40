//! Click-navigation traversal
//!
//! For documentation sites whose sidebar is driven by scripts: the base page is
//! loaded once, its sidebar links are visited in reading order by clicking
//! them, and every visited page contributes its own sidebar links. The base
//! page is never clicked again; it is written directly when the initial link
//! set lists it.

use crate::config::Config;
use crate::crawler::traversal::Traversal;
use crate::crawler::{Frontier, VisitOrder};
use crate::output::{CrawlMode, CrawlReport};
use crate::render::{RenderedPage, Renderer};
use crate::storage::{DocumentStore, FailureList};
use crate::url::{normalize, NormalizedUrl, Scope};
use crate::ScribeError;
use std::collections::HashSet;

/// Crawls the site by clicking through its navigation sidebar
///
/// With skip-existing set, pages written by an earlier run are still clicked
/// so their sidebar links are discovered, but they are not written again.
pub async fn click_navigate(
    config: &Config,
    renderer: &mut dyn Renderer,
    store: &mut dyn DocumentStore,
) -> Result<CrawlReport, ScribeError> {
    let scope = Scope::from_base(&config.base_url);
    let nav_selector = config.navigation.nav_selector.as_str();

    let previously_scraped: HashSet<NormalizedUrl> = if config.mode.skip_existing {
        store.scraped_urls(&scope)?
    } else {
        HashSet::new()
    };
    if !previously_scraped.is_empty() {
        tracing::info!("{} page(s) already scraped", previously_scraped.len());
    }

    let mut frontier = Frontier::new(scope, VisitOrder::Fifo);
    let seeds = if config.mode.retry_failed {
        store.read_failures(FailureList::Clicks)?
    } else {
        Vec::new()
    };

    let mut traversal = Traversal::new(config, renderer, store, CrawlMode::ClickNavigate);

    let base = &config.base_url;
    tracing::info!("Loading navigation from {}", base);
    traversal.report.pages_visited += 1;
    frontier.mark_visited(base);
    let base_page = traversal.navigate(base).await?;

    let mut base_listed = false;
    if config.mode.retry_failed {
        tracing::info!("Retrying {} failed click(s)", seeds.len());
        for seed in &seeds {
            base_listed |= normalize(seed)? == *base;
            frontier.push(seed, None)?;
        }
    } else if let Some(page) = &base_page {
        base_listed = traversal
            .renderer
            .extract_links(page, nav_selector)
            .iter()
            .any(|href| normalize(href).is_ok_and(|url| url == *base));
        let queued = push_nav_links(&traversal, &mut frontier, page, base, nav_selector);
        tracing::info!("Found {} navigation link(s)", queued);
    }

    if let (true, Some(page)) = (base_listed, &base_page) {
        if previously_scraped.contains(base) {
            tracing::info!("Already scraped: {}", base);
            traversal.report.pages_skipped += 1;
        } else {
            traversal.save(base, page)?;
        }
    }

    while let Some(entry) = frontier.pop() {
        traversal.poll_crash(&entry.url)?;
        traversal.report.pages_visited += 1;
        tracing::info!("Clicking and scraping: {} ({} queued)", entry.url, frontier.len());

        let Some(page) = traversal.click(&entry.url).await? else {
            continue;
        };

        push_nav_links(&traversal, &mut frontier, &page, &entry.url, nav_selector);

        if previously_scraped.contains(&entry.url) {
            tracing::info!("Already scraped: {}", entry.url);
            traversal.report.pages_skipped += 1;
            continue;
        }

        traversal.save(&entry.url, &page)?;
    }

    traversal.finish(FailureList::Clicks)
}

fn push_nav_links(
    traversal: &Traversal<'_>,
    frontier: &mut Frontier,
    page: &RenderedPage,
    from: &NormalizedUrl,
    nav_selector: &str,
) -> usize {
    let mut queued = 0;
    for href in traversal.renderer.extract_links(page, nav_selector) {
        match frontier.push(&href, Some(from)) {
            Ok(true) => queued += 1,
            Ok(false) => {}
            Err(e) => tracing::debug!("Ignoring navigation link {}: {}", href, e),
        }
    }
    queued
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::testing::{create_test_config, page_with_links, MockLauncher, MockSite};
    use crate::storage::FsStore;
    use crate::url::{normalize, slug};
    use std::fs;
    use tempfile::TempDir;

    async fn run(config: &Config, launcher: &MockLauncher) -> Result<CrawlReport, ScribeError> {
        let mut renderer = launcher.renderer();
        let mut store = FsStore::open(&config.output_dir).unwrap();
        click_navigate(config, &mut renderer, &mut store).await
    }

    fn create_click_config(output: &std::path::Path) -> Config {
        let mut config = create_test_config(output);
        config.mode.click_nav = true;
        config
    }

    #[tokio::test]
    async fn test_clicks_sidebar_in_reading_order() {
        let dir = TempDir::new().unwrap();
        let config = create_click_config(dir.path());
        let launcher = MockLauncher::new(
            MockSite::new()
                .page("https://x.dev/docs", page_with_links(&["/docs/a", "/docs/b"]))
                .page(
                    "https://x.dev/docs/a",
                    page_with_links(&["/docs/a", "/docs/b", "/docs/c"]),
                )
                .page("https://x.dev/docs/b", page_with_links(&[]))
                .page("https://x.dev/docs/c", page_with_links(&[])),
        );

        let report = run(&config, &launcher).await.unwrap();

        assert_eq!(launcher.navigations(), vec!["https://x.dev/docs"]);
        assert_eq!(
            launcher.clicks(),
            vec!["https://x.dev/docs/a", "https://x.dev/docs/b", "https://x.dev/docs/c"]
        );
        assert_eq!(report.pages_written, 3);
        assert!(!dir.path().join("docs.md").exists());
        assert!(dir.path().join("docs-c.md").exists());
    }

    #[tokio::test]
    async fn test_base_listed_in_sidebar_is_fetched_once() {
        let dir = TempDir::new().unwrap();
        let config = create_click_config(dir.path());
        let launcher = MockLauncher::new(
            MockSite::new()
                .page("https://x.dev/docs", page_with_links(&["/docs", "/docs/a"]))
                .page("https://x.dev/docs/a", page_with_links(&["/docs/", "/docs/a"])),
        );

        let report = run(&config, &launcher).await.unwrap();

        assert_eq!(launcher.navigations(), vec!["https://x.dev/docs"]);
        assert_eq!(launcher.clicks(), vec!["https://x.dev/docs/a"]);
        assert_eq!(report.pages_visited, 2);
        assert_eq!(report.pages_written, 2);
        assert!(dir.path().join("docs.md").exists());
        assert!(dir.path().join("docs-a.md").exists());
    }

    #[tokio::test]
    async fn test_retry_failed_base_is_not_clicked() {
        let dir = TempDir::new().unwrap();
        let mut config = create_click_config(dir.path());
        config.mode.retry_failed = true;
        fs::write(dir.path().join("failed_clicks.txt"), "https://x.dev/docs
").unwrap();

        let launcher = MockLauncher::new(
            MockSite::new().page("https://x.dev/docs", page_with_links(&["/docs/a"])),
        );

        let report = run(&config, &launcher).await.unwrap();

        assert_eq!(launcher.navigations(), vec!["https://x.dev/docs"]);
        assert!(launcher.clicks().is_empty());
        assert_eq!(report.pages_written, 1);
        assert!(dir.path().join("docs.md").exists());
        assert!(!dir.path().join("failed_clicks.txt").exists());
    }

    #[tokio::test]
    async fn test_skip_existing_still_expands_scraped_pages() {
        let dir = TempDir::new().unwrap();
        let mut config = create_click_config(dir.path());
        config.mode.skip_existing = true;
        fs::write(dir.path().join("docs-a.md"), "old\n").unwrap();

        let launcher = MockLauncher::new(
            MockSite::new()
                .page("https://x.dev/docs", page_with_links(&["/docs/a"]))
                .page("https://x.dev/docs/a", page_with_links(&["/docs/b"]))
                .page("https://x.dev/docs/b", page_with_links(&[])),
        );

        let report = run(&config, &launcher).await.unwrap();

        assert_eq!(
            launcher.clicks(),
            vec!["https://x.dev/docs/a", "https://x.dev/docs/b"]
        );
        assert_eq!(fs::read_to_string(dir.path().join("docs-a.md")).unwrap(), "old\n");
        assert!(dir.path().join("docs-b.md").exists());
        assert_eq!(report.pages_skipped, 1);
        assert_eq!(report.pages_written, 1);
    }

    #[tokio::test]
    async fn test_index_recognises_hyphenated_pages() {
        let dir = TempDir::new().unwrap();
        let mut config = create_click_config(dir.path());
        config.mode.skip_existing = true;

        let scraped = normalize("https://x.dev/docs/getting-started").unwrap();
        let mut store = FsStore::open(dir.path()).unwrap();
        store.write_document(&scraped, &slug(&scraped), "old").unwrap();

        let launcher = MockLauncher::new(
            MockSite::new()
                .page("https://x.dev/docs", page_with_links(&["/docs/getting-started"]))
                .page("https://x.dev/docs/getting-started", page_with_links(&[])),
        );

        let report = run(&config, &launcher).await.unwrap();

        assert_eq!(report.pages_skipped, 1);
        assert_eq!(report.pages_written, 0);
        assert_eq!(
            fs::read_to_string(dir.path().join("docs-getting-started.md")).unwrap(),
            "old\n"
        );
    }

    #[tokio::test]
    async fn test_failed_clicks_logged() {
        let dir = TempDir::new().unwrap();
        let config = create_click_config(dir.path());
        let launcher = MockLauncher::new(
            MockSite::new()
                .page("https://x.dev/docs", page_with_links(&["/docs/a", "/docs/missing"]))
                .page("https://x.dev/docs/a", page_with_links(&[])),
        );

        let report = run(&config, &launcher).await.unwrap();

        assert_eq!(report.failures.len(), 1);
        let failed = fs::read_to_string(dir.path().join("failed_clicks.txt")).unwrap();
        assert_eq!(failed, "https://x.dev/docs/missing\n");
        assert!(!dir.path().join("failed_urls.txt").exists());
    }

    #[tokio::test]
    async fn test_retry_failed_seeds_from_failed_clicks() {
        let dir = TempDir::new().unwrap();
        let mut config = create_click_config(dir.path());
        config.mode.retry_failed = true;
        fs::write(dir.path().join("failed_clicks.txt"), "https://x.dev/docs/b\n").unwrap();

        let launcher = MockLauncher::new(
            MockSite::new()
                .page("https://x.dev/docs", page_with_links(&["/docs/a", "/docs/b"]))
                .page("https://x.dev/docs/a", page_with_links(&[]))
                .page("https://x.dev/docs/b", page_with_links(&[])),
        );

        let report = run(&config, &launcher).await.unwrap();

        assert_eq!(launcher.clicks(), vec!["https://x.dev/docs/b"]);
        assert_eq!(report.pages_written, 1);
        assert!(!dir.path().join("failed_clicks.txt").exists());
    }

    #[tokio::test]
    async fn test_base_page_failure_recorded() {
        let dir = TempDir::new().unwrap();
        let config = create_click_config(dir.path());
        let launcher = MockLauncher::new(MockSite::new());

        let report = run(&config, &launcher).await.unwrap();

        assert_eq!(launcher.navigations().len(), 3);
        assert!(launcher.clicks().is_empty());
        let failed = fs::read_to_string(dir.path().join("failed_clicks.txt")).unwrap();
        assert_eq!(failed, "https://x.dev/docs\n");
    }
}
