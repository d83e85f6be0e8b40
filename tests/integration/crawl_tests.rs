//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the real
//! HTTP renderer through the full crawl cycle end-to-end.

use std::fs;
use std::path::Path;
use sumi_scribe::config::{build_config, Config, FileSettings, Overrides};
use sumi_scribe::crawler::crawl;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no delays and a short timeout
fn create_test_config(base_url: &str, output: &Path, overrides: Overrides) -> Config {
    let overrides = Overrides {
        retries: Some(2),
        delay_ms: Some(0),
        settle_ms: Some(0),
        timeout_ms: Some(5000),
        ..overrides
    };
    let mut config = build_config(base_url, output, FileSettings::default(), overrides)
        .expect("Failed to build config");
    config.crawl.min_content_length = 0;
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>Docs</title></head><body>{}</body></html>",
            body
        ))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

async fn requests_to(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == route)
        .count()
}

#[tokio::test]
async fn test_link_follow_writes_documents() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/docs",
        r#"<main><h1>Overview</h1>
        <a href="/docs/intro">Intro</a>
        <a href="/docs/guide/">Guide</a>
        <a href="/blog/post">Blog</a></main>"#,
    )
    .await;
    mount_page(&server, "/docs/intro", r#"<main><p>Intro text</p><a href="/docs">Back</a></main>"#).await;
    mount_page(&server, "/docs/guide", "<main><p>Guide text</p></main>").await;

    let config = create_test_config(
        &format!("{}/docs", server.uri()),
        dir.path(),
        Overrides::default(),
    );

    let report = crawl(&config).await.expect("Crawl failed");

    assert_eq!(report.pages_written, 3);
    assert!(report.failures.is_empty());
    assert!(dir.path().join("docs.md").exists());
    assert!(dir.path().join("docs-intro.md").exists());
    assert!(dir.path().join("docs-guide.md").exists());
    assert!(!dir.path().join("blog-post.md").exists());
    assert_eq!(requests_to(&server, "/blog/post").await, 0);
    assert_eq!(requests_to(&server, "/docs").await, 1);

    let intro = fs::read_to_string(dir.path().join("docs-intro.md")).unwrap();
    assert!(intro.contains("Intro text"));

    let index = fs::read_to_string(dir.path().join(".scribe-index.jsonl")).unwrap();
    assert_eq!(index.lines().count(), 3);
}

#[tokio::test]
async fn test_missing_page_logged_after_retries() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/docs", r#"<a href="/docs/gone">Gone</a>"#).await;

    let base_url = format!("{}/docs", server.uri());
    let config = create_test_config(&base_url, dir.path(), Overrides::default());

    let report = crawl(&config).await.expect("Crawl failed");

    assert_eq!(report.failures.len(), 1);
    assert_eq!(requests_to(&server, "/docs/gone").await, 2);

    let failed = fs::read_to_string(dir.path().join("failed_urls.txt")).unwrap();
    assert_eq!(failed, format!("{}/gone\n", base_url));
}

#[tokio::test]
async fn test_short_content_is_retried_and_logged() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/docs", "<p>Loading...</p>").await;

    let mut config = create_test_config(
        &format!("{}/docs", server.uri()),
        dir.path(),
        Overrides::default(),
    );
    config.crawl.min_content_length = 1000;

    let report = crawl(&config).await.expect("Crawl failed");

    assert_eq!(report.pages_written, 0);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].last_error.contains("too short"));
    assert_eq!(requests_to(&server, "/docs").await, 2);
}

#[tokio::test]
async fn test_retry_failed_recovers_and_clears_list() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/docs", r#"<a href="/docs/a">A</a>"#).await;
    mount_page(&server, "/docs/a", "<main><p>Recovered</p></main>").await;

    let base_url = format!("{}/docs", server.uri());
    fs::write(dir.path().join("failed_urls.txt"), format!("{}/a\n", base_url)).unwrap();

    let overrides = Overrides {
        retry_failed: true,
        ..Overrides::default()
    };
    let config = create_test_config(&base_url, dir.path(), overrides);

    let report = crawl(&config).await.expect("Crawl failed");

    assert_eq!(report.pages_written, 1);
    assert_eq!(requests_to(&server, "/docs").await, 0);
    assert!(dir.path().join("docs-a.md").exists());
    assert!(!dir.path().join("failed_urls.txt").exists());
}

#[tokio::test]
async fn test_click_nav_follows_sidebar_only() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let sidebar = r#"<aside class="sidebar">
        <a href="/docs/a">A</a>
        <a href="/docs/b">B</a>
    </aside>"#;

    mount_page(
        &server,
        "/docs",
        &format!(r#"{}<main><a href="/docs/other">Other</a></main>"#, sidebar),
    )
    .await;
    mount_page(&server, "/docs/a", &format!("{}<main><p>Page A</p></main>", sidebar)).await;
    mount_page(&server, "/docs/b", &format!("{}<main><p>Page B</p></main>", sidebar)).await;

    let overrides = Overrides {
        click_nav: true,
        ..Overrides::default()
    };
    let config = create_test_config(&format!("{}/docs", server.uri()), dir.path(), overrides);

    let report = crawl(&config).await.expect("Crawl failed");

    assert_eq!(report.pages_written, 2);
    assert!(dir.path().join("docs-a.md").exists());
    assert!(dir.path().join("docs-b.md").exists());
    assert!(!dir.path().join("docs-other.md").exists());
    assert_eq!(requests_to(&server, "/docs/other").await, 0);
    assert_eq!(requests_to(&server, "/docs/a").await, 1);
}

#[tokio::test]
async fn test_click_nav_waits_for_content_container() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/docs", r#"<div class="sidebar"><a href="/docs/bare">Bare</a></div>"#).await;
    mount_page(&server, "/docs/bare", "<div>No content container</div>").await;

    let overrides = Overrides {
        click_nav: true,
        ..Overrides::default()
    };
    let config = create_test_config(&format!("{}/docs", server.uri()), dir.path(), overrides);

    let report = crawl(&config).await.expect("Crawl failed");

    assert_eq!(report.failures.len(), 1);
    assert!(dir.path().join("failed_clicks.txt").exists());
}

#[tokio::test]
async fn test_unreachable_proxy_falls_back_to_direct() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/docs", "<main><p>Direct</p></main>").await;

    let overrides = Overrides {
        proxy: Some("127.0.0.1:1".to_string()),
        ..Overrides::default()
    };
    let config = create_test_config(&format!("{}/docs", server.uri()), dir.path(), overrides);

    let report = crawl(&config).await.expect("Crawl failed");

    assert!(report.proxy_fallback);
    assert_eq!(report.pages_written, 1);
    assert!(dir.path().join("docs.md").exists());
}

#[tokio::test]
async fn test_proxy_auth_rejection_falls_back_to_direct() {
    let proxy = MockServer::start().await;
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(407))
        .mount(&proxy)
        .await;
    mount_page(&server, "/docs", "<main><p>Direct</p></main>").await;

    let proxy_addr = proxy.address().to_string();
    let overrides = Overrides {
        proxy: Some(proxy_addr),
        ..Overrides::default()
    };
    let config = create_test_config(&format!("{}/docs", server.uri()), dir.path(), overrides);

    let report = crawl(&config).await.expect("Crawl failed");

    assert!(report.proxy_fallback);
    assert!(report.failures.is_empty());
    assert_eq!(report.pages_written, 1);
    assert!(!proxy.received_requests().await.unwrap_or_default().is_empty());
}
