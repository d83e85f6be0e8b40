//! Crawl report generation
//!
//! This module records what one traversal did and prints the summary shown at
//! the end of a run.

use crate::storage::FailureRecord;
use chrono::{DateTime, Utc};
use std::fmt;

/// Traversal strategy a report belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlMode {
    LinkFollow,
    ClickNavigate,
}

impl fmt::Display for CrawlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkFollow => write!(f, "link-follow"),
            Self::ClickNavigate => write!(f, "click-navigate"),
        }
    }
}

/// Summary of one traversal
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Strategy that produced this report
    pub mode: CrawlMode,

    pub started_at: DateTime<Utc>,

    /// Set when the traversal finished normally
    pub finished_at: Option<DateTime<Utc>>,

    /// Pages popped from the frontier
    pub pages_visited: u64,

    /// Documents written
    pub pages_written: u64,

    /// Pages loaded but not written (already on disk or already scraped)
    pub pages_skipped: u64,

    /// Lines removed by the sanitizer across all written documents
    pub lines_removed: u64,

    /// URLs that exhausted their retries
    pub failures: Vec<FailureRecord>,

    /// True if the session had to restart without the proxy
    pub proxy_fallback: bool,
}

impl CrawlReport {
    pub fn new(mode: CrawlMode) -> Self {
        Self {
            mode,
            started_at: Utc::now(),
            finished_at: None,
            pages_visited: 0,
            pages_written: 0,
            pages_skipped: 0,
            lines_removed: 0,
            failures: Vec::new(),
            proxy_fallback: false,
        }
    }

    /// Marks the traversal as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Duration in seconds, if finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Prints a report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Overview:");
    println!("  Mode: {}", report.mode);
    println!("  Started: {}", report.started_at.to_rfc3339());
    if let Some(seconds) = report.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    if report.proxy_fallback {
        println!("  Proxy: abandoned after tunnel failure, finished without proxy");
    }
    println!();

    println!("Pages:");
    println!("  Visited: {}", report.pages_visited);
    println!("  Written: {}", report.pages_written);
    println!("  Skipped: {}", report.pages_skipped);
    println!("  Noise lines removed: {}", report.lines_removed);
    println!();

    if report.failures.is_empty() {
        println!("No failures.");
        return;
    }

    println!("Failures ({}):", report.failures.len());
    for failure in &report.failures {
        println!("  {} - {}", failure.url, failure.last_error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::normalize;

    #[test]
    fn test_new_report() {
        let report = CrawlReport::new(CrawlMode::LinkFollow);
        assert_eq!(report.pages_visited, 0);
        assert!(report.finished_at.is_none());
        assert!(report.duration_seconds().is_none());
        assert!(report.is_clean());
    }

    #[test]
    fn test_finish_sets_duration() {
        let mut report = CrawlReport::new(CrawlMode::ClickNavigate);
        report.finish();
        assert!(report.duration_seconds().unwrap() >= 0);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(CrawlMode::LinkFollow.to_string(), "link-follow");
        assert_eq!(CrawlMode::ClickNavigate.to_string(), "click-navigate");
    }

    #[test]
    fn test_print_report_with_failures() {
        let mut report = CrawlReport::new(CrawlMode::LinkFollow);
        report.failures.push(FailureRecord {
            url: normalize("https://x.dev/docs/a").unwrap(),
            last_error: "HTTP 404".to_string(),
        });
        report.finish();

        assert!(!report.is_clean());
        print_report(&report);
    }
}
