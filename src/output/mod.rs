//! Output module for crawl reports
//!
//! This module handles:
//! - Recording per-traversal counters and failures
//! - Printing the end-of-run summary

mod report;

pub use report::{print_report, CrawlMode, CrawlReport};
