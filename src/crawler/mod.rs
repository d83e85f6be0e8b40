//! Crawler module for documentation traversal
//!
//! This module contains the core crawling logic, including:
//! - The frontier (work list, visited set, scope and dedup rules)
//! - Page loading with retry and tagged fetch outcomes
//! - Link-following and click-navigation strategies
//! - Session handling with a one-time proxy fallback

mod click_nav;
mod frontier;
mod link_follow;
mod outcome;
mod retry;
mod session;
mod step;
mod traversal;

#[cfg(test)]
mod testing;

pub use click_nav::click_navigate;
pub use frontier::{Frontier, FrontierEntry, VisitOrder};
pub use link_follow::link_follow;
pub use outcome::FetchOutcome;
pub use retry::{Attempt, FetchStep, RetryController};
pub use session::{crawl, run_with_fallback, traverse};
pub use step::{LoadAction, PageLoad};

pub use crate::output::CrawlReport;
