//! Frontier for managing the crawl work list
//!
//! This module handles:
//! - Normalizing discovered links before they are queued
//! - Rejecting links outside the crawl scope
//! - Deduplicating on the normalized key, never on the raw string
//! - Visit order (depth-first or reading order)

use crate::url::{normalize, NormalizedUrl, Scope};
use crate::UrlResult;
use std::collections::{HashSet, VecDeque};

/// Order in which queued entries are popped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOrder {
    /// Most recently discovered first (depth-first bias)
    Lifo,
    /// Discovery order (sidebar reading order)
    Fifo,
}

/// A URL queued for visiting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The URL to visit
    pub url: NormalizedUrl,

    /// The page the link was found on, if any
    pub discovered_from: Option<NormalizedUrl>,
}

/// Work list plus visited set for one traversal
///
/// A URL is marked visited when it is popped, before any fetch is attempted,
/// so a URL whose fetch fails is never queued again.
pub struct Frontier {
    scope: Scope,
    order: VisitOrder,
    queue: VecDeque<FrontierEntry>,
    queued: HashSet<NormalizedUrl>,
    visited: HashSet<NormalizedUrl>,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `scope` - Links outside this scope are never queued
    /// * `order` - Pop order
    pub fn new(scope: Scope, order: VisitOrder) -> Self {
        Self {
            scope,
            order,
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
        }
    }

    /// Normalizes and queues a raw link
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The link was queued
    /// * `Ok(false)` - Already visited, already queued, or out of scope
    /// * `Err(UrlError)` - The link is not a valid HTTP(S) URL
    pub fn push(&mut self, raw: &str, discovered_from: Option<&NormalizedUrl>) -> UrlResult<bool> {
        let url = normalize(raw)?;

        if self.visited.contains(&url) || self.queued.contains(&url) {
            tracing::trace!("Already seen: {}", url);
            return Ok(false);
        }

        if !self.scope.contains(&url) {
            tracing::debug!("Out of scope: {}", url);
            return Ok(false);
        }

        self.queued.insert(url.clone());
        self.queue.push_back(FrontierEntry {
            url,
            discovered_from: discovered_from.cloned(),
        });

        Ok(true)
    }

    /// Takes the next entry and marks it visited
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        let entry = match self.order {
            VisitOrder::Lifo => self.queue.pop_back(),
            VisitOrder::Fifo => self.queue.pop_front(),
        }?;

        self.queued.remove(&entry.url);
        self.visited.insert(entry.url.clone());

        Some(entry)
    }

    /// Marks a URL visited without queueing it
    ///
    /// Used for pages fetched outside the frontier, such as the base page of a
    /// click-navigation walk. Returns false if the URL was already visited.
    pub fn mark_visited(&mut self, url: &NormalizedUrl) -> bool {
        if self.queued.remove(url) {
            self.queue.retain(|entry| &entry.url != url);
        }
        self.visited.insert(url.clone())
    }

    pub fn is_visited(&self, url: &NormalizedUrl) -> bool {
        self.visited.contains(url)
    }

    /// Number of queued entries
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of URLs popped so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}
