//! Configuration module for Sumi-Scribe
//!
//! This module merges an optional TOML settings file with command-line overrides
//! into one validated [`Config`].
//!
//! # Example
//!
//! ```no_run
//! use sumi_scribe::config::{build_config, load_settings, Overrides};
//! use std::path::Path;
//!
//! let settings = load_settings(Path::new("scribe.toml")).unwrap();
//! let config = build_config("https://example.com/docs", "out", settings, Overrides::default()).unwrap();
//! println!("Scraping with {} attempts per page", config.crawl.retries);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserSettings, Config, CrawlSettings, FileSettings, ModeSettings, NavigationSettings,
    ProxyConfig, ProxyCredentials, ProxyKind, ProxySettings, SanitizerSettings,
};

// Re-export parser functions
pub use parser::{
    build_config, compute_settings_hash, load_settings, load_settings_with_hash, parse_proxy,
    Overrides,
};
