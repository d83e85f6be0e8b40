//! Sumi-Scribe: a patient documentation scribe
//!
//! This crate crawls a documentation site, either by following hyperlinks or by
//! clicking through a script-driven sidebar, converts every page to Markdown,
//! filters script and style noise out of the result and writes one document per
//! page. Transient render failures are retried in place, and a failing proxy
//! tunnel restarts the whole session once without the proxy.

pub mod config;
pub mod crawler;
pub mod output;
pub mod proxy_check;
pub mod render;
pub mod sanitize;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Scribe operations
#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Proxy tunnel failed while loading {url}: {message}")]
    Tunnel { url: String, message: String },

    #[error("Renderer crashed while loading {url}: {message}")]
    RenderCrash { url: String, message: String },

    #[error("Renderer error: {0}")]
    Render(#[from] render::RenderError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScribeError {
    /// Returns true if this error should trigger a session restart without the proxy
    pub fn is_tunnel(&self) -> bool {
        matches!(self, Self::Tunnel { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid proxy: {0}")]
    InvalidProxy(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Sumi-Scribe operations
pub type Result<T> = std::result::Result<T, ScribeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlReport};
pub use sanitize::{sanitize, Sanitizer};
pub use url::{normalize, slug, NormalizedUrl, Scope, Slug};
