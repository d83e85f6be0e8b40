use crate::url::NormalizedUrl;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Resolved configuration for one crawl, passed once into the traversal driver
#[derive(Debug, Clone)]
pub struct Config {
    /// Normalized base URL; also defines the crawl scope
    pub base_url: NormalizedUrl,

    /// Directory receiving one `<slug>.md` file per page
    pub output_dir: PathBuf,

    pub crawl: CrawlSettings,
    pub browser: BrowserSettings,
    pub navigation: NavigationSettings,
    pub sanitizer: SanitizerSettings,

    /// Proxy used by the first session, if any
    pub proxy: Option<ProxyConfig>,

    /// Which traversal strategy to run and how it seeds and persists
    pub mode: ModeSettings,
}

/// Settings file layout (every section and key is optional)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub crawl: CrawlSettings,
    pub browser: BrowserSettings,
    pub navigation: NavigationSettings,
    pub sanitizer: SanitizerSettings,
    pub proxy: Option<ProxySettings>,
}

/// Fetch and retry behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlSettings {
    /// Attempts per URL before it is recorded as failed
    pub retries: u32,

    /// Fixed delay between attempts (milliseconds)
    pub delay_ms: u64,

    /// Navigation timeout (milliseconds)
    pub timeout_ms: u64,

    /// Wait after a page loads before reading it (milliseconds)
    pub settle_ms: u64,

    /// Raw HTML shorter than this counts as a failed render
    pub min_content_length: usize,

    /// Selector that must be present after a direct load
    pub ready_selector: String,

    /// Selector that must be present after a click
    pub click_ready_selector: String,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            retries: 3,
            delay_ms: 2000,
            timeout_ms: 30_000,
            settle_ms: 3000,
            min_content_length: 1000,
            ready_selector: "body".to_string(),
            click_ready_selector: "main, .content, article".to_string(),
        }
    }
}

impl CrawlSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Rendering session settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BrowserSettings {
    pub headless: bool,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_0) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120 Safari/537.36"
                .to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

/// Sidebar navigation settings for click-navigation
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NavigationSettings {
    pub nav_selector: String,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            nav_selector: ".sidebar a".to_string(),
        }
    }
}

/// Thresholds for the line filter
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SanitizerSettings {
    /// Lines longer than this (in characters) are treated as noise
    pub max_line_length: usize,

    /// Lines whose share of symbol characters exceeds this are treated as noise
    pub max_symbol_ratio: f64,
}

impl Default for SanitizerSettings {
    fn default() -> Self {
        Self {
            max_line_length: 200,
            max_symbol_ratio: 0.5,
        }
    }
}

/// Proxy section of the settings file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProxySettings {
    /// `ip:port` or `user:pass@ip:port`
    pub address: String,

    #[serde(default)]
    pub kind: ProxyKind,
}

/// Traversal mode flags
#[derive(Debug, Clone, Default)]
pub struct ModeSettings {
    /// Keep documents that already exist on disk
    pub skip_existing: bool,

    /// Seed from the failure list of the previous run
    pub retry_failed: bool,

    /// Use click-navigation instead of link-following
    pub click_nav: bool,
}

/// Proxy protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyKind {
    #[default]
    Http,
    Socks4,
    Socks5,
}

impl ProxyKind {
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Socks4 => "socks4",
            Self::Socks5 => "socks5",
        }
    }
}

impl fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

impl std::str::FromStr for ProxyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "socks4" => Ok(Self::Socks4),
            "socks5" => Ok(Self::Socks5),
            other => Err(format!(
                "unknown proxy type '{}' (expected http, socks4 or socks5)",
                other
            )),
        }
    }
}

/// A single outbound proxy with optional credentials
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub kind: ProxyKind,

    /// `host:port`
    pub host: String,

    pub credentials: Option<ProxyCredentials>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct ProxyCredentials {
    pub username: String,
    pub password: String,
}

impl ProxyConfig {
    /// Proxy URL without credentials, e.g. `socks5://10.0.0.1:1080`
    pub fn url(&self) -> String {
        format!("{}://{}", self.kind, self.host)
    }
}

// Credentials never reach the logs
impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("kind", &self.kind)
            .field("host", &self.host)
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}

impl fmt::Debug for ProxyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
