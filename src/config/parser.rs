use crate::config::types::{
    Config, FileSettings, ModeSettings, ProxyConfig, ProxyCredentials, ProxyKind,
};
use crate::config::validation::validate;
use crate::url::normalize;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Values given on the command line; each one wins over the settings file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub headless: Option<bool>,
    pub retries: Option<u32>,
    pub delay_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub settle_ms: Option<u64>,
    pub proxy: Option<String>,
    pub proxy_type: Option<ProxyKind>,
    pub nav_selector: Option<String>,
    pub skip_existing: bool,
    pub retry_failed: bool,
    pub click_nav: bool,
}

/// Loads and parses a settings file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Returns
///
/// * `Ok(FileSettings)` - Successfully loaded settings
/// * `Err(ConfigError)` - Failed to read or parse the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_scribe::config::load_settings;
///
/// let settings = load_settings(Path::new("scribe.toml")).unwrap();
/// println!("Retries: {}", settings.crawl.retries);
/// ```
pub fn load_settings(path: &Path) -> Result<FileSettings, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let settings: FileSettings = toml::from_str(&content)?;
    Ok(settings)
}

/// Computes a SHA-256 hash of the settings file content
///
/// Logged at startup so two runs can be matched to the same settings.
pub fn compute_settings_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a settings file and returns both the settings and its hash
pub fn load_settings_with_hash(path: &Path) -> Result<(FileSettings, String), ConfigError> {
    let settings = load_settings(path)?;
    let hash = compute_settings_hash(path)?;
    Ok((settings, hash))
}

/// Parses a proxy given as `ip:port` or `user:pass@ip:port`
///
/// # Example
///
/// ```
/// use sumi_scribe::config::{parse_proxy, ProxyKind};
///
/// let proxy = parse_proxy("alice:secret@10.0.0.1:8080", ProxyKind::Socks5).unwrap();
/// assert_eq!(proxy.url(), "socks5://10.0.0.1:8080");
/// assert!(proxy.credentials.is_some());
/// ```
pub fn parse_proxy(raw: &str, kind: ProxyKind) -> Result<ProxyConfig, ConfigError> {
    let raw = raw.trim();

    let (credentials, host) = match raw.rsplit_once('@') {
        Some((creds, host)) => {
            let (username, password) = creds.split_once(':').ok_or_else(|| {
                ConfigError::InvalidProxy("credentials must be given as user:pass".to_string())
            })?;
            if username.is_empty() {
                return Err(ConfigError::InvalidProxy(
                    "proxy username cannot be empty".to_string(),
                ));
            }
            let credentials = ProxyCredentials {
                username: username.to_string(),
                password: password.to_string(),
            };
            (Some(credentials), host)
        }
        None => (None, raw),
    };

    let (address, port) = host.rsplit_once(':').ok_or_else(|| {
        ConfigError::InvalidProxy(format!("'{}' must be given as ip:port", host))
    })?;

    if address.is_empty() {
        return Err(ConfigError::InvalidProxy(format!(
            "'{}' is missing a host",
            host
        )));
    }

    port.parse::<u16>()
        .map_err(|_| ConfigError::InvalidProxy(format!("invalid proxy port '{}'", port)))?;

    Ok(ProxyConfig {
        kind,
        host: host.to_string(),
        credentials,
    })
}

/// Builds the crawl configuration from positional arguments, file settings and overrides
///
/// # Arguments
///
/// * `url` - Base URL of the documentation site
/// * `output_dir` - Directory receiving the Markdown documents
/// * `settings` - Settings loaded from a file (or defaults)
/// * `overrides` - Command-line values
///
/// # Returns
///
/// * `Ok(Config)` - Merged and validated configuration
/// * `Err(ConfigError)` - Invalid URL, proxy or setting
pub fn build_config(
    url: &str,
    output_dir: impl Into<PathBuf>,
    settings: FileSettings,
    overrides: Overrides,
) -> Result<Config, ConfigError> {
    let base_url = normalize(url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base URL '{}': {}", url, e)))?;

    let FileSettings {
        mut crawl,
        mut browser,
        mut navigation,
        sanitizer,
        proxy: file_proxy,
    } = settings;

    if let Some(headless) = overrides.headless {
        browser.headless = headless;
    }
    if let Some(retries) = overrides.retries {
        crawl.retries = retries;
    }
    if let Some(delay_ms) = overrides.delay_ms {
        crawl.delay_ms = delay_ms;
    }
    if let Some(timeout_ms) = overrides.timeout_ms {
        crawl.timeout_ms = timeout_ms;
    }
    if let Some(settle_ms) = overrides.settle_ms {
        crawl.settle_ms = settle_ms;
    }
    if let Some(nav_selector) = overrides.nav_selector {
        navigation.nav_selector = nav_selector;
    }

    let proxy = match (overrides.proxy, file_proxy) {
        (Some(address), file) => {
            let kind = overrides
                .proxy_type
                .or(file.map(|p| p.kind))
                .unwrap_or_default();
            Some(parse_proxy(&address, kind)?)
        }
        (None, Some(file)) => {
            let kind = overrides.proxy_type.unwrap_or(file.kind);
            Some(parse_proxy(&file.address, kind)?)
        }
        (None, None) => None,
    };

    let config = Config {
        base_url,
        output_dir: output_dir.into(),
        crawl,
        browser,
        navigation,
        sanitizer,
        proxy,
        mode: ModeSettings {
            skip_existing: overrides.skip_existing,
            retry_failed: overrides.retry_failed,
            click_nav: overrides.click_nav,
        },
    };

    validate(&config)?;

    Ok(config)
}
