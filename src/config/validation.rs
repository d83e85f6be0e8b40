use crate::config::types::{Config, CrawlSettings, NavigationSettings, SanitizerSettings};
use crate::ConfigError;
use scraper::Selector;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_settings(&config.crawl)?;
    validate_navigation_settings(&config.navigation)?;
    validate_sanitizer_settings(&config.sanitizer)?;

    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates fetch and retry settings
fn validate_crawl_settings(crawl: &CrawlSettings) -> Result<(), ConfigError> {
    if crawl.retries < 1 || crawl.retries > 100 {
        return Err(ConfigError::Validation(format!(
            "retries must be between 1 and 100, got {}",
            crawl.retries
        )));
    }

    if crawl.timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 100ms, got {}ms",
            crawl.timeout_ms
        )));
    }

    validate_selector("ready-selector", &crawl.ready_selector)?;
    validate_selector("click-ready-selector", &crawl.click_ready_selector)?;

    Ok(())
}

fn validate_navigation_settings(navigation: &NavigationSettings) -> Result<(), ConfigError> {
    validate_selector("nav-selector", &navigation.nav_selector)
}

fn validate_sanitizer_settings(sanitizer: &SanitizerSettings) -> Result<(), ConfigError> {
    if sanitizer.max_line_length == 0 {
        return Err(ConfigError::Validation(
            "max-line-length must be > 0".to_string(),
        ));
    }

    if !(sanitizer.max_symbol_ratio > 0.0 && sanitizer.max_symbol_ratio <= 1.0) {
        return Err(ConfigError::Validation(format!(
            "max-symbol-ratio must be in (0, 1], got {}",
            sanitizer.max_symbol_ratio
        )));
    }

    Ok(())
}

/// Validates that a CSS selector is non-empty and parses
fn validate_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
    }

    Selector::parse(selector).map_err(|e| {
        ConfigError::Validation(format!("{} '{}' is not a valid selector: {:?}", name, selector, e))
    })?;

    Ok(())
}
