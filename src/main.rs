//! Sumi-Scribe main entry point
//!
//! This is the command-line interface for the Sumi-Scribe documentation scraper.

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use sumi_scribe::config::{build_config, load_settings_with_hash, FileSettings, Overrides, ProxyKind};
use sumi_scribe::crawler::crawl;
use sumi_scribe::output::print_report;
use tracing_subscriber::EnvFilter;

/// Sumi-Scribe: a patient documentation scribe
///
/// Sumi-Scribe crawls a documentation site, by following links or by clicking
/// through its navigation sidebar, and writes one cleaned Markdown file per
/// page into the output directory.
#[derive(Parser, Debug)]
#[command(name = "sumi-scribe")]
#[command(version = "1.0.0")]
#[command(about = "A patient documentation scribe", long_about = None)]
struct Cli {
    /// Base URL; only pages under its path are crawled
    #[arg(value_name = "URL")]
    url: String,

    /// Directory receiving one Markdown file per page
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Run without a visible window (--headless=false to show it)
    #[arg(long, value_name = "BOOL", action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    headless: Option<bool>,

    /// Attempts per page before it is logged as failed
    #[arg(long, value_name = "N")]
    retries: Option<u32>,

    /// Delay between attempts in milliseconds
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Navigation timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Wait after each load before reading the page, in milliseconds
    #[arg(long, value_name = "MS")]
    settle: Option<u64>,

    /// Proxy as ip:port or user:pass@ip:port
    #[arg(long, value_name = "PROXY")]
    proxy: Option<String>,

    /// Proxy protocol (http, socks4, socks5)
    #[arg(long, value_name = "TYPE")]
    proxy_type: Option<ProxyKind>,

    /// Do not overwrite pages that already exist in the output directory
    #[arg(long)]
    skip_existing: bool,

    /// Only retry the URLs logged as failed by the previous run
    #[arg(long)]
    retry_failed: bool,

    /// Crawl by clicking through the navigation sidebar
    #[arg(long)]
    click_nav: bool,

    /// Selector of the sidebar links used by --click-nav
    #[arg(long, value_name = "CSS")]
    nav_selector: Option<String>,

    /// Path to a TOML settings file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let settings = match &cli.config {
        Some(path) => {
            tracing::info!("Loading settings from: {}", path.display());
            let (settings, hash) = load_settings_with_hash(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?;
            tracing::info!("Settings loaded successfully (hash: {})", hash);
            settings
        }
        None => FileSettings::default(),
    };

    let overrides = Overrides {
        headless: cli.headless,
        retries: cli.retries,
        delay_ms: cli.delay,
        timeout_ms: cli.timeout,
        settle_ms: cli.settle,
        proxy: cli.proxy,
        proxy_type: cli.proxy_type,
        nav_selector: cli.nav_selector,
        skip_existing: cli.skip_existing,
        retry_failed: cli.retry_failed,
        click_nav: cli.click_nav,
    };

    let config = build_config(&cli.url, &cli.output_dir, settings, overrides)
        .context("Invalid configuration")?;

    tracing::info!(
        "Scraping {} into {} ({})",
        config.base_url,
        config.output_dir.display(),
        if config.mode.click_nav { "click-navigation" } else { "link-following" }
    );
    tracing::debug!(
        "Retries: {}, delay: {}ms, timeout: {}ms, settle: {}ms",
        config.crawl.retries,
        config.crawl.delay_ms,
        config.crawl.timeout_ms,
        config.crawl.settle_ms
    );

    // Run the crawler
    match crawl(&config).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            if !cli.quiet {
                print_report(&report);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e).context("Crawl aborted")
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_scribe=info,warn"),
            1 => EnvFilter::new("sumi_scribe=debug,info"),
            2 => EnvFilter::new("sumi_scribe=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
