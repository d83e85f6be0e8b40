//! Finds working proxies for `sumi-scribe --proxy`

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use sumi_scribe::config::ProxyKind;
use sumi_scribe::proxy_check::{check_all, fetch_candidates, CheckSettings, DEFAULT_TEST_URL};
use tracing_subscriber::EnvFilter;

/// Checks proxy candidates from a plain-text API
#[derive(Parser, Debug)]
#[command(name = "check-proxies")]
#[command(version = "1.0.0")]
#[command(about = "Check and validate proxies from a live API", long_about = None)]
struct Cli {
    /// URL returning one ip:port (or user:pass@ip:port) per line
    #[arg(long, value_name = "URL")]
    api: String,

    /// Proxy protocol of the candidates (http, socks4, socks5)
    #[arg(long, value_name = "TYPE", default_value = "http")]
    proxy_type: ProxyKind,

    /// Maximum number of candidates to check
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Write working proxies to this file, one per line
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Endpoint requested through each candidate
    #[arg(long, value_name = "URL", default_value = DEFAULT_TEST_URL)]
    test_url: String,

    /// Per-candidate timeout in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 5000)]
    timeout: u64,

    /// Candidates checked at once
    #[arg(long, value_name = "N", default_value_t = 10)]
    concurrency: usize,

    /// Show the result for each candidate
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("sumi_scribe=debug,info")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let candidates = fetch_candidates(&cli.api, cli.limit)
        .await
        .context("Failed to fetch proxy candidates")?;
    println!("Validating {} {} proxies...", candidates.len(), cli.proxy_type);

    let settings = CheckSettings {
        kind: cli.proxy_type,
        test_url: cli.test_url,
        timeout: Duration::from_millis(cli.timeout),
        concurrency: cli.concurrency,
    };
    let working = check_all(candidates, &settings).await;
    println!("{} working proxies found", working.len());

    if let Some(path) = &cli.save {
        let content: String = working
            .iter()
            .map(|proxy| format!("{}\n", proxy.candidate))
            .collect();
        std::fs::write(path, content)
            .with_context(|| format!("Failed to save proxies to {}", path.display()))?;
        println!("Saved to {}", path.display());
    }

    Ok(())
}
