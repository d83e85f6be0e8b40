//! Re-sanitizes Markdown files already written by Sumi-Scribe

use anyhow::{ensure, Context};
use clap::Parser;
use std::path::PathBuf;
use sumi_scribe::sanitize::{sanitize_directory, Sanitizer};
use tracing_subscriber::EnvFilter;

/// Removes script and style noise from existing Markdown output
#[derive(Parser, Debug)]
#[command(name = "sanitize-docs")]
#[command(version = "1.0.0")]
#[command(about = "Re-sanitize scraped Markdown files", long_about = None)]
struct Cli {
    /// Directory to scan for .md files
    #[arg(short, long, value_name = "DIR")]
    path: PathBuf,

    /// Preview changes without overwriting files
    #[arg(long)]
    dry_run: bool,

    /// Show cleaned files and line removals
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("sumi_scribe=trace,info")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    ensure!(cli.path.is_dir(), "{} is not a directory", cli.path.display());

    let summary = sanitize_directory(&cli.path, &Sanitizer::default(), cli.dry_run)
        .with_context(|| format!("Failed to sanitize {}", cli.path.display()))?;

    println!(
        "Sanitized {} of {} markdown file(s) in {} ({} line(s) removed){}",
        summary.files_changed,
        summary.files_scanned,
        cli.path.display(),
        summary.lines_removed,
        if cli.dry_run { " (dry-run)" } else { "" }
    );

    Ok(())
}
