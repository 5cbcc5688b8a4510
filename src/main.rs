//! Sitegauge main entry point
//!
//! Command-line interface for the sitegauge SEO crawler.

use anyhow::Context;
use clap::Parser;
use sitegauge::config::load_config_with_hash;
use sitegauge::crawler::CrawlEngine;
use sitegauge::output::{build_statistics, export_sqlite, print_statistics, write_markdown_summary};
use sitegauge::status::CountingReporter;
use sitegauge::url::host_of;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Sitegauge: a single-site SEO crawler
///
/// Crawls every internal page reachable from the base URL up to the
/// configured depth, records SEO diagnostics and inlink counts, and exports
/// the result table to SQLite plus a markdown summary.
#[derive(Parser, Debug)]
#[command(name = "sitegauge")]
#[command(version = "0.3.0")]
#[command(about = "A single-site SEO crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Base URL to crawl
    #[arg(value_name = "URL")]
    url: String,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    let base_url = Url::parse(&cli.url).with_context(|| format!("invalid base URL {}", cli.url))?;

    if cli.dry_run {
        handle_dry_run(&config, &base_url);
        return Ok(());
    }

    handle_crawl(config, config_hash, base_url).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitegauge=info,warn"),
            1 => EnvFilter::new("sitegauge=debug,info"),
            2 => EnvFilter::new("sitegauge=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &sitegauge::Config, base_url: &Url) {
    println!("=== Sitegauge Dry Run ===\n");

    println!("Base URL: {}", base_url);
    println!("Base host: {}", host_of(base_url).unwrap_or_default());

    println!("\nCrawler:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);

    println!("\nThresholds:");
    println!(
        "  Title chars: {}..{}",
        config.thresholds.title_char_min, config.thresholds.title_char_max
    );
    println!(
        "  Title pixels: {}..{}",
        config.thresholds.title_pixel_min, config.thresholds.title_pixel_max
    );
    println!(
        "  Description chars: {}..{}",
        config.thresholds.description_char_min, config.thresholds.description_char_max
    );
    println!(
        "  Description pixels: {}..{}",
        config.thresholds.description_pixel_min, config.thresholds.description_pixel_max
    );
    println!("  URL chars max: {}", config.thresholds.url_char_max);
    println!(
        "  H1/H2 chars max: {}/{}",
        config.thresholds.heading_one_char_max, config.thresholds.heading_two_char_max
    );
    println!("  Image size max: {} bytes", config.thresholds.image_size_max);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Summary: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
}

/// Runs the crawl and exports the results
async fn handle_crawl(
    config: sitegauge::Config,
    config_hash: String,
    base_url: Url,
) -> anyhow::Result<()> {
    let base_host = host_of(&base_url).unwrap_or_default();
    let database_path = PathBuf::from(&config.output.database_path);
    let summary_path = PathBuf::from(&config.output.summary_path);

    let reporter = Arc::new(CountingReporter::new());
    let engine = CrawlEngine::with_reporter(config, base_url.clone(), reporter.clone())?;

    // Ctrl-C stops new work; in-flight fetches drain naturally.
    let abort = engine.abort_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, aborting crawl");
            abort.abort();
        }
    });

    let started_at = chrono::Utc::now();
    let report = engine.run().await;

    export_sqlite(
        &database_path,
        &report,
        base_url.as_str(),
        &config_hash,
        started_at,
    )?;
    write_markdown_summary(&summary_path, &base_url, &report)?;

    let stats = build_statistics(&report, &base_host, &reporter);
    print_statistics(&stats);

    println!("\n✓ Results exported to: {}", database_path.display());
    println!("✓ Summary written to: {}", summary_path.display());

    Ok(())
}
