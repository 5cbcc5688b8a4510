//! Crawler module: fetching, extraction, scheduling, and orchestration

mod engine;
mod extractor;
mod fetcher;
mod scheduler;

pub use engine::{AbortHandle, CrawlEngine, CrawlReport, CrawlTarget};
pub use extractor::{estimate_pixel_width, extract_page, ExtractedPage};
pub use fetcher::{build_http_client, fetch_url, FetchOutcome};
pub use scheduler::Scheduler;

use crate::config::Config;
use crate::Result;
use url::Url;

/// Runs a complete crawl with the default `tracing` reporter
///
/// # Example
///
/// ```no_run
/// use sitegauge::config::load_config;
/// use sitegauge::crawler::crawl;
/// use std::path::Path;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("sitegauge.toml"))?;
/// let base = Url::parse("https://example.com/")?;
/// let report = crawl(config, base).await?;
/// println!("{} pages", report.pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config, base_url: Url) -> Result<CrawlReport> {
    let engine = CrawlEngine::new(config, base_url)?;
    Ok(engine.run().await)
}
