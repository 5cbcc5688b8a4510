//! Sitegauge: a single-site SEO crawler
//!
//! Starting from one base address, sitegauge discovers and fetches every
//! reachable internal page up to a depth limit, records per-page SEO
//! diagnostics (titles, headings, meta descriptions, byte sizes), and
//! aggregates inbound-link counts across the whole site.

pub mod config;
pub mod crawler;
pub mod inlinks;
pub mod output;
pub mod status;
pub mod store;
pub mod url;

use thiserror::Error;

/// Main error type for sitegauge operations
#[derive(Debug, Error)]
pub enum GaugeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export error: {0}")]
    Export(String),
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
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for sitegauge operations
pub type Result<T> = std::result::Result<T, GaugeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlEngine, CrawlReport};
pub use status::{LogReporter, ProblemKind, StatusReporter};
pub use url::{host_of, is_internal, normalize_link, path_depth};
