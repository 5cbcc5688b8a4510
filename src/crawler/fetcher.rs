//! HTTP fetcher
//!
//! One GET per URL, no retries: a failed fetch is terminal for that URL in
//! this crawl. The interesting part is outcome classification: every way a
//! fetch can go wrong maps to a status the result table can show, and none
//! of them is allowed to take the crawl down.

use crate::config::UserAgentConfig;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// Page fetched; body and metadata available
    Success {
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Body size in bytes
        byte_size: u64,
        /// Page body, lossily decoded for HTML parsing
        body: String,
    },

    /// HTTP 404, tracked separately from other HTTP errors
    NotFound,

    /// Any other HTTP error with a known status code
    HttpError { status_code: u16 },

    /// The URL could not be used to build a request
    MalformedUrl,

    /// Connection, DNS, or timeout failure with no HTTP status
    TransportError,

    /// Anything else; logged and swallowed
    Unclassified { message: String },
}

impl FetchOutcome {
    /// The status label written into the page's result row
    pub fn status_label(&self) -> String {
        match self {
            Self::Success { status_code, .. } => status_code.to_string(),
            Self::NotFound => "404".to_string(),
            Self::HttpError { status_code } => status_code.to_string(),
            Self::MalformedUrl => "Malformed".to_string(),
            Self::TransportError => "Undefined".to_string(),
            Self::Unclassified { .. } => String::new(),
        }
    }
}

/// Builds the HTTP client shared by all fetch tasks
///
/// User agent format: `CrawlerName/Version (+ContactURL; ContactEmail)`.
/// Redirects are followed with reqwest's default policy; both http and https
/// are accepted since the sites being audited are not always on TLS.
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs one GET and classifies the outcome
///
/// Classification order: malformed URL first, then HTTP 404, then other
/// errors carrying a status code, then transport failures without one, then
/// whatever remains (logged, swallowed).
pub async fn fetch_url(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(url, e),
    };

    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return FetchOutcome::NotFound;
    }

    if !status.is_success() {
        return FetchOutcome::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    match response.bytes().await {
        Ok(bytes) => FetchOutcome::Success {
            status_code: status.as_u16(),
            content_type,
            byte_size: bytes.len() as u64,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        },
        Err(e) => classify_error(url, e),
    }
}

fn classify_error(url: &str, e: reqwest::Error) -> FetchOutcome {
    if e.is_builder() {
        tracing::debug!(url, "malformed URL");
        return FetchOutcome::MalformedUrl;
    }

    if let Some(status) = e.status() {
        if status == StatusCode::NOT_FOUND {
            return FetchOutcome::NotFound;
        }
        return FetchOutcome::HttpError {
            status_code: status.as_u16(),
        };
    }

    if e.is_timeout() || e.is_connect() {
        tracing::debug!(url, error = %e, "transport failure");
        return FetchOutcome::TransportError;
    }

    tracing::warn!(url, error = %e, "unclassified fetch failure");
    FetchOutcome::Unclassified {
        message: e.to_string(),
    }
}
