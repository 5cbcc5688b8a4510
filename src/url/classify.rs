use url::Url;

/// Extracts the host of a URL, lowercased
///
/// Only the host component participates in internal/external classification;
/// scheme, port, and path are ignored.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitegauge::url::host_of;
///
/// let url = Url::parse("https://Example.COM/path").unwrap();
/// assert_eq!(host_of(&url), Some("example.com".to_string()));
/// ```
pub fn host_of(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true when `url` belongs to the crawled site
///
/// A page is internal when its host matches the base host, case-insensitively.
/// A URL with no host (which cannot happen for the http(s) URLs the
/// normalizer produces) is treated as external.
pub fn is_internal(base_host: &str, url: &Url) -> bool {
    match host_of(url) {
        Some(host) => host == base_host.to_lowercase(),
        None => false,
    }
}

/// Path-segment depth of a URL
///
/// Counts the non-empty path segments, which is the original crawler's
/// `Segments.Length - 1`: `/` is 0, `/a/` is 1, `/a/b.html` is 2. This is a
/// heuristic proxy for link depth, not hop count from the base, and the crawl
/// size observably depends on it staying this way.
pub fn path_depth(url: &Url) -> usize {
    url.path().split('/').filter(|s| !s.is_empty()).count()
}
