use url::Url;

/// Resolves a raw hyperlink string into a canonical absolute URL
///
/// `base` is the crawl's base URL (supplies the scheme and host for
/// root-relative links), `raw` is the href exactly as it appeared in the
/// page, and `source_page` is the absolute address of the page the link was
/// found on (supplies the directory for document-relative links).
///
/// The rules are applied in order, and the order matters: the absolute-prefix
/// check must run before the relative-well-formedness check, and the
/// bare-host heuristic must run before document-relative resolution since the
/// two forms look alike.
///
/// 1. Empty input resolves to nothing.
/// 2. An `http://` / `https://` prefix means the address is already complete.
/// 3. Anything else must be a plausible relative reference; fragment-only
///    (`#section`), scheme-carrying (`tel:...`, `mailto:...`), and otherwise
///    ill-formed strings resolve to nothing.
/// 4. `//host/path` becomes `http://host/path`.
/// 5. `/path` is attached to the base URL's scheme and host.
/// 6. `host.tld/path` (a dot in the segment before the first slash) becomes
///    `http://host.tld/path`.
/// 7. Everything else is document-relative: appended to `source_page` up to
///    and including its last `/`.
///
/// The result must parse as an absolute http(s) URL or the link is discarded.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitegauge::url::normalize_link;
///
/// let base = Url::parse("http://root.com/").unwrap();
/// let resolved =
///     normalize_link(&base, "abc.png", "http://root.com/xyz/aaa/index.html").unwrap();
/// assert_eq!(resolved.as_str(), "http://root.com/xyz/aaa/abc.png");
///
/// assert!(normalize_link(&base, "#section2", "http://root.com/").is_none());
/// ```
pub fn normalize_link(base: &Url, raw: &str, source_page: &str) -> Option<Url> {
    if raw.is_empty() {
        return None;
    }

    let candidate = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        if !is_plausible_relative(raw) {
            return None;
        }

        if let Some(rest) = raw.strip_prefix("//") {
            format!("http://{}", rest)
        } else if raw.starts_with('/') {
            format!("{}://{}{}", base.scheme(), authority_of(base)?, raw)
        } else if leading_segment_has_dot(raw) {
            format!("http://{}", raw)
        } else {
            let dir_end = source_page.rfind('/')? + 1;
            format!("{}{}", &source_page[..dir_end], raw)
        }
    };

    // Final gate: whatever was assembled has to be a proper absolute URL.
    let resolved = Url::parse(&candidate).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

/// Host plus port when one is present, e.g. `127.0.0.1:8080`
fn authority_of(base: &Url) -> Option<String> {
    let host = base.host_str()?;
    match base.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}

/// Checks whether a non-absolute href is usable as a relative reference
///
/// Rejects fragment-only anchors, hrefs carrying a scheme of their own
/// (`tel:`, `mailto:`, `javascript:`, ...), and strings with characters that
/// cannot appear in a well-formed reference.
fn is_plausible_relative(raw: &str) -> bool {
    if raw.starts_with('#') {
        return false;
    }

    if has_scheme_prefix(raw) {
        return false;
    }

    !raw.chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '<' | '>' | '"' | '`'))
}

/// True when the string opens with `scheme:` before any `/`, `?`, or `#`
fn has_scheme_prefix(raw: &str) -> bool {
    let colon = match raw.find(':') {
        Some(i) => i,
        None => return false,
    };

    if raw[..colon]
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .is_some()
    {
        return false;
    }

    let prefix = &raw[..colon];
    let mut chars = prefix.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// The bare-host heuristic: `example.com/x` but not `abc.png`
///
/// Only hrefs that contain a slash qualify; a lone `abc.png` is a
/// document-relative file name, not a host.
fn leading_segment_has_dot(raw: &str) -> bool {
    match raw.split_once('/') {
        Some((first, _)) => first.contains('.'),
        None => false,
    }
}
