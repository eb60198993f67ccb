use url::Url;

/// Extracts the canonical domain from a URL
///
/// The host is lowercased by the URL parser; a single leading `www.` label
/// is removed. Returns `None` for URLs without a host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use mailsweep::url::extract_domain;
///
/// let url = Url::parse("https://www.example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://shop.example.com/").unwrap();
/// assert_eq!(extract_domain(&url), Some("shop.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(strip_www)
}

/// Removes exactly one leading `www.` prefix from a host
pub fn strip_www(host: &str) -> String {
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// Compares two canonical domains case-insensitively
pub fn same_domain(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
