use crate::url::domain::extract_domain;
use crate::UrlError;
use std::fmt;
use url::Url;

/// A visited URL in canonical form
///
/// `absolute` always carries the `https` scheme when the input was plain
/// `http`, and `domain` is the lowercase host without a leading `www.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalUri {
    /// Absolute URL to navigate to
    pub absolute: Url,

    /// Canonical bare host used for relevance comparisons
    pub domain: String,
}

impl CanonicalUri {
    /// The absolute URL as a string
    pub fn as_str(&self) -> &str {
        self.absolute.as_str()
    }
}

impl fmt::Display for CanonicalUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.absolute.as_str())
    }
}

/// Normalizes a raw domain or URL string into a [`CanonicalUri`]
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Default the scheme to `http://` when the input has none
/// 3. Parse; reject if malformed or not an HTTP(S) URL
/// 4. Upgrade `http` to `https`, keeping everything after the scheme
/// 5. Derive the canonical domain (lowercase host, one `www.` removed)
///
/// # Arguments
///
/// * `raw` - A bare host, a full URL, or a host followed by a path
///
/// # Returns
///
/// * `Ok(CanonicalUri)` - The absolute URI and canonical domain
/// * `Err(UrlError)` - The input cannot be turned into a URI
///
/// # Examples
///
/// ```
/// use mailsweep::url::normalize_uri;
///
/// let uri = normalize_uri("http://www.Example.com/page").unwrap();
/// assert_eq!(uri.as_str(), "https://www.example.com/page");
/// assert_eq!(uri.domain, "example.com");
/// ```
pub fn normalize_uri(raw: &str) -> Result<CanonicalUri, UrlError> {
    let trimmed = raw.trim();

    let with_scheme = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let mut url = Url::parse(&with_scheme).map_err(|source| UrlError::Parse {
        input: trimmed.to_string(),
        source,
    })?;

    match url.scheme() {
        "https" => {}
        "http" => url
            .set_scheme("https")
            .map_err(|_| UrlError::Malformed(format!("Cannot upgrade scheme of {}", url)))?,
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    let domain = extract_domain(&url).ok_or_else(|| UrlError::MissingDomain(url.to_string()))?;

    if domain.is_empty() {
        return Err(UrlError::MissingDomain(url.to_string()));
    }

    Ok(CanonicalUri {
        absolute: url,
        domain,
    })
}

/// Returns true if `input` starts with `scheme://`
///
/// A scheme is an ASCII letter followed by letters, digits, `+`, `-` or `.`.
/// A `://` later in the input (a query parameter holding a URL, say) does
/// not count.
fn has_scheme(input: &str) -> bool {
    let Some((scheme, _)) = input.split_once("://") else {
        return false;
    };

    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}
