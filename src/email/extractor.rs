//! Email address extraction
//!
//! Scans rendered text and link targets for addresses matching the RFC 5322
//! addr-spec grammar (dot-atom or quoted local part, hostname or bracketed
//! IPv4 literal domain). Whitespace around the `@` is tolerated because
//! rendered pages often break addresses that way.

use once_cell::sync::Lazy;
use regex::Regex;

const EMAIL_PATTERN: &str = r##"(?i)(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")\s*@\s*(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9]|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])"##;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"));

/// Returns the first email-shaped substring of `item`, trimmed
///
/// Returns `None` when nothing matches or the match is blank after trimming.
pub fn first_email(item: &str) -> Option<String> {
    EMAIL_REGEX
        .find(item)
        .map(|m| m.as_str().trim().to_string())
        .filter(|email| !email.is_empty())
}

/// Extracts distinct emails from a sequence of items
///
/// Each item contributes at most its first match. Discovery order is kept
/// and repeated addresses are dropped.
pub fn extract_emails<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut found: Vec<String> = Vec::new();

    for item in items {
        if let Some(email) = first_email(item.as_ref()) {
            if !found.contains(&email) {
                found.push(email);
            }
        }
    }

    found
}

/// Extracts distinct emails from a block of rendered page text
///
/// Every line of the text is treated as one item.
pub fn extract_from_text(text: &str) -> Vec<String> {
    extract_emails(text.lines())
}
