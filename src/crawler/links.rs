//! Link enumeration and the contact-link heuristic
//!
//! Link targets are read from the renderer one anchor at a time. The guard
//! against pathological pages and the per-anchor timeout live here so every
//! renderer behaves the same way.

use crate::config::CrawlerConfig;
use crate::renderer::RenderedPage;
use crate::url::{normalize_uri, same_domain, CanonicalUri};
use crate::Result;

/// Schemes that never lead to a crawlable page
const NON_PAGE_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:", "data:"];

/// Reads the lowercased targets of all visible anchors on the current page
///
/// # Rules
///
/// - More than `max_visible_links` anchors: the page yields a single empty
///   target instead of its links
/// - A target that cannot be read within `link_read_timeout`, or fails to
///   read, becomes an empty string
/// - Missing `href` attributes become empty strings
/// - Duplicate targets are kept once, in first-seen order
pub async fn visible_link_targets(
    page: &mut dyn RenderedPage,
    config: &CrawlerConfig,
) -> Result<Vec<String>> {
    let count = page.visible_link_count().await?;

    if count > config.max_visible_links {
        tracing::debug!(
            "Ignoring {} visible links (limit {})",
            count,
            config.max_visible_links
        );
        return Ok(vec![String::new()]);
    }

    let read_timeout = config.link_read_timeout();
    let mut targets: Vec<String> = Vec::with_capacity(count);

    for index in 0..count {
        let target = match tokio::time::timeout(read_timeout, page.link_target(index)).await {
            Ok(Ok(target)) => target.map(|t| t.to_lowercase()).unwrap_or_default(),
            Ok(Err(e)) => {
                tracing::trace!("Failed to read link {}: {}", index, e);
                String::new()
            }
            Err(_) => {
                tracing::trace!(
                    "Reading link {} timed out after {:?}",
                    index,
                    read_timeout
                );
                String::new()
            }
        };

        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    Ok(targets)
}

/// Returns true if the target contains any of the contact keywords
pub fn is_contact_like(target: &str, keywords: &[String]) -> bool {
    let target = target.to_lowercase();
    keywords
        .iter()
        .any(|keyword| target.contains(&keyword.to_lowercase()))
}

/// Appends a relative target to the home page URI
fn join_relative(base: &str, target: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        target.trim_start_matches('/')
    )
}

/// Resolves one contact-like target against the home page
///
/// Targets that mention the crawled domain are used as they are. Other
/// targets starting with `http` or `#` are external or in-page links and
/// are dropped; everything else is treated as a path under the home URI.
/// The candidate is kept only if its canonical domain equals the home
/// domain (case-insensitive).
pub fn resolve_contact_link(target: &str, home: &CanonicalUri) -> Option<CanonicalUri> {
    if NON_PAGE_SCHEMES
        .iter()
        .any(|scheme| target.starts_with(scheme))
    {
        return None;
    }

    let candidate = if target.contains(&home.domain) {
        target.to_string()
    } else if target.starts_with("http") || target.starts_with('#') {
        return None;
    } else {
        join_relative(home.as_str(), target)
    };

    match normalize_uri(&candidate) {
        Ok(uri) if same_domain(&uri.domain, &home.domain) => Some(uri),
        Ok(uri) => {
            tracing::trace!("Dropping off-domain link {} ({})", candidate, uri.domain);
            None
        }
        Err(e) => {
            tracing::trace!("Dropping unparsable link {}: {}", candidate, e);
            None
        }
    }
}

/// Selects the contact-like links of a page, resolved and in page order
///
/// Links resolving to the same URI are visited once.
pub fn contact_links(
    targets: &[String],
    home: &CanonicalUri,
    keywords: &[String],
) -> Vec<CanonicalUri> {
    let mut links: Vec<CanonicalUri> = Vec::new();

    for target in targets.iter().filter(|t| is_contact_like(t, keywords)) {
        if let Some(uri) = resolve_contact_link(target, home) {
            if !links.iter().any(|l| l.absolute == uri.absolute) {
                links.push(uri);
            }
        }
    }

    links
}
