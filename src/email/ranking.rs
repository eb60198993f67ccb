//! Ranking and de-duplication of discovered emails

use std::collections::HashSet;

/// Relevance class of an email for one crawled domain
///
/// Variants are ordered: `Primary` sorts before `Secondary` before `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EmailRank {
    /// Address ends with the crawled domain
    Primary,
    /// Address ends with a generic provider suffix
    Secondary,
    /// Anything else
    Other,
}

impl EmailRank {
    /// Classifies `email` for `domain`
    ///
    /// Suffix checks are case-insensitive; the email itself is never rewritten.
    pub fn classify(email: &str, domain: &str, secondary_suffixes: &[String]) -> Self {
        let email = email.to_lowercase();

        if !domain.is_empty() && email.ends_with(&domain.to_lowercase()) {
            EmailRank::Primary
        } else if secondary_suffixes
            .iter()
            .any(|suffix| email.ends_with(&suffix.to_lowercase()))
        {
            EmailRank::Secondary
        } else {
            EmailRank::Other
        }
    }

    /// Sort weight of the class: -100, -10 or 0
    pub fn weight(&self) -> i32 {
        match self {
            EmailRank::Primary => -100,
            EmailRank::Secondary => -10,
            EmailRank::Other => 0,
        }
    }
}

/// Merges the emails of one page visit into the running list for a domain
///
/// The union is built in the order: text emails, link-target emails, then
/// previously accumulated emails. Exact duplicates are removed (first
/// occurrence wins) and the result is stably sorted by [`EmailRank`], so
/// emails of the same class keep that order.
pub fn rank_emails(
    text_emails: Vec<String>,
    link_emails: Vec<String>,
    accumulated: Vec<String>,
    domain: &str,
    secondary_suffixes: &[String],
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut merged: Vec<String> = text_emails
        .into_iter()
        .chain(link_emails)
        .chain(accumulated)
        .filter(|email| seen.insert(email.clone()))
        .collect();

    merged.sort_by_key(|email| EmailRank::classify(email, domain, secondary_suffixes).weight());
    merged
}

/// Returns true if the ranked list starts with a primary email
pub fn has_primary(ranked: &[String], domain: &str) -> bool {
    ranked
        .first()
        .map(|email| EmailRank::classify(email, domain, &[]) == EmailRank::Primary)
        .unwrap_or(false)
}
