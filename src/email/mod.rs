//! Email extraction and ranking

mod extractor;
mod ranking;

pub use extractor::{extract_emails, extract_from_text, first_email};
pub use ranking::{has_primary, rank_emails, EmailRank};
