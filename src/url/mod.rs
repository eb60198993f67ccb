//! URL handling module for Mailsweep
//!
//! Turns raw domain input and link targets into canonical URIs and compares
//! canonical domains.

mod domain;
mod normalize;

pub use domain::{extract_domain, same_domain, strip_www};
pub use normalize::{normalize_uri, CanonicalUri};
