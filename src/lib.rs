//! Mailsweep: bulk contact email discovery
//!
//! This crate renders each site of a domain batch, scans page text and link
//! targets for email addresses, and ranks what it finds by relevance to the
//! domain being crawled.

pub mod config;
pub mod crawler;
pub mod email;
pub mod output;
pub mod renderer;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Mailsweep operations
#[derive(Debug, Error)]
pub enum MailsweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Malformed URI: {0}")]
    Url(#[from] UrlError),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out after {timeout_ms}ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    #[error("Renderer error: {0}")]
    Renderer(String),

    #[error("Page renderer could not be started: {0}")]
    EngineStart(String),

    #[error("Crawl failed: {0}")]
    CrawlFailure(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL '{input}': {source}")]
    Parse {
        input: String,
        source: ::url::ParseError,
    },

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingDomain(String),

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Mailsweep operations
pub type Result<T> = std::result::Result<T, MailsweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_batch, search, BatchReport, CrawlErrorRecord, CrawlOutcome};
pub use email::{rank_emails, EmailRank};
pub use renderer::{PageRenderer, RenderedPage};
pub use state::CrawlState;
pub use crate::url::{normalize_uri, CanonicalUri};
