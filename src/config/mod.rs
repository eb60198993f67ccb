//! Configuration module for Mailsweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so a missing file or an empty table is valid.
//!
//! # Example
//!
//! ```no_run
//! use mailsweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mailsweep.toml")).unwrap();
//! println!("Concurrent domains: {}", config.crawler.max_concurrent_domains);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, CrawlerConfig, OutputConfig, RankingConfig, DEFAULT_CONTACT_KEYWORDS,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
