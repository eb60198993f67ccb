//! State module for tracking per-domain crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the stage a domain crawl task is in (start, home page,
//!   contact links, done, errored)

mod crawl_state;

pub use crawl_state::CrawlState;
