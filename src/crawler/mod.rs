//! Crawler module for email discovery
//!
//! This module contains the crawling logic, including:
//! - Link enumeration and the contact-link heuristic
//! - The per-domain crawl task
//! - Batch orchestration with bounded concurrency and progress reporting

mod links;
mod orchestrator;
mod task;

pub use links::{contact_links, is_contact_like, resolve_contact_link, visible_link_targets};
pub use orchestrator::{run_batch, BatchReport};
pub use task::{crawl_domain, CrawlErrorRecord, CrawlOutcome};

use crate::config::Config;
use crate::renderer::WebDriverRenderer;
use crate::Result;
use std::sync::Arc;

/// Finds contact emails for a batch of domains using a WebDriver browser
///
/// This is the main entry point. It will:
/// 1. Start the WebDriver renderer (the only failure that aborts the batch)
/// 2. Crawl every domain, reporting progress once per domain
/// 3. Write the log artifact
/// 4. Return one formatted line per input domain
///
/// # Arguments
///
/// * `domains` - Raw domain inputs, blank entries allowed
/// * `config` - The crawler configuration
/// * `progress` - Called with the completed fraction after each domain
///
/// # Returns
///
/// * `Ok(Vec<String>)` - `domain` or `domain,email1,email2,...` per input
/// * `Err(MailsweepError)` - The browser could not be started
pub async fn search<F>(domains: &[String], config: Config, progress: F) -> Result<Vec<String>>
where
    F: FnMut(f64),
{
    let renderer = WebDriverRenderer::start(config.browser.clone()).await?;
    let report = run_batch(Arc::new(renderer), domains, Arc::new(config), progress).await;
    Ok(report.lines)
}
