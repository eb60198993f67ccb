//! Batch orchestration
//!
//! Fans out one crawl task per input domain under a global concurrency cap
//! and fans the outcomes back in, index-aligned with the input.
//!
//! Completions are drained on the calling task, which is the only place the
//! processed counter is touched and the only caller of the progress
//! callback. Progress values are therefore exactly `1/N, 2/N, ..., N/N`, in
//! that order, without a lock.

use crate::config::Config;
use crate::crawler::task::{crawl_domain, CrawlOutcome};
use crate::output::{format_log, format_result_line, write_log};
use crate::renderer::PageRenderer;
use crate::MailsweepError;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// Everything a batch run produces
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Formatted result lines, index-aligned with the input domains
    pub lines: Vec<String>,

    /// Per-domain outcomes, index-aligned with the input domains
    pub outcomes: Vec<CrawlOutcome>,

    /// Wall-clock time of the crawl phase, in whole seconds
    pub total_elapsed_secs: u64,

    /// Contents of the log artifact
    pub log: String,

    /// Where the log artifact was written, if writing succeeded
    pub log_path: Option<PathBuf>,
}

impl BatchReport {
    /// Number of domains whose crawl failed
    pub fn error_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_error()).count()
    }

    /// Number of domains with at least one email
    pub fn found_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.emails.is_empty()).count()
    }
}

/// Counts completed slots and turns them into progress fractions
#[derive(Debug)]
struct ProgressCounter {
    processed: usize,
    total: usize,
}

impl ProgressCounter {
    fn new(total: usize) -> Self {
        Self {
            processed: 0,
            total,
        }
    }

    /// Records one completed slot and returns the new fraction
    fn advance(&mut self) -> f64 {
        self.processed += 1;
        if self.total == 0 {
            return 1.0;
        }
        self.processed as f64 / self.total as f64
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}

/// Crawls every domain of a batch and writes the log artifact
///
/// # Arguments
///
/// * `renderer` - Source of private pages, shared by all tasks
/// * `domains` - Raw domain inputs; blank entries are skipped slots
/// * `config` - Crawl, ranking and output settings
/// * `progress` - Called once per completed slot with a fraction in (0, 1]
///
/// # Returns
///
/// A [`BatchReport`]. Per-domain failures are reported inside it; the log
/// artifact is written exactly once, and a failure to write it is logged
/// rather than returned.
pub async fn run_batch<F>(
    renderer: Arc<dyn PageRenderer>,
    domains: &[String],
    config: Arc<Config>,
    mut progress: F,
) -> BatchReport
where
    F: FnMut(f64),
{
    let started = Instant::now();
    let total = domains.len();
    let limit = config.crawler.max_concurrent_domains.max(1);

    tracing::info!(
        "Starting batch of {} domain(s), up to {} at a time",
        total,
        limit
    );

    let semaphore = Arc::new(Semaphore::new(limit));
    let mut tasks = FuturesUnordered::new();

    for (index, input) in domains.iter().enumerate() {
        let renderer = Arc::clone(&renderer);
        let config = Arc::clone(&config);
        let semaphore = Arc::clone(&semaphore);
        let input = input.clone();

        let handle = tokio::spawn(async move {
            // Held until the task returns, on every exit path
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    let error = MailsweepError::CrawlFailure(format!("concurrency limiter closed: {}", e));
                    return CrawlOutcome::failed(&input, &error, 0);
                }
            };
            let started = Instant::now();
            let crawl = AssertUnwindSafe(crawl_domain(renderer.as_ref(), &input, &config));

            match crawl.catch_unwind().await {
                Ok(outcome) => outcome,
                Err(panic) => {
                    tracing::error!("Crawl task for '{}' panicked", input.trim());
                    let error = MailsweepError::CrawlFailure(format!(
                        "crawl task panicked: {}",
                        panic_message(panic.as_ref())
                    ));
                    CrawlOutcome::failed(&input, &error, started.elapsed().as_secs())
                }
            }
        });

        tasks.push(async move { (index, handle.await) });
    }

    let mut slots: Vec<Option<CrawlOutcome>> = vec![None; total];
    let mut counter = ProgressCounter::new(total);

    while let Some((index, joined)) = tasks.next().await {
        let outcome = match joined {
            Ok(outcome) => outcome,
            // Panics are caught inside the task, so this is cancellation only
            Err(e) => {
                tracing::error!("Crawl task for '{}' did not complete: {}", domains[index], e);
                let error = MailsweepError::CrawlFailure(format!("crawl task aborted: {}", e));
                CrawlOutcome::failed(&domains[index], &error, 0)
            }
        };

        slots[index] = Some(outcome);
        progress(counter.advance());
    }

    let outcomes: Vec<CrawlOutcome> = slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.unwrap_or_else(|| {
                let error = MailsweepError::CrawlFailure("crawl task never reported".to_string());
                CrawlOutcome::failed(&domains[index], &error, 0)
            })
        })
        .collect();

    let total_elapsed_secs = started.elapsed().as_secs();
    let lines: Vec<String> = outcomes.iter().map(format_result_line).collect();
    let log = format_log(total_elapsed_secs, &outcomes);

    let log_path = match write_log(
        &config.output.log_directory(),
        &config.output.log_prefix,
        &log,
    ) {
        Ok(path) => {
            tracing::info!("Wrote batch log to {}", path.display());
            Some(path)
        }
        Err(e) => {
            tracing::error!("Failed to write batch log: {}", e);
            None
        }
    };

    let report = BatchReport {
        lines,
        outcomes,
        total_elapsed_secs,
        log,
        log_path,
    };

    tracing::info!(
        "Batch finished in {}s: {} with emails, {} failed, {} total",
        total_elapsed_secs,
        report.found_count(),
        report.error_count(),
        total
    );

    report
}
