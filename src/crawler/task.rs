//! Per-domain crawl task
//!
//! One task processes exactly one input domain: it visits the home page,
//! then every contact-like link found there, merging and ranking the emails
//! of each visit into a running list. Failures never escape the task; they
//! become a [`CrawlErrorRecord`] on the outcome.

use crate::config::Config;
use crate::crawler::links::{contact_links, visible_link_targets};
use crate::email::{extract_emails, extract_from_text, has_primary, rank_emails};
use crate::renderer::{PageRenderer, RenderedPage};
use crate::state::CrawlState;
use crate::url::{normalize_uri, CanonicalUri};
use crate::{MailsweepError, Result};
use std::error::Error as StdError;
use std::time::Instant;

/// Diagnostic record for a domain whose crawl failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlErrorRecord {
    /// The domain input exactly as supplied
    pub domain: String,

    /// Display form of the error
    pub message: String,

    /// Crawl state, URL and error source chain at the time of failure
    pub context: String,
}

impl CrawlErrorRecord {
    /// Builds a record from an error and where it happened
    pub fn new(domain: &str, error: &MailsweepError, state: CrawlState, url: Option<&str>) -> Self {
        let mut context = format!("state: {}", state);
        if let Some(url) = url {
            context.push_str(&format!("; url: {}", url));
        }

        let mut source = error.source();
        while let Some(cause) = source {
            context.push_str(&format!("; caused by: {}", cause));
            source = cause.source();
        }

        Self {
            domain: domain.to_string(),
            message: error.to_string(),
            context,
        }
    }
}

/// Result of crawling one domain slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// The domain input exactly as supplied
    pub domain: String,

    /// Ranked, de-duplicated emails (partial if the crawl failed midway)
    pub emails: Vec<String>,

    /// Present only when the crawl failed
    pub error: Option<CrawlErrorRecord>,

    /// Wall-clock time spent on the slot, in whole seconds
    pub elapsed_secs: u64,

    /// Terminal state of the task
    pub state: CrawlState,
}

impl CrawlOutcome {
    /// Outcome for a blank input slot
    pub fn skipped(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            emails: Vec::new(),
            error: None,
            elapsed_secs: 0,
            state: CrawlState::Done,
        }
    }

    /// Outcome for a slot whose task could not run to completion
    pub fn failed(domain: &str, error: &MailsweepError, elapsed_secs: u64) -> Self {
        Self {
            domain: domain.to_string(),
            emails: Vec::new(),
            error: Some(CrawlErrorRecord::new(domain, error, CrawlState::Start, None)),
            elapsed_secs,
            state: CrawlState::Errored,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Crawls one domain input end-to-end
///
/// Blank inputs finish immediately with no emails and no error. Any failure
/// while normalizing, opening the page, navigating or reading content ends
/// the crawl in [`CrawlState::Errored`]; emails gathered before the failure
/// are kept.
pub async fn crawl_domain(renderer: &dyn PageRenderer, input: &str, config: &Config) -> CrawlOutcome {
    let started = Instant::now();

    if input.trim().is_empty() {
        tracing::debug!("Skipping empty domain slot");
        return CrawlOutcome::skipped(input);
    }

    let mut crawl = DomainCrawl::new(input, config);
    let result = crawl.run(renderer).await;

    let error = match result {
        Ok(()) => {
            crawl.transition(CrawlState::Done);
            tracing::debug!("{}: found {} email(s)", input.trim(), crawl.emails.len());
            None
        }
        Err(e) => {
            let record = CrawlErrorRecord::new(input, &e, crawl.state, crawl.current_url.as_deref());
            tracing::warn!("{}: crawl failed in {}: {}", input.trim(), crawl.state, e);
            crawl.transition(CrawlState::Errored);
            Some(record)
        }
    };

    CrawlOutcome {
        domain: input.to_string(),
        emails: crawl.emails,
        error,
        elapsed_secs: started.elapsed().as_secs(),
        state: crawl.state,
    }
}

/// Working state of a single domain crawl
struct DomainCrawl<'a> {
    input: &'a str,
    config: &'a Config,
    state: CrawlState,
    emails: Vec<String>,
    current_url: Option<String>,
}

impl<'a> DomainCrawl<'a> {
    fn new(input: &'a str, config: &'a Config) -> Self {
        Self {
            input,
            config,
            state: CrawlState::Start,
            emails: Vec::new(),
            current_url: None,
        }
    }

    fn transition(&mut self, next: CrawlState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid crawl transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!("{}: {} -> {}", self.input.trim(), self.state, next);
        self.state = next;
    }

    async fn run(&mut self, renderer: &dyn PageRenderer) -> Result<()> {
        let home = normalize_uri(self.input)?;
        let mut page = renderer.open_page().await?;

        let visited = self.visit_site(page.as_mut(), &home).await;
        let closed = page.close().await;

        visited?;
        closed
    }

    async fn visit_site(&mut self, page: &mut dyn RenderedPage, home: &CanonicalUri) -> Result<()> {
        self.transition(CrawlState::FetchHome);
        self.visit(page, home.as_str(), &home.domain).await?;

        if self.should_stop(&home.domain) {
            tracing::debug!("{}: primary email found on home page", home.domain);
            return Ok(());
        }

        self.transition(CrawlState::FollowContactLinks);
        self.current_url = Some(home.as_str().to_string());
        page.navigate(home.as_str(), self.config.crawler.navigation_timeout())
            .await?;

        let targets = visible_link_targets(page, &self.config.crawler).await?;
        let links = contact_links(&targets, home, &self.config.crawler.contact_keywords);
        tracing::debug!("{}: following {} contact link(s)", home.domain, links.len());

        for link in links {
            self.visit(page, link.as_str(), &home.domain).await?;

            if self.should_stop(&home.domain) {
                break;
            }
        }

        Ok(())
    }

    /// Loads one page and merges its emails into the running list
    async fn visit(&mut self, page: &mut dyn RenderedPage, url: &str, domain: &str) -> Result<()> {
        tracing::debug!("Visiting {}", url);
        self.current_url = Some(url.to_string());

        page.navigate(url, self.config.crawler.navigation_timeout())
            .await?;

        let text = page.visible_text().await?;
        let text_emails = extract_from_text(&text);
        let link_emails = extract_emails(visible_link_targets(page, &self.config.crawler).await?);

        let accumulated = std::mem::take(&mut self.emails);
        self.emails = rank_emails(
            text_emails,
            link_emails,
            accumulated,
            domain,
            &self.config.ranking.secondary_suffixes,
        );

        Ok(())
    }

    fn should_stop(&self, domain: &str) -> bool {
        self.config.crawler.stop_on_primary && has_primary(&self.emails, domain)
    }
}
