//! Page rendering seam
//!
//! The crawler drives pages through the [`PageRenderer`] and [`RenderedPage`]
//! traits so crawl logic never depends on a concrete browser. Two renderers
//! ship with the crate:
//! - [`WebDriverRenderer`]: a real browser over WebDriver, one session per page
//! - [`HttpRenderer`]: plain HTTP fetch plus HTML parsing, no JavaScript

mod http;
mod webdriver;

pub use http::{build_http_client, HttpPage, HttpRenderer};
pub use webdriver::{WebDriverPage, WebDriverRenderer};

use crate::{MailsweepError, Result};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Opens private pages for crawl tasks
///
/// Implementations must be shareable across tasks; every call to
/// [`open_page`](PageRenderer::open_page) returns a page no other task sees.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Opens a fresh browsing context with a single page
    async fn open_page(&self) -> Result<Box<dyn RenderedPage>>;
}

/// A single page owned by one crawl task
#[async_trait]
pub trait RenderedPage: Send {
    /// Loads `url`, failing if it does not finish within `timeout`
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Rendered text content of the current page
    async fn visible_text(&mut self) -> Result<String>;

    /// Snapshots the visible anchors of the current page and returns their count
    async fn visible_link_count(&mut self) -> Result<usize>;

    /// Raw target attribute of the anchor at `index` in the last snapshot
    async fn link_target(&mut self, index: usize) -> Result<Option<String>>;

    /// Releases the page and its browsing context
    async fn close(&mut self) -> Result<()>;
}

/// Runs a navigation future under a timeout, mapping expiry to an error
pub(crate) async fn navigation_deadline<F, T>(url: &str, timeout: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(MailsweepError::NavigationTimeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}
