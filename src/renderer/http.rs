//! HTTP renderer
//!
//! Fetches pages with a plain HTTP client and reads them with an HTML parser.
//! No scripts run, so this is only a fallback for environments without a
//! WebDriver server. Every `a[href]` counts as a visible link.

use crate::renderer::{navigation_deadline, PageRenderer, RenderedPage};
use crate::{MailsweepError, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;

/// Builds the HTTP client shared by all pages of an [`HttpRenderer`]
pub fn build_http_client() -> std::result::Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+contact discovery)",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Renderer backed by a plain HTTP client
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    /// Creates a renderer with a freshly built HTTP client
    pub fn new() -> Result<Self> {
        let client = build_http_client()?;
        Ok(Self { client })
    }

    /// Creates a renderer around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn open_page(&self) -> Result<Box<dyn RenderedPage>> {
        Ok(Box::new(HttpPage {
            client: self.client.clone(),
            body: None,
            links: Vec::new(),
        }))
    }
}

/// A page fetched over plain HTTP
pub struct HttpPage {
    client: Client,
    body: Option<String>,
    links: Vec<String>,
}

impl HttpPage {
    fn body(&self) -> Result<&str> {
        self.body
            .as_deref()
            .ok_or_else(|| MailsweepError::Renderer("no page loaded".to_string()))
    }
}

#[async_trait]
impl RenderedPage for HttpPage {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        self.body = None;
        self.links.clear();

        let client = &self.client;
        let body = navigation_deadline(url, timeout, async {
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| MailsweepError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(MailsweepError::Navigation {
                    url: url.to_string(),
                    message: format!("HTTP {}", status.as_u16()),
                });
            }

            response.text().await.map_err(|e| MailsweepError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
        })
        .await?;

        self.body = Some(body);
        Ok(())
    }

    async fn visible_text(&mut self) -> Result<String> {
        Ok(body_text(self.body()?))
    }

    async fn visible_link_count(&mut self) -> Result<usize> {
        self.links = anchor_targets(self.body()?);
        Ok(self.links.len())
    }

    async fn link_target(&mut self, index: usize) -> Result<Option<String>> {
        Ok(self.links.get(index).cloned())
    }

    async fn close(&mut self) -> Result<()> {
        self.body = None;
        self.links.clear();
        Ok(())
    }
}

/// Text nodes of the document body, trimmed, one per line
fn body_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let body_selector = Selector::parse("body").expect("static selector");

    let root = document
        .select(&body_selector)
        .next()
        .unwrap_or_else(|| document.root_element());

    root.text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `href` values of every anchor in document order
fn anchor_targets(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a[href]").expect("static selector");

    document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}
