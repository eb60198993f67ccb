//! WebDriver-backed renderer
//!
//! Each page is its own WebDriver session, so pages never share cookies,
//! storage or navigation state. Visible anchors are collected by one script
//! call per snapshot, whatever the number of anchors on the page.

use crate::config::BrowserConfig;
use crate::renderer::{navigation_deadline, PageRenderer, RenderedPage};
use crate::{MailsweepError, Result};
use async_trait::async_trait;
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::map::Map as JsonMap;
use std::time::Duration;

/// Raw `href` of every rendered anchor, in document order
///
/// An anchor counts as visible when it has a layout box and is not hidden
/// through `visibility`. Anchors without `href` yield `null`.
const VISIBLE_ANCHOR_TARGETS: &str = r#"
return Array.from(document.querySelectorAll('a'))
    .filter(function (a) {
        return a.getClientRects().length > 0
            && window.getComputedStyle(a).visibility !== 'hidden';
    })
    .map(function (a) { return a.getAttribute('href'); });
"#;

/// Renderer that drives a browser through a WebDriver server
#[derive(Debug, Clone)]
pub struct WebDriverRenderer {
    config: BrowserConfig,
}

impl WebDriverRenderer {
    /// Verifies the WebDriver server can start a browser and returns the renderer
    ///
    /// A probe session is opened and closed immediately. Failure here means
    /// no domain could be crawled, so it is reported as
    /// [`MailsweepError::EngineStart`].
    pub async fn start(config: BrowserConfig) -> Result<Self> {
        let renderer = Self { config };

        let probe = renderer
            .connect()
            .await
            .map_err(MailsweepError::EngineStart)?;
        if let Err(e) = probe.close().await {
            tracing::warn!("Failed to close WebDriver probe session: {}", e);
        }

        tracing::info!("WebDriver ready at {}", renderer.config.webdriver_url);
        Ok(renderer)
    }

    /// Builds Chrome capabilities from the browser configuration
    fn capabilities(&self) -> JsonMap<String, serde_json::Value> {
        let mut args = self.config.args.clone();
        if self.config.headless && !args.iter().any(|a| a.starts_with("--headless")) {
            args.insert(0, "--headless=new".to_string());
        }

        let mut chrome_opts = JsonMap::new();
        chrome_opts.insert("args".to_string(), serde_json::json!(args));

        let mut caps = JsonMap::new();
        caps.insert("browserName".to_string(), serde_json::json!("chrome"));
        caps.insert(
            "goog:chromeOptions".to_string(),
            serde_json::Value::Object(chrome_opts),
        );
        caps
    }

    async fn connect(&self) -> std::result::Result<Client, String> {
        tracing::debug!("Connecting to WebDriver at {}", self.config.webdriver_url);

        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());

        builder
            .connect(&self.config.webdriver_url)
            .await
            .map_err(|e| format!("{} ({})", e, self.config.webdriver_url))
    }
}

#[async_trait]
impl PageRenderer for WebDriverRenderer {
    async fn open_page(&self) -> Result<Box<dyn RenderedPage>> {
        let client = self.connect().await.map_err(MailsweepError::Renderer)?;
        Ok(Box::new(WebDriverPage {
            client: Some(client),
            targets: Vec::new(),
            page_load_timeout: None,
        }))
    }
}

/// A page backed by its own WebDriver session
pub struct WebDriverPage {
    client: Option<Client>,
    targets: Vec<Option<String>>,
    /// Page-load timeout last sent to the session
    page_load_timeout: Option<Duration>,
}

impl WebDriverPage {
    fn client(&self) -> Result<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| MailsweepError::Renderer("page already closed".to_string()))
    }
}

fn renderer_error(e: fantoccini::error::CmdError) -> MailsweepError {
    MailsweepError::Renderer(e.to_string())
}

/// Decodes the result of [`VISIBLE_ANCHOR_TARGETS`]
fn decode_targets(value: serde_json::Value) -> Result<Vec<Option<String>>> {
    serde_json::from_value(value)
        .map_err(|e| MailsweepError::Renderer(format!("Unexpected anchor list: {}", e)))
}

#[async_trait]
impl RenderedPage for WebDriverPage {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        self.targets.clear();

        // An abandoned goto keeps the session busy until the browser's own
        // page-load timeout fires
        if self.page_load_timeout != Some(timeout) {
            let timeouts = TimeoutConfiguration::new(Some(timeout), Some(timeout), Some(Duration::ZERO));
            self.client()?
                .update_timeouts(timeouts)
                .await
                .map_err(renderer_error)?;
            self.page_load_timeout = Some(timeout);
        }

        let client = self.client()?;

        navigation_deadline(url, timeout, async {
            client
                .goto(url)
                .await
                .map_err(|e| MailsweepError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })
        })
        .await
    }

    async fn visible_text(&mut self) -> Result<String> {
        let body = self
            .client()?
            .find(Locator::Css("body"))
            .await
            .map_err(renderer_error)?;
        body.text().await.map_err(renderer_error)
    }

    async fn visible_link_count(&mut self) -> Result<usize> {
        let value = self
            .client()?
            .execute(VISIBLE_ANCHOR_TARGETS, Vec::new())
            .await
            .map_err(renderer_error)?;

        self.targets = decode_targets(value)?;
        Ok(self.targets.len())
    }

    async fn link_target(&mut self, index: usize) -> Result<Option<String>> {
        Ok(self.targets.get(index).cloned().flatten())
    }

    async fn close(&mut self) -> Result<()> {
        self.targets.clear();
        if let Some(client) = self.client.take() {
            client.close().await.map_err(renderer_error)?;
        }
        Ok(())
    }
}
