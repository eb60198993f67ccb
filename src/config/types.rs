use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Keywords that mark an anchor target as contact-like
pub const DEFAULT_CONTACT_KEYWORDS: &[&str] = &["contact", "write", "about", "advertise", "with"];

/// Main configuration structure for Mailsweep
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of domains crawled at the same time
    #[serde(rename = "max-concurrent-domains")]
    pub max_concurrent_domains: usize,

    /// Timeout for a single page navigation (milliseconds)
    #[serde(rename = "navigation-timeout-ms")]
    pub navigation_timeout_ms: u64,

    /// Timeout for reading one anchor target (milliseconds)
    #[serde(rename = "link-read-timeout-ms")]
    pub link_read_timeout_ms: u64,

    /// Pages with more visible links than this yield no link targets
    #[serde(rename = "max-visible-links")]
    pub max_visible_links: usize,

    /// Stop following contact links once a primary email is ranked first
    #[serde(rename = "stop-on-primary")]
    pub stop_on_primary: bool,

    /// Substrings that mark a link target as contact-like
    #[serde(rename = "contact-keywords")]
    pub contact_keywords: Vec<String>,
}

impl CrawlerConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn link_read_timeout(&self) -> Duration {
        Duration::from_millis(self.link_read_timeout_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_domains: 20,
            navigation_timeout_ms: 60_000,
            link_read_timeout_ms: 600,
            max_visible_links: 1000,
            stop_on_primary: false,
            contact_keywords: DEFAULT_CONTACT_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

/// Email ranking configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Generic provider suffixes ranked below domain emails
    #[serde(rename = "secondary-suffixes")]
    pub secondary_suffixes: Vec<String>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            secondary_suffixes: vec!["gmail.com".to_string()],
        }
    }
}

/// WebDriver browser configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// URL of the running WebDriver server
    #[serde(rename = "webdriver-url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    pub headless: bool,

    /// Extra browser command-line flags
    pub args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            headless: true,
            args: [
                "--no-sandbox",
                "--disable-gpu",
                "--disable-dev-shm-usage",
                "--window-size=1280,1024",
                "--disable-extensions",
                "--mute-audio",
            ]
            .iter()
            .map(|a| a.to_string())
            .collect(),
        }
    }
}

/// Log artifact configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the per-batch log file (system temp dir when unset)
    #[serde(rename = "log-directory")]
    pub log_directory: Option<PathBuf>,

    /// File name prefix of the per-batch log file
    #[serde(rename = "log-prefix")]
    pub log_prefix: String,
}

impl OutputConfig {
    pub fn log_directory(&self) -> PathBuf {
        self.log_directory
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_directory: None,
            log_prefix: "mailsweep".to_string(),
        }
    }
}
