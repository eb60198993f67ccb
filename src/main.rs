//! Mailsweep main entry point
//!
//! This is the command-line interface for the Mailsweep email discovery tool.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use mailsweep::config::{load_config, validate, Config};
use mailsweep::crawler::run_batch;
use mailsweep::renderer::{HttpRenderer, PageRenderer, WebDriverRenderer};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Mailsweep: bulk contact email discovery
///
/// Renders each domain's home page and contact-like pages, collects the
/// email addresses they show and prints them ranked by relevance, one line
/// per input domain.
#[derive(Parser, Debug)]
#[command(name = "mailsweep")]
#[command(version)]
#[command(about = "Bulk contact email discovery", long_about = None)]
struct Cli {
    /// File with one domain per line (reads stdin when omitted)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Page renderer to use
    #[arg(long, value_enum, default_value_t = RendererKind::Webdriver)]
    renderer: RendererKind,

    /// WebDriver server URL (overrides the config file)
    #[arg(long, value_name = "URL")]
    webdriver_url: Option<String>,

    /// Maximum number of domains crawled at once (overrides the config file)
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Write result lines to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Do not draw the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RendererKind {
    /// Real browser driven over WebDriver
    Webdriver,
    /// Plain HTTP fetch without JavaScript
    Http,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let domains = read_domains(cli.input.as_ref())?;
    tracing::info!("Loaded {} domain slot(s)", domains.len());

    let renderer: Arc<dyn PageRenderer> = match cli.renderer {
        RendererKind::Webdriver => Arc::new(
            WebDriverRenderer::start(config.browser.clone())
                .await
                .context("Failed to start the browser; is a WebDriver server running?")?,
        ),
        RendererKind::Http => {
            Arc::new(HttpRenderer::new().context("Failed to build the HTTP client")?)
        }
    };

    let progress_bar = build_progress_bar(domains.len() as u64, cli.quiet || cli.no_progress)?;
    let total = domains.len() as u64;
    let bar = progress_bar.clone();

    let report = run_batch(renderer, &domains, Arc::new(config), move |fraction| {
        bar.set_position((fraction * total as f64).round() as u64);
    })
    .await;

    progress_bar.finish_with_message(format!(
        "{} of {} domain(s) with emails, {} failed",
        report.found_count(),
        report.outcomes.len(),
        report.error_count()
    ));

    write_results(cli.output.as_ref(), &report.lines)?;

    if !cli.quiet {
        match &report.log_path {
            Some(path) => eprintln!("Log written to {}", path.display()),
            None => eprintln!("Log could not be written"),
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mailsweep=warn,error"),
            1 => EnvFilter::new("mailsweep=info,warn"),
            2 => EnvFilter::new("mailsweep=debug,info"),
            _ => EnvFilter::new("mailsweep=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (or defaults) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(url) = &cli.webdriver_url {
        config.browser.webdriver_url = url.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_domains = concurrency;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Reads newline-separated domains; blank lines are kept as empty slots
fn read_domains(input: Option<&PathBuf>) -> anyhow::Result<Vec<String>> {
    let content = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read domains from {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read domains from stdin")?;
            buffer
        }
    };

    Ok(content.lines().map(|line| line.to_string()).collect())
}

fn build_progress_bar(len: u64, hidden: bool) -> anyhow::Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }

    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Failed to set progress bar template")?
            .progress_chars("=> "),
    );
    bar.set_message("Crawling domains...");
    Ok(bar)
}

fn write_results(output: Option<&PathBuf>, lines: &[String]) -> anyhow::Result<()> {
    let mut contents = lines.join("\n");
    contents.push('\n');

    match output {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("Failed to write results to {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(contents.as_bytes())
                .context("Failed to write results to stdout")?;
        }
    }

    Ok(())
}
