//! End-to-end batch tests driven by a scripted renderer
//!
//! These tests exercise the full flow (normalization, page visits, link
//! heuristic, ranking, progress, log artifact) without starting a browser.

use crate::support::{domains, test_config, FakePage, FakeRenderer, PanickingRenderer};
use mailsweep::crawler::run_batch;
use mailsweep::CrawlState;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

#[tokio::test]
async fn test_mixed_batch_keeps_slots_aligned() {
    let log_dir = tempdir().unwrap();
    let renderer = FakeRenderer::new().page(
        "https://acme.com/",
        FakePage::new("Welcome to Acme\nNo addresses here", &["/pricing"]),
    );
    let stats = Arc::clone(&renderer.stats);
    let input = domains(&["acme.com", "", "bad uri!!"]);

    let report = run_batch(
        Arc::new(renderer),
        &input,
        Arc::new(test_config(log_dir.path())),
        |_| {},
    )
    .await;

    assert_eq!(report.lines, vec!["acme.com", "", "bad uri!!"]);

    assert!(report.outcomes[0].error.is_none());
    assert!(report.outcomes[1].error.is_none());
    assert_eq!(report.outcomes[1].state, CrawlState::Done);

    let record = report.outcomes[2].error.as_ref().expect("bad uri must fail");
    assert_eq!(record.domain, "bad uri!!");
    assert!(record.message.starts_with("Malformed URI"));
    assert_eq!(report.outcomes[2].state, CrawlState::Errored);
    assert_eq!(report.error_count(), 1);

    // Home page is visited, then revisited for link enumeration
    assert_eq!(
        stats.visits(),
        vec!["https://acme.com/", "https://acme.com/"]
    );

    let log_path = report.log_path.clone().expect("log must be written");
    assert!(log_path.starts_with(log_dir.path()));
    let log = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(log, report.log);

    let lines: Vec<&str> = log.lines().collect();
    assert!(lines[0].starts_with("TOTAL : "));
    assert!(lines[1].starts_with("acme.com : "));
    assert!(lines[2].starts_with(" : "));
    assert!(lines[3].starts_with("bad uri!! : "));
    assert_eq!(lines[4], "bad uri!!");
    assert!(lines[5].starts_with("Malformed URI"));
    assert!(lines[6].starts_with("state: start"));
    assert_eq!(log.matches("Malformed URI").count(), 1);
}

#[tokio::test]
async fn test_contact_pages_are_ranked_and_deduplicated() {
    let log_dir = tempdir().unwrap();
    let renderer = FakeRenderer::new()
        .page(
            "https://acme.com/",
            FakePage::new(
                "Press: press@agency.net\nGeneral: info@acme.com",
                &[
                    "/contact",
                    "mailto:info@acme.com",
                    "https://twitter.com/contact",
                    "/shop",
                ],
            ),
        )
        .page(
            "https://acme.com/contact",
            FakePage::new("Owner: acme.owner@gmail.com", &["mailto:SALES@acme.com"]),
        );
    let stats = Arc::clone(&renderer.stats);

    let report = run_batch(
        Arc::new(renderer),
        &domains(&["acme.com"]),
        Arc::new(test_config(log_dir.path())),
        |_| {},
    )
    .await;

    assert_eq!(
        report.lines,
        vec!["acme.com,sales@acme.com,info@acme.com,acme.owner@gmail.com,press@agency.net"]
    );
    assert!(report.outcomes[0].error.is_none());
    assert_eq!(
        stats.visits(),
        vec![
            "https://acme.com/",
            "https://acme.com/",
            "https://acme.com/contact",
        ]
    );
}

#[tokio::test]
async fn test_www_input_matches_bare_domain_emails() {
    let log_dir = tempdir().unwrap();
    let renderer = FakeRenderer::new().page(
        "https://www.acme.com/",
        FakePage::new("someone@other.org\nhello@acme.com", &[]),
    );

    let report = run_batch(
        Arc::new(renderer),
        &domains(&["http://www.Acme.com"]),
        Arc::new(test_config(log_dir.path())),
        |_| {},
    )
    .await;

    assert_eq!(
        report.lines,
        vec!["http://www.Acme.com,hello@acme.com,someone@other.org"]
    );
}

#[tokio::test]
async fn test_navigation_failure_is_isolated() {
    let log_dir = tempdir().unwrap();
    let renderer = FakeRenderer::new().page(
        "https://good.com/",
        FakePage::new("team@good.com", &[]),
    );
    let stats = Arc::clone(&renderer.stats);

    let report = run_batch(
        Arc::new(renderer),
        &domains(&["unreachable.com", "good.com"]),
        Arc::new(test_config(log_dir.path())),
        |_| {},
    )
    .await;

    assert_eq!(report.lines, vec!["unreachable.com", "good.com,team@good.com"]);

    let record = report.outcomes[0].error.as_ref().unwrap();
    assert_eq!(record.domain, "unreachable.com");
    assert!(record.message.contains("net::ERR_NAME_NOT_RESOLVED"));
    assert_eq!(record.context, "state: fetch_home; url: https://unreachable.com/");

    // Every opened page is closed, including the failed one
    assert_eq!(stats.opened.load(Ordering::SeqCst), 2);
    assert_eq!(stats.closed.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failure_on_contact_page_keeps_partial_emails() {
    let log_dir = tempdir().unwrap();
    let renderer = FakeRenderer::new().page(
        "https://acme.com/",
        FakePage::new("info@acme.com", &["/about-us"]),
    );

    let report = run_batch(
        Arc::new(renderer),
        &domains(&["acme.com"]),
        Arc::new(test_config(log_dir.path())),
        |_| {},
    )
    .await;

    let outcome = &report.outcomes[0];
    assert_eq!(outcome.emails, vec!["info@acme.com"]);
    let record = outcome.error.as_ref().unwrap();
    assert!(record.context.contains("state: follow_contact_links"));
    assert!(record.context.contains("https://acme.com/about-us"));
    assert_eq!(report.lines, vec!["acme.com,info@acme.com"]);
}

#[tokio::test]
async fn test_contact_links_followed_by_default() {
    let log_dir = tempdir().unwrap();
    let renderer = FakeRenderer::new()
        .page(
            "https://acme.com/",
            FakePage::new("info@acme.com", &["/contact"]),
        )
        .page("https://acme.com/contact", FakePage::new("", &[]));
    let stats = Arc::clone(&renderer.stats);

    run_batch(
        Arc::new(renderer),
        &domains(&["acme.com"]),
        Arc::new(test_config(log_dir.path())),
        |_| {},
    )
    .await;

    assert_eq!(stats.visits().len(), 3);
}

#[tokio::test]
async fn test_stop_on_primary_skips_contact_links() {
    let log_dir = tempdir().unwrap();
    let renderer = FakeRenderer::new()
        .page(
            "https://acme.com/",
            FakePage::new("info@acme.com", &["/contact"]),
        )
        .page("https://acme.com/contact", FakePage::new("", &[]));
    let stats = Arc::clone(&renderer.stats);

    let mut config = test_config(log_dir.path());
    config.crawler.stop_on_primary = true;

    let report = run_batch(
        Arc::new(renderer),
        &domains(&["acme.com"]),
        Arc::new(config),
        |_| {},
    )
    .await;

    assert_eq!(report.lines, vec!["acme.com,info@acme.com"]);
    assert_eq!(stats.visits(), vec!["https://acme.com/"]);
}

#[tokio::test]
async fn test_progress_reported_once_per_slot_in_order() {
    let log_dir = tempdir().unwrap();
    let mut renderer = FakeRenderer::new();
    for n in 1..=4 {
        let url = format!("https://d{}.com/", n);
        renderer = renderer.page(&url, FakePage::new("", &[]));
    }

    let mut values = Vec::new();
    run_batch(
        Arc::new(renderer),
        &domains(&["d1.com", "d2.com", "", "d3.com", "d4.com"]),
        Arc::new(test_config(log_dir.path())),
        |fraction| values.push(fraction),
    )
    .await;

    let expected: Vec<f64> = (1..=5).map(|n| n as f64 / 5.0).collect();
    assert_eq!(values, expected);
}

#[tokio::test]
async fn test_concurrency_limit_respected() {
    let log_dir = tempdir().unwrap();
    let mut renderer = FakeRenderer::new().navigation_delay(Duration::from_millis(20));
    let mut input = Vec::new();
    for n in 0..12 {
        let domain = format!("site{}.com", n);
        renderer = renderer.page(&format!("https://{}/", domain), FakePage::new("", &[]));
        input.push(domain);
    }
    let stats = Arc::clone(&renderer.stats);

    let mut config = test_config(log_dir.path());
    config.crawler.max_concurrent_domains = 3;

    let report = run_batch(Arc::new(renderer), &input, Arc::new(config), |_| {}).await;

    assert_eq!(report.lines, input);
    assert!(stats.max_active.load(Ordering::SeqCst) <= 3);
    assert_eq!(stats.opened.load(Ordering::SeqCst), 12);
    assert_eq!(stats.closed.load(Ordering::SeqCst), 12);
}

#[tokio::test]
async fn test_too_many_links_yields_no_link_targets() {
    let log_dir = tempdir().unwrap();
    let renderer = FakeRenderer::new().page(
        "https://acme.com/",
        FakePage::new(
            "",
            &[
                "mailto:hidden@acme.com",
                "/contact",
                "/a",
                "/b",
                "/c",
                "/d",
            ],
        ),
    );
    let stats = Arc::clone(&renderer.stats);

    let mut config = test_config(log_dir.path());
    config.crawler.max_visible_links = 5;

    let report = run_batch(
        Arc::new(renderer),
        &domains(&["acme.com"]),
        Arc::new(config),
        |_| {},
    )
    .await;

    assert_eq!(report.lines, vec!["acme.com"]);
    assert!(report.outcomes[0].error.is_none());
    assert_eq!(stats.visits().len(), 2);
}

#[tokio::test]
async fn test_slow_link_read_degrades_to_empty_target() {
    let log_dir = tempdir().unwrap();
    let mut home = FakePage::new("", &["mailto:slow@acme.com", "mailto:fast@acme.com"]);
    home.slow_links.insert(0);
    let renderer = FakeRenderer::new().page("https://acme.com/", home);

    let mut config = test_config(log_dir.path());
    config.crawler.link_read_timeout_ms = 50;

    let report = run_batch(
        Arc::new(renderer),
        &domains(&["acme.com"]),
        Arc::new(config),
        |_| {},
    )
    .await;

    assert_eq!(report.lines, vec!["acme.com,fast@acme.com"]);
    assert!(report.outcomes[0].error.is_none());
}

#[tokio::test]
async fn test_failed_link_read_degrades_to_empty_target() {
    let log_dir = tempdir().unwrap();
    let mut home = FakePage::new(
        "",
        &["mailto:broken@acme.com", "/contact", "mailto:ok@acme.com"],
    );
    home.broken_links.insert(1);
    let renderer = FakeRenderer::new().page("https://acme.com/", home);
    let stats = Arc::clone(&renderer.stats);

    let report = run_batch(
        Arc::new(renderer),
        &domains(&["acme.com"]),
        Arc::new(test_config(log_dir.path())),
        |_| {},
    )
    .await;

    assert_eq!(report.lines, vec!["acme.com,broken@acme.com,ok@acme.com"]);
    assert!(report.outcomes[0].error.is_none());
    // The unreadable contact link is never followed
    assert_eq!(stats.visits().len(), 2);
}

#[tokio::test]
async fn test_panicking_task_fails_only_its_slot() {
    let log_dir = tempdir().unwrap();
    let renderer = PanickingRenderer {
        delay: Duration::from_millis(1100),
    };
    let mut calls = 0;

    let report = run_batch(
        Arc::new(renderer),
        &domains(&["a.com", "", "b.com"]),
        Arc::new(test_config(log_dir.path())),
        |_| calls += 1,
    )
    .await;

    assert_eq!(report.lines, vec!["a.com", "", "b.com"]);
    assert_eq!(calls, 3);
    assert_eq!(report.error_count(), 2);
    assert!(report.outcomes[1].error.is_none());

    for slot in [0, 2] {
        let outcome = &report.outcomes[slot];
        assert_eq!(outcome.state, CrawlState::Errored);
        assert!(outcome.elapsed_secs >= 1);

        let record = outcome.error.as_ref().unwrap();
        assert_eq!(record.domain, outcome.domain);
        assert_eq!(
            record.message,
            "Crawl failed: crawl task panicked: browser context crashed"
        );
    }

    assert!(report.log.contains("\na.com\nCrawl failed: crawl task panicked"));
}

#[tokio::test]
async fn test_empty_batch() {
    let log_dir = tempdir().unwrap();
    let mut calls = 0;

    let report = run_batch(
        Arc::new(FakeRenderer::new()),
        &[],
        Arc::new(test_config(log_dir.path())),
        |_| calls += 1,
    )
    .await;

    assert!(report.lines.is_empty());
    assert_eq!(calls, 0);
    assert_eq!(report.log, format!("TOTAL : {}\n", report.total_elapsed_secs));
}
