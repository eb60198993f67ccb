//! Integration tests for the HTTP renderer
//!
//! These tests serve pages from a wiremock server and read them through the
//! renderer traits, the same way a crawl task does.

use mailsweep::renderer::HttpRenderer;
use mailsweep::{MailsweepError, PageRenderer};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Acme Widgets</title></head>
<body>
    <h1>Acme Widgets</h1>
    <p>Write to us at <span>Hello@Acme.com</span></p>
    <a href="/Contact-Us">Contact</a>
    <a href="mailto:sales@acme.com">Sales</a>
    <a href="https://twitter.com/acme">Twitter</a>
</body>
</html>"#;

#[tokio::test]
async fn test_reads_text_and_links() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HOME_PAGE))
        .mount(&mock_server)
        .await;

    let renderer = HttpRenderer::new().expect("Failed to build renderer");
    let mut page = renderer.open_page().await.unwrap();
    let url = format!("{}/", mock_server.uri());

    page.navigate(&url, Duration::from_secs(5)).await.unwrap();

    let text = page.visible_text().await.unwrap();
    assert!(text.contains("Hello@Acme.com"));
    assert!(!text.contains("<span>"));

    assert_eq!(page.visible_link_count().await.unwrap(), 3);
    assert_eq!(
        page.link_target(0).await.unwrap().as_deref(),
        Some("/Contact-Us")
    );
    assert_eq!(
        page.link_target(1).await.unwrap().as_deref(),
        Some("mailto:sales@acme.com")
    );
    assert_eq!(page.link_target(3).await.unwrap(), None);

    page.close().await.unwrap();
}

#[tokio::test]
async fn test_error_status_is_navigation_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let renderer = HttpRenderer::new().unwrap();
    let mut page = renderer.open_page().await.unwrap();
    let url = format!("{}/missing", mock_server.uri());

    let result = page.navigate(&url, Duration::from_secs(5)).await;

    match result {
        Err(MailsweepError::Navigation { url: failed, message }) => {
            assert_eq!(failed, url);
            assert_eq!(message, "HTTP 404");
        }
        other => panic!("Expected navigation error, got {:?}", other),
    }
    assert!(page.visible_text().await.is_err());
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(HOME_PAGE)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let renderer = HttpRenderer::new().unwrap();
    let mut page = renderer.open_page().await.unwrap();
    let url = format!("{}/slow", mock_server.uri());

    let result = page.navigate(&url, Duration::from_millis(100)).await;

    assert!(matches!(
        result,
        Err(MailsweepError::NavigationTimeout { timeout_ms: 100, .. })
    ));
}

#[tokio::test]
async fn test_unreachable_host_is_navigation_error() {
    let renderer = HttpRenderer::new().unwrap();
    let mut page = renderer.open_page().await.unwrap();

    let result = page
        .navigate("http://127.0.0.1:1/", Duration::from_secs(5))
        .await;

    assert!(matches!(result, Err(MailsweepError::Navigation { .. })));
}
