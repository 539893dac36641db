// HTTP-level tests for the network-backed candidate sources

use relink_core::sources::{CandidateProducer, CrawlSource, OnPageSource, SitemapSource};
use relink_core::{CandidateSource, ResolverConfig};
use relink_scanner::{HttpFetcher, PoliteClient, PolitenessGate};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn client() -> PoliteClient {
    PoliteClient::new(
        Arc::new(HttpFetcher::new().unwrap()),
        Arc::new(PolitenessGate::new(Duration::ZERO)),
    )
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html")
}

// ============================================================================
// Sitemap Source Tests
// ============================================================================

#[tokio::test]
async fn test_sitemap_falls_back_to_http() {
    let mock_server = MockServer::start().await;
    let sitemap = format!(
        "<urlset><url><loc>{0}/blog/post-1-updated</loc></url><url><loc>{0}/about</loc></url></urlset>",
        mock_server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap))
        .mount(&mock_server)
        .await;

    let original = Url::parse(&format!("{}/blog/post-1", mock_server.uri())).unwrap();
    let candidates = SitemapSource::new(100).produce(&original, &client()).await.unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].url, format!("{}/blog/post-1-updated", mock_server.uri()));
    let reason = candidates[0].reason.as_deref().unwrap();
    assert!(reason.starts_with("listed in http://"));
    assert!(reason.ends_with("/sitemap.xml"));
}

#[tokio::test]
async fn test_sitemap_index_is_expanded() {
    let mock_server = MockServer::start().await;
    let index = format!(
        "<sitemapindex><sitemap><loc>{}/sitemap-posts.xml</loc></sitemap></sitemapindex>",
        mock_server.uri()
    );
    let posts = format!(
        "<urlset><url><loc>{0}/posts/a</loc></url><url><loc>{0}/posts/b</loc></url></urlset>",
        mock_server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap-posts.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(posts))
        .mount(&mock_server)
        .await;

    let original = Url::parse(&format!("{}/posts/old", mock_server.uri())).unwrap();
    let candidates = SitemapSource::new(100).produce(&original, &client()).await.unwrap();

    let urls: Vec<String> = candidates.into_iter().map(|c| c.url).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/posts/a", mock_server.uri()),
            format!("{}/posts/b", mock_server.uri())
        ]
    );
}

#[tokio::test]
async fn test_sitemap_entries_capped() {
    let mock_server = MockServer::start().await;
    let entries: String = (0..20)
        .map(|i| format!("<url><loc>{}/p/{}</loc></url>", mock_server.uri(), i))
        .collect();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("<urlset>{}</urlset>", entries)))
        .mount(&mock_server)
        .await;

    let original = Url::parse(&format!("{}/old", mock_server.uri())).unwrap();
    let candidates = SitemapSource::new(5).produce(&original, &client()).await.unwrap();

    assert_eq!(candidates.len(), 5);
}

#[tokio::test]
async fn test_missing_sitemap_yields_nothing() {
    let mock_server = MockServer::start().await;

    let original = Url::parse(&format!("{}/old", mock_server.uri())).unwrap();
    let candidates = SitemapSource::new(100).produce(&original, &client()).await.unwrap();

    assert!(candidates.is_empty());
}

// ============================================================================
// On-Page Source Tests
// ============================================================================

#[tokio::test]
async fn test_on_page_reads_error_page_signal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(
            r#"<html><head><meta http-equiv="refresh" content="0; url=/new-home"></head></html>"#,
            "text/html",
        ))
        .mount(&mock_server)
        .await;

    let original = Url::parse(&format!("{}/old", mock_server.uri())).unwrap();
    let source = OnPageSource;
    let candidates = source.produce(&original, &client()).await.unwrap();

    assert_eq!(source.source(), CandidateSource::OnPage);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].url, format!("{}/new-home", mock_server.uri()));
    assert!(candidates[0].reason.as_deref().unwrap().contains("meta refresh"));
}

#[tokio::test]
async fn test_on_page_ignores_non_html() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"canonical": "<link rel=\"canonical\" href=\"/x\">"}"#,
            "application/json",
        ))
        .mount(&mock_server)
        .await;

    let original = Url::parse(&format!("{}/old.json", mock_server.uri())).unwrap();
    let candidates = OnPageSource.produce(&original, &client()).await.unwrap();

    assert!(candidates.is_empty());
}

// ============================================================================
// Crawl Source Tests
// ============================================================================

#[tokio::test]
async fn test_crawl_source_carries_page_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/docs/old"))
        .respond_with(html(
            "<html><body><h1>Old docs</h1><p>This section is kept for readers who still \
             follow older bookmarks into the manual.</p><a href=\"/docs/new\">New docs</a></body></html>",
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/new"))
        .respond_with(html(
            "<html><body><h1>Manual</h1><p>Installation, configuration and upgrade notes for \
             every supported release of the product.</p></body></html>",
        ))
        .mount(&mock_server)
        .await;

    let config = ResolverConfig::default().with_max_crawl_pages(5);
    let original = Url::parse(&format!("{}/docs/old", mock_server.uri())).unwrap();
    let candidates = CrawlSource::from_config(&config)
        .produce(&original, &client())
        .await
        .unwrap();

    let new_docs = candidates
        .iter()
        .find(|c| c.url == format!("{}/docs/new", mock_server.uri()))
        .expect("linked page discovered");
    assert!(new_docs.page_text.as_deref().unwrap().contains("Installation"));
    assert_eq!(new_docs.reason.as_deref(), Some("nearby internal page (depth 1)"));
}

#[tokio::test]
async fn test_crawl_source_blocked_by_robots() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /\n"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/old"))
        .respond_with(html("<html><body>never fetched</body></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let original = Url::parse(&format!("{}/docs/old", mock_server.uri())).unwrap();
    let result = CrawlSource::from_config(&ResolverConfig::default())
        .produce(&original, &client())
        .await;

    assert!(matches!(result, Err(relink_scanner::ScanError::PolicyBlocked(_))));
}
