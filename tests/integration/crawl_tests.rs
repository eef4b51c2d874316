//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_gleaner::config::{Config, PageTypeRule, SiteEntry};
use site_gleaner::crawler::{run_crawl, Coordinator};
use site_gleaner::extract::Document;
use site_gleaner::storage::{read_json_lines, PageCache, PageEntry};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PARAGRAPH: &str = "Debt collectors must follow federal rules when they contact you about a debt, \
    and you have the right to request written validation of what they claim you owe before you pay \
    anything or agree to a payment plan with them.";

/// Creates a fast test configuration writing into `dir`
fn create_test_config(start_url: &str, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.crawler.start_url = start_url.to_string();
    config.crawler.workers = 2;
    config.crawler.request_interval_ms = 5;
    config.crawler.request_timeout_secs = 2;
    config.crawler.retry_backoff_ms = 10;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config.output.documents_path = documents_path(dir).display().to_string();
    config.output.cache_path = cache_path(dir).display().to_string();
    config
}

fn documents_path(dir: &TempDir) -> PathBuf {
    dir.path().join("pages/out_pages.jsonl")
}

fn cache_path(dir: &TempDir) -> PathBuf {
    dir.path().join("cache/page_cache.jsonl")
}

fn read_documents(dir: &TempDir) -> Vec<Document> {
    read_json_lines(&documents_path(dir)).unwrap()
}

/// An article page with one heading, one long paragraph and the given links
fn article(heading: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>{h}</title></head><body><h1>{h}</h1><p>{p}</p>{a}</body></html>",
        h = heading,
        p = PARAGRAPH,
        a = anchors
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_page_produces_document_and_follows_link() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(article("Debt collection", &["/about"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let start_url = format!("{}/", server.uri());
    let report = run_crawl(create_test_config(&start_url, &dir))
        .await
        .unwrap();

    assert_eq!(report.collected, 1);
    assert_eq!(report.admitted, 2);

    let docs = read_documents(&dir);
    assert_eq!(docs.len(), 1);
    let doc = &docs[0];
    assert_eq!(doc.url, start_url);
    assert_eq!(doc.title.as_deref(), Some("Debt collection"));
    assert!(doc.content_text.starts_with("Debt collection\n"));
    assert!(doc.content_text.contains("written validation"));
    assert_eq!(doc.parent_url, None);
    assert_eq!(doc.meta.language.as_deref(), Some("en"));

    let cache = PageCache::open(cache_path(&dir)).unwrap();
    assert_eq!(cache.len(), 1);
    assert_eq!(
        cache.get_inner_links(&start_url),
        vec![format!("{}/about", server.uri())]
    );
}

#[tokio::test]
async fn test_robots_disallow_prevents_any_fetch() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(article("Hidden", &[])))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let report = run_crawl(create_test_config(&format!("{}/", server.uri()), &dir))
        .await
        .unwrap();

    assert_eq!(report.collected, 0);
    assert!(read_documents(&dir).is_empty());
}

#[tokio::test]
async fn test_robots_rules_for_crawler_token() {
    let server = MockServer::start().await;
    mount_robots(
        &server,
        "User-agent: TestBot\nDisallow: /private\n\nUser-agent: *\nAllow: /",
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(article("Home", &["/private/page", "/public"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/page"))
        .respond_with(html(article("Private", &[])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(html(article("Public", &[])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let report = run_crawl(create_test_config(&format!("{}/", server.uri()), &dir))
        .await
        .unwrap();

    assert_eq!(report.collected, 2);
    let docs = read_documents(&dir);
    assert_eq!(docs.len(), 2);
    assert!(docs.iter().all(|d| !d.url.contains("/private")));
}

#[tokio::test]
async fn test_page_budget_yields_exactly_one_document() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(article("Home", &["/a", "/b"])))
        .expect(1)
        .mount(&server)
        .await;
    for page in ["/a", "/b"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html(article("Child", &[])))
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", server.uri()), &dir);
    config.crawler.max_pages = Some(1);
    config.crawler.workers = 4;

    let report = run_crawl(config).await.unwrap();
    assert_eq!(report.collected, 1);
    assert_eq!(read_documents(&dir).len(), 1);
}

#[tokio::test]
async fn test_page_budget_skips_queued_leaf_pages() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(article("Home", &["/a", "/b"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(article("Leaf A", &[])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(article("Leaf B", &[])))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", server.uri()), &dir);
    config.crawler.max_pages = Some(2);
    config.crawler.workers = 1;

    let report = run_crawl(config).await.unwrap();
    assert_eq!(report.collected, 2);
    assert_eq!(read_documents(&dir).len(), 2);
}

#[tokio::test]
async fn test_depth_limit_is_inclusive() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(article("Home", &["/one"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/one"))
        .respond_with(html(article("One", &["/two"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/two"))
        .respond_with(html(article("Two", &[])))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", server.uri()), &dir);
    config.crawler.max_depth = Some(1);

    let report = run_crawl(config).await.unwrap();
    assert_eq!(report.collected, 2);

    let docs = read_documents(&dir);
    let child = docs
        .iter()
        .find(|d| d.url.ends_with("/one"))
        .expect("depth-1 page collected");
    assert_eq!(child.parent_url.as_deref(), Some(format!("{}/", server.uri()).as_str()));
}

#[tokio::test]
async fn test_cached_page_is_not_fetched_again() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    let start_url = format!("{}/", server.uri());
    let child_url = format!("{}/child", server.uri());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(article("Home", &["/child"])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/child"))
        .respond_with(html(article("Child", &[])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    PageCache::open(cache_path(&dir))
        .unwrap()
        .write(PageEntry::new(start_url.clone(), vec![child_url.clone()]))
        .await
        .unwrap();

    let report = run_crawl(create_test_config(&start_url, &dir))
        .await
        .unwrap();

    // Cache hits do not count toward collected documents
    assert_eq!(report.collected, 1);
    let docs = read_documents(&dir);
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].url, child_url);
    assert_eq!(docs[0].parent_url.as_deref(), Some(start_url.as_str()));
}

#[tokio::test]
async fn test_second_run_reuses_cache() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(article("Home", &["/next"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html(article("Next", &[])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let start_url = format!("{}/", server.uri());

    let first = run_crawl(create_test_config(&start_url, &dir)).await.unwrap();
    assert_eq!(first.collected, 2);

    let second = run_crawl(create_test_config(&start_url, &dir)).await.unwrap();
    assert_eq!(second.collected, 0);
    assert_eq!(second.admitted, 2);

    // Documents from the first run are kept
    assert_eq!(read_documents(&dir).len(), 2);
}

#[tokio::test]
async fn test_server_errors_exhaust_attempts() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let report = run_crawl(create_test_config(&format!("{}/", server.uri()), &dir))
        .await
        .unwrap();

    assert_eq!(report.collected, 0);
    assert!(read_documents(&dir).is_empty());
    assert!(PageCache::open(cache_path(&dir)).unwrap().is_empty());
}

#[tokio::test]
async fn test_site_rules_drop_links_and_assign_page_types() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    let host = url::Url::parse(&server.uri())
        .map(|u| format!("{}:{}", u.host_str().unwrap(), u.port().unwrap()))
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(article(
            "Home",
            &["/guides/budgeting", "/archive/old", "/search?q=debt"],
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/guides/budgeting"))
        .respond_with(html(article("Budgeting", &[])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/archive/old"))
        .respond_with(html(article("Old", &[])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html(article("Search", &[])))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", server.uri()), &dir);
    config.sites = vec![SiteEntry {
        host,
        drop_prefix: vec!["/archive".to_string()],
        page_types: vec![PageTypeRule {
            prefix: "/guides".to_string(),
            page_type: "guide".to_string(),
        }],
    }];

    let report = run_crawl(config).await.unwrap();
    assert_eq!(report.collected, 2);

    let docs = read_documents(&dir);
    assert_eq!(docs.len(), 2);
    let guide = docs
        .iter()
        .find(|d| d.url.ends_with("/guides/budgeting"))
        .expect("guide page collected");
    assert_eq!(guide.page_type.as_deref(), Some("guide"));
}

#[tokio::test]
async fn test_page_without_content_is_cached_but_not_collected() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body><h1>Index</h1><p>Too short.</p><a href="/full">Full</a></body></html>"#
                .to_string(),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/full"))
        .respond_with(html(article("Full", &[])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let start_url = format!("{}/", server.uri());
    let report = run_crawl(create_test_config(&start_url, &dir))
        .await
        .unwrap();

    assert_eq!(report.collected, 1);
    let docs = read_documents(&dir);
    assert_eq!(docs.len(), 1);
    assert!(docs[0].url.ends_with("/full"));
    let cache = PageCache::open(cache_path(&dir)).unwrap();
    assert!(cache.exists(&start_url));
    assert!(cache.exists(&format!("{}/full", server.uri())));
}

#[test]
fn test_coordinator_requires_valid_start_url() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config("not a url", &dir);
    assert!(Coordinator::new(config).is_err());
}
