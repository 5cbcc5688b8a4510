//! Integration tests for the crawl engine
//!
//! These tests run full crawls against wiremock servers and assert on the
//! result table, the inlink aggregation, and the concurrency behavior.

use sitegauge::config::{Config, CrawlerConfig, OutputConfig, ThresholdConfig, UserAgentConfig};
use sitegauge::crawler::CrawlEngine;
use sitegauge::status::{CountingReporter, ProblemKind};
use sitegauge::store::PageRecord;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(max_concurrent: u32, max_depth: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_depth,
            max_concurrent_fetches: max_concurrent,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestGauge".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/bot".to_string(),
            contact_email: "crawler@example.com".to_string(),
        },
        thresholds: ThresholdConfig::default(),
        output: OutputConfig {
            database_path: "./test.db".to_string(),
            summary_path: "./summary.md".to_string(),
        },
    }
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><head></head><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn run_crawl(
    server: &MockServer,
    config: Config,
) -> (sitegauge::crawler::CrawlReport, Arc<CountingReporter>) {
    let base = Url::parse(&format!("{}/", server.uri())).expect("parse base");
    let reporter = Arc::new(CountingReporter::new());
    let engine = CrawlEngine::with_reporter(config, base, reporter.clone()).expect("build engine");
    (engine.run().await, reporter)
}

fn find<'a>(pages: &'a [PageRecord], suffix: &str) -> Option<&'a PageRecord> {
    pages.iter().find(|r| r.address.ends_with(suffix))
}

#[tokio::test]
async fn test_full_crawl_with_inlink_aggregation() {
    let server = MockServer::start().await;

    // The base page links to page1 twice and page2 once; page1 links to
    // page2; fragment and mailto links must be discarded.
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r##"<a href="/page1">one</a>
                <a href="/page1">one again</a>
                <a href="/page2">two</a>
                <a href="#section2">anchor</a>
                <a href="mailto:x@root.com">mail</a>"##,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html_page(r#"<a href="/page2">two</a>"#))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html_page("no links here"))
        .mount(&server)
        .await;

    let (report, reporter) = run_crawl(&server, test_config(5, 3)).await;

    assert_eq!(report.pages.len(), 3, "expected 3 result rows");
    assert_eq!(report.visited_pages, 3);
    assert_eq!(report.pages_to_visit, 3);
    assert_eq!(reporter.finished_calls(), 1);

    // page1: linked twice from one page
    let page1 = find(&report.pages, "/page1").expect("page1 row");
    let stats = page1.inlinks.as_ref().expect("page1 inlinks");
    assert_eq!(stats.total, 2);
    assert_eq!(stats.unique, 1);
    assert_eq!(stats.unique_percent, "50.00");

    // page2: linked once each from two pages
    let page2 = find(&report.pages, "/page2").expect("page2 row");
    let stats = page2.inlinks.as_ref().expect("page2 inlinks");
    assert_eq!(stats.total, 2);
    assert_eq!(stats.unique, 2);
    assert_eq!(stats.unique_percent, "100.00");

    // Nothing links to the base page
    let base = report
        .pages
        .iter()
        .find(|r| Url::parse(&r.address).unwrap().path() == "/")
        .expect("base row");
    assert!(base.inlinks.is_none());
}

#[tokio::test]
async fn test_each_url_fetched_at_most_once() {
    let server = MockServer::start().await;

    // page1 links back to the base; neither may be fetched twice.
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/page1">a</a><a href="/page1">b</a><a href="/page1">c</a>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html_page(r#"<a href="/">home</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let (report, _) = run_crawl(&server, test_config(5, 3)).await;
    assert_eq!(report.pages.len(), 2);

    // MockServer verifies the expect(1) counts on drop.
}

#[tokio::test]
async fn test_404_page_gets_error_row_and_crawl_continues() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/missing">gone</a><a href="/page1">ok</a>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html_page("fine"))
        .mount(&server)
        .await;

    let (report, _) = run_crawl(&server, test_config(5, 3)).await;

    let missing = find(&report.pages, "/missing").expect("missing row");
    assert_eq!(missing.status, "404");
    assert!(missing.titles.is_empty());
    assert!(missing.inlinks.as_ref().is_some_and(|s| s.total == 1));

    // The failure did not stop the sibling page
    let page1 = find(&report.pages, "/page1").expect("page1 row");
    assert_eq!(page1.status, "200");
    assert_eq!(report.visited_pages, 3);
}

#[tokio::test]
async fn test_concurrency_never_exceeds_ceiling() {
    let server = MockServer::start().await;

    let links: String = (0..12)
        .map(|i| format!(r#"<a href="/page{}">p{}</a>"#, i, i))
        .collect();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&links))
        .mount(&server)
        .await;

    for i in 0..12 {
        Mock::given(method("GET"))
            .and(path(format!("/page{}", i)))
            .respond_with(html_page("leaf").set_delay(Duration::from_millis(50)))
            .mount(&server)
            .await;
    }

    let (report, reporter) = run_crawl(&server, test_config(3, 3)).await;

    assert_eq!(report.pages.len(), 13);
    assert!(
        reporter.max_active() <= 3,
        "active fetches peaked at {}",
        reporter.max_active()
    );
}

#[tokio::test]
async fn test_external_pages_fetched_but_not_recursed() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;

    // The mock servers both listen on 127.0.0.1 and classification compares
    // hosts only, so the external link goes through the `localhost` name to
    // get a different host for the same server.
    let external_port = Url::parse(&external.uri())
        .expect("parse external uri")
        .port()
        .expect("external port");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<a href="http://localhost:{}/landing">elsewhere</a>"#,
            external_port
        )))
        .mount(&site)
        .await;

    // The external page has a title and an onward link; neither may be
    // extracted or followed.
    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><head><title>External</title></head>
                       <body><a href="/onward">deeper</a></body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&external)
        .await;

    let (report, _) = run_crawl(&site, test_config(5, 3)).await;

    let landing = find(&report.pages, "/landing").expect("external row");
    assert_eq!(landing.status, "200");
    assert!(landing.titles.is_empty(), "external body must not be parsed");
    assert!(landing.inlinks.is_none(), "external targets get no inlinks");

    assert!(
        find(&report.pages, "/onward").is_none(),
        "external links must not be followed"
    );
}

#[tokio::test]
async fn test_depth_limit_stops_link_following() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/a/b.html">deep</a>"#))
        .mount(&server)
        .await;

    // Path depth 2 exceeds max_depth 1: the page itself is recorded, but its
    // links go nowhere.
    Mock::given(method("GET"))
        .and(path("/a/b.html"))
        .respond_with(html_page(r#"<a href="/never">too deep</a>"#))
        .mount(&server)
        .await;

    let (report, _) = run_crawl(&server, test_config(5, 1)).await;

    assert!(find(&report.pages, "/a/b.html").is_some());
    assert!(find(&report.pages, "/never").is_none());
    assert_eq!(report.pages.len(), 2);
}

#[tokio::test]
async fn test_document_relative_links_resolve_against_source_dir() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/xyz/aaa/index.html">idx</a>"#))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/xyz/aaa/index.html"))
        .respond_with(html_page(r#"<a href="abc.png">img</a>"#))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/xyz/aaa/abc.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0u8; 64])
                .insert_header("content-type", "image/png"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (report, _) = run_crawl(&server, test_config(5, 5)).await;

    let image = find(&report.pages, "/xyz/aaa/abc.png").expect("resolved image row");
    assert_eq!(image.status, "200");
    assert_eq!(image.byte_size, 64);
    assert!(image.content_type.contains("image"));
}

#[tokio::test]
async fn test_threshold_problems_reported_per_instance() {
    let server = MockServer::start().await;

    // "Tiny" is under both the char and pixel minimums; one report each.
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><head><title>Tiny</title></head><body></body></html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let (_, reporter) = run_crawl(&server, test_config(2, 3)).await;

    assert_eq!(reporter.problems(ProblemKind::TitleCharLength), 1);
    assert_eq!(reporter.problems(ProblemKind::TitlePixelWidth), 1);
    assert_eq!(reporter.total_problems(), 2);
}

#[tokio::test]
async fn test_abort_before_start_yields_empty_crawl() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("never fetched"))
        .expect(0)
        .mount(&server)
        .await;

    let base = Url::parse(&format!("{}/", server.uri())).unwrap();
    let reporter = Arc::new(CountingReporter::new());
    let engine =
        CrawlEngine::with_reporter(test_config(2, 3), base, reporter.clone()).expect("engine");

    engine.abort_handle().abort();
    let report = engine.run().await;

    assert!(report.pages.is_empty());
    assert_eq!(report.visited_pages, 0);
    assert_eq!(reporter.finished_calls(), 1);
}
