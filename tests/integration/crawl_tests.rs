//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a miniature catalog and run the full
//! crawl cycle end-to-end over HTTP.

use catalog_walker::config::{parse_config, Config};
use catalog_walker::crawler::{run_crawl, Coordinator};
use catalog_walker::item::ItemRecord;
use catalog_walker::output::{build_sinks, FanOutSink, ItemSink, MemorySink, OutputResult, SqliteSink};
use catalog_walker::state::TaskOutcome;
use catalog_walker::storage::{RunStatus, SqliteStorage, Storage};
use catalog_walker::{BrowsePath, TaskKind};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the mock server
fn create_test_config(base_url: &str, output: &str) -> Config {
    parse_config(&format!(
        r#"
[crawler]
max-concurrent-fetches = 4
fetch-timeout-secs = 5
max-retries = 2
retry-base-delay-ms = 10
retry-max-delay-ms = 50

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[catalog]
seeds = ["{}/browse/"]
allowed-categories = ["in sunsh", "SUMMERTIME"]

{}
"#,
        base_url, output
    ))
    .expect("test config is valid")
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

fn category_page(children: &[(&str, &str)]) -> ResponseTemplate {
    let links: String = children
        .iter()
        .map(|(name, href)| format!(r#"<div><a href="{}"><h3> {} </h3></a></div>"#, href, name))
        .collect();
    html(format!(
        r#"<html><body><div id="subcats">{}</div></body></html>"#,
        links
    ))
}

fn listing_page(links: &[(&str, &str)]) -> ResponseTemplate {
    let links: String = links
        .iter()
        .map(|(text, href)| format!(r#"<a href="{}">{}</a>"#, href, text))
        .collect();
    html(format!(
        r#"<html><body><div id="body"><div>Showing results</div><div>{}</div></div></body></html>"#,
        links
    ))
}

fn item_page(title: &str) -> ResponseTemplate {
    html(format!(
        r#"<html><body><div id="body"><img src="/img/{0}.jpg">
<div id="content"><h1>{0}</h1><h2>Katsushika Hokusai</h2><h2>Workshop</h2>
<dl><dt>Date</dt><dd>1831</dd><dt>Medium</dt><dd>Woodblock print</dd>
<dt>Size</dt><dd>10 1/8 x 14 3/4 in. (25.7 x 37.5 cm) (sheet)</dd></dl>
<div><p>Print titled {0}.</p></div></div></div></body></html>"#,
        title
    ))
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Root with three top-level categories, two of them allowed
///
/// "In Sunsh" holds a two-page leaf; "Summertime" is a leaf itself.
async fn mount_catalog(server: &MockServer) {
    mount(
        server,
        "/browse/",
        category_page(&[
            ("In Sunsh", "/browse/sunsh"),
            ("Summertime", "/browse/summer"),
            ("Winter", "/browse/winter"),
        ]),
    )
    .await;

    mount(
        server,
        "/browse/sunsh",
        category_page(&[("Dawn", "/browse/sunsh/dawn")]),
    )
    .await;

    // The first listing page must be requested exactly once even though
    // the second page links back to it
    Mock::given(method("GET"))
        .and(path("/browse/sunsh/dawn"))
        .respond_with(listing_page(&[
            ("Red Fuji", "/item/1"),
            ("Great Wave", "/item/2"),
            ("Next", "/browse/sunsh/dawn/page/2"),
        ]))
        .expect(1)
        .mount(server)
        .await;

    mount(
        server,
        "/browse/sunsh/dawn/page/2",
        listing_page(&[("Prev", "/browse/sunsh/dawn"), ("Rain", "/item/3")]),
    )
    .await;

    mount(
        server,
        "/browse/summer",
        listing_page(&[("Fireworks", "/item/4")]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/browse/winter"))
        .respond_with(listing_page(&[("Snow", "/item/99")]))
        .expect(0)
        .mount(server)
        .await;

    for (id, title) in [(1, "Red Fuji"), (2, "Great Wave"), (3, "Rain"), (4, "Fireworks")] {
        mount(server, &format!("/item/{}", id), item_page(title)).await;
    }
}

fn breadcrumb(names: &[&str]) -> BrowsePath {
    BrowsePath::from(names.iter().map(|s| s.to_string()).collect::<Vec<_>>())
}

#[tokio::test]
async fn test_full_crawl_allowed_categories() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_catalog(&mock_server).await;

    let config = create_test_config(&base_url, "");
    let mut coordinator = Coordinator::with_http(&config).expect("Failed to create coordinator");
    let mut sink = MemorySink::new();
    let summary = coordinator.run(&mut sink).await.expect("Crawl failed");

    assert_eq!(summary.items_emitted, 4);
    assert_eq!(summary.total_failures(), 0);
    assert!(!summary.interrupted);

    let mut items = sink.items.clone();
    items.sort_by(|a, b| a.url.cmp(&b.url));

    let urls: Vec<String> = items.iter().map(|item| item.url.clone()).collect();
    assert_eq!(
        urls,
        (1..=4)
            .map(|id| format!("{}/item/{}", base_url, id))
            .collect::<Vec<_>>()
    );

    for item in &items[..3] {
        assert_eq!(item.path, breadcrumb(&["In Sunsh", "Dawn"]));
    }
    assert_eq!(items[3].path, breadcrumb(&["Summertime"]));

    let fuji = &items[0];
    assert_eq!(fuji.title.as_deref(), Some("Red Fuji"));
    assert_eq!(
        fuji.artist,
        vec!["Katsushika Hokusai".to_string(), "Workshop".to_string()]
    );
    assert_eq!(fuji.image, Some(format!("{}/img/Red Fuji.jpg", base_url).replace(' ', "%20")));
    assert_eq!(fuji.height, Some(25.7));
    assert_eq!(fuji.width, Some(37.5));
    assert_eq!(fuji.description.as_deref(), Some("Print titled Red Fuji."));

    // Dropping the server verifies the `expect` counts on the listing mocks
    drop(mock_server);
}

#[tokio::test]
async fn test_crawl_to_database_and_jsonl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_catalog(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("catalog.db");
    let jsonl_path = dir.path().join("items.jsonl");
    let config = create_test_config(
        &base_url,
        &format!(
            "[output]\njsonl-path = {:?}\ndatabase-path = {:?}",
            jsonl_path.display().to_string(),
            db_path.display().to_string()
        ),
    );

    let mut sinks = build_sinks(&config.output, "test-hash").unwrap();
    let summary = run_crawl(&config, &mut sinks).await.expect("Crawl failed");
    drop(sinks);
    assert_eq!(summary.items_emitted, 4);

    let lines = std::fs::read_to_string(&jsonl_path).unwrap();
    assert_eq!(lines.lines().count(), 4);
    for line in lines.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value["path"].is_array());
        assert!(value["url"].as_str().unwrap().starts_with(&base_url));
    }

    let storage = SqliteStorage::new(&db_path).unwrap();
    let run = storage.get_latest_run().unwrap().expect("run recorded");
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "test-hash");
    assert!(run.finished_at.is_some());

    assert_eq!(storage.count_items(run.id).unwrap(), 4);
    assert_eq!(
        storage.count_items_by_category(run.id).unwrap(),
        vec![("In Sunsh".to_string(), 3), ("Summertime".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_transient_errors_are_retried() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount(&mock_server, "/browse/", listing_page(&[("Only", "/item/1")])).await;

    // First attempt fails, the retry succeeds
    Mock::given(method("GET"))
        .and(path("/item/1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount(&mock_server, "/item/1", item_page("Survivor")).await;

    let config = create_test_config(&base_url, "");
    let mut sink = MemorySink::new();
    let summary = run_crawl(&config, &mut sink).await.expect("Crawl failed");

    assert_eq!(summary.items_emitted, 1);
    assert_eq!(summary.total_failures(), 0);
    assert_eq!(sink.items[0].title.as_deref(), Some("Survivor"));
    assert!(sink.items[0].path.is_empty());
}

#[tokio::test]
async fn test_dead_link_recorded_not_retried() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount(
        &mock_server,
        "/browse/",
        category_page(&[("Summertime", "/browse/summer")]),
    )
    .await;
    mount(
        &mock_server,
        "/browse/summer",
        listing_page(&[("Gone", "/item/404"), ("Here", "/item/1")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/item/404"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount(&mock_server, "/item/1", item_page("Here")).await;

    let config = create_test_config(&base_url, "");
    let mut sink = MemorySink::new();
    let summary = run_crawl(&config, &mut sink).await.expect("Crawl failed");

    assert_eq!(summary.items_emitted, 1);
    assert_eq!(sink.failures.len(), 1);

    let failure = &sink.failures[0];
    assert_eq!(failure.url, format!("{}/item/404", base_url));
    assert_eq!(failure.kind, TaskKind::Item);
    assert_eq!(failure.outcome, TaskOutcome::FetchFailed);
    assert_eq!(failure.path, breadcrumb(&["Summertime"]));
    assert!(failure.message.contains("404"));
}

/// A sink whose disk is full
struct FullDisk;

impl ItemSink for FullDisk {
    fn write_item(&mut self, _item: &ItemRecord) -> OutputResult<()> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "no space left on device").into())
    }
}

#[tokio::test]
async fn test_failed_output_marks_run_failed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount(&mock_server, "/browse/", listing_page(&[("Only", "/item/1")])).await;
    mount(&mock_server, "/item/1", item_page("Only")).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("catalog.db");

    let mut sinks = FanOutSink::new();
    sinks.push(Box::new(
        SqliteSink::new(SqliteStorage::new(&db_path).unwrap(), "test-hash").unwrap(),
    ));
    sinks.push(Box::new(FullDisk));

    let config = create_test_config(&base_url, "");
    let result = run_crawl(&config, &mut sinks).await;
    drop(sinks);
    assert!(result.is_err());

    let storage = SqliteStorage::new(&db_path).unwrap();
    let run = storage.get_latest_run().unwrap().expect("run recorded");
    assert_eq!(run.status, RunStatus::Failed);
    assert!(run.finished_at.is_some());
}
