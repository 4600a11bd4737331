//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run whole crawls
//! end-to-end: fetching, streaming extraction, and fan-in of every worker.

use std::collections::HashSet;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use sumi_glean::config::Config;
use sumi_glean::crawler::{crawl, run_crawl, Coordinator};
use sumi_glean::output::format_report;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Markup for one complete item
fn item_html(id: &str, image: &str, href: &str, title: &str) -> String {
    format!(
        r#"<div class="card"><span title="{}"><img src="{}"/><a href="{}" title="{}">{}</a></span></div>"#,
        id, image, href, title, title
    )
}

fn page(body: &str) -> String {
    format!("<html><head><title>Listing</title></head><body>{}</body></html>", body)
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    mount_page_with_status(server, route, 200, body).await;
}

async fn mount_page_with_status(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Nothing listens on port 1
const UNREACHABLE: &str = "http://127.0.0.1:1";

#[tokio::test]
async fn test_one_page_ok_one_page_failing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/a",
        page(&item_html("x1", "/i.png", "http://dest/a", "A")),
    )
    .await;

    let seeds = vec![format!("{}/a", base_url), format!("{}/b", UNREACHABLE)];
    let report = run_crawl(Config::default(), &seeds)
        .await
        .expect("crawl should start");

    assert_eq!(report.workers, 2);
    assert_eq!(report.items.len(), 1);
    let item = &report.items[0];
    assert_eq!(item.id(), "x1");
    assert_eq!(item.image_ref(), "/i.png");
    assert_eq!(item.page_ref(), "http://dest/a");
    assert_eq!(item.title(), "A");

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].seed, seeds[1]);

    let listing = format_report(&report);
    assert!(listing.contains("Found 1 items:"));
    assert!(listing.contains("x1, http://dest/a, A"));
}

#[tokio::test]
async fn test_unreachable_seed_is_contained() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/ok",
        page(&item_html("x1", "/i.png", "http://dest/a", "A")),
    )
    .await;

    let seeds = vec![
        format!("{}/", UNREACHABLE),
        format!("{}/ok", mock_server.uri()),
    ];
    let report = run_crawl(Config::default(), &seeds).await.unwrap();

    assert_eq!(report.items.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].seed, "http://127.0.0.1:1/");
}

#[tokio::test]
async fn test_fan_in_completeness() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let mut expected = HashSet::new();
    let mut seeds = Vec::new();

    // Four good pages carrying 0, 1, 2 and 3 items
    for (page_no, count) in [0usize, 1, 2, 3].into_iter().enumerate() {
        let mut body = String::new();
        for n in 0..count {
            let id = format!("p{}-{}", page_no, n);
            let href = format!("http://dest/{}", id);
            body.push_str(&item_html(&id, "/i.png", &href, &id));
            expected.insert((id, href));
        }
        let route = format!("/good{}", page_no);
        mount_page(&mock_server, &route, page(&body)).await;
        seeds.push(format!("{}{}", base_url, route));
    }

    // Two seeds that cannot be fetched
    seeds.push(format!("{}/gone", UNREACHABLE));
    seeds.push(format!("{}/broken", UNREACHABLE));

    let report = run_crawl(Config::default(), &seeds).await.unwrap();

    assert_eq!(report.workers, 6);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.succeeded(), 4);
    assert_eq!(report.items.len(), 6);

    let found: HashSet<(String, String)> = report
        .items
        .iter()
        .map(|item| (item.id().to_string(), item.page_ref().to_string()))
        .collect();
    assert_eq!(found, expected);
}

#[tokio::test]
async fn test_error_status_pages_are_still_scanned() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page_with_status(
        &mock_server,
        "/soft404",
        404,
        page(&item_html("x1", "/i.png", "http://dest/a", "A")),
    )
    .await;
    mount_page_with_status(&mock_server, "/empty500", 500, String::new()).await;

    let seeds = vec![
        format!("{}/soft404", base_url),
        format!("{}/empty500", base_url),
    ];
    let report = run_crawl(Config::default(), &seeds).await.unwrap();

    assert!(report.failures.is_empty());
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.items.len(), 1);
    assert_eq!(report.items[0].id(), "x1");
    assert_eq!(report.items[0].page_ref(), "http://dest/a");
}

#[tokio::test]
async fn test_body_cut_off_midway_keeps_sent_items() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // Read the whole request head so closing the socket sends a clean FIN
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let complete = item_html("x1", "/i.png", "http://dest/a", "A");
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nTransfer-Encoding: chunked\r\n\r\n",
            )
            .await
            .unwrap();
        socket
            .write_all(format!("{:x}\r\n{}\r\n", complete.len(), complete).as_bytes())
            .await
            .unwrap();
        // Announce a large chunk, send a partial item, then hang up
        socket
            .write_all(b"400\r\n<span title=\"x2\"><img src=\"/j.png\"/>")
            .await
            .unwrap();
        socket.flush().await.unwrap();
    });

    let seed = format!("http://{}/cut", addr);
    let report = run_crawl(Config::default(), &[seed.clone()]).await.unwrap();

    assert_eq!(report.items.len(), 1);
    assert_eq!(report.items[0].id(), "x1");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].seed, seed);
    assert!(report.failures[0].error.starts_with("Failed reading body"));
}

#[tokio::test]
async fn test_items_from_one_page_keep_stream_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let body = format!(
        "{}{}",
        item_html("first", "/1.png", "http://dest/1", "One"),
        item_html("second", "/2.png", "https://dest/2", "Two")
    );
    mount_page(&mock_server, "/pair", page(&body)).await;
    mount_page(
        &mock_server,
        "/other",
        page(&item_html("o1", "/o.png", "http://dest/o", "O")),
    )
    .await;

    let seeds = vec![format!("{}/pair", base_url), format!("{}/other", base_url)];
    let report = run_crawl(Config::default(), &seeds).await.unwrap();
    assert_eq!(report.items.len(), 3);

    let pair_order: Vec<&str> = report
        .items
        .iter()
        .map(|item| item.id())
        .filter(|id| *id == "first" || *id == "second")
        .collect();
    assert_eq!(pair_order, vec!["first", "second"]);
}

#[tokio::test]
async fn test_relative_link_page_yields_nothing() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/relative",
        page(&item_html("x1", "/i.png", "/dest/a", "A")),
    )
    .await;

    let seeds = vec![format!("{}/relative", mock_server.uri())];
    let report = run_crawl(Config::default(), &seeds).await.unwrap();

    assert!(report.items.is_empty());
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_empty_seed_list() {
    let report = run_crawl(Config::default(), &[]).await.unwrap();
    assert_eq!(report.workers, 0);
    assert!(report.items.is_empty());
    assert_eq!(format_report(&report), "\nFound 0 items:\n");
}

#[tokio::test]
async fn test_large_page_with_tiny_item_buffer() {
    let mock_server = MockServer::start().await;

    let mut body = String::new();
    for n in 0..500 {
        body.push_str(&item_html(
            &format!("x{}", n),
            "/i.png",
            &format!("http://dest/{}", n),
            "T",
        ));
    }
    mount_page(&mock_server, "/big", page(&body)).await;
    mount_page(
        &mock_server,
        "/small",
        page(&item_html("s1", "/s.png", "http://dest/s", "S")),
    )
    .await;

    let mut config = Config::default();
    config.crawl.item_buffer = 1;
    let seeds = vec![
        format!("{}/big", mock_server.uri()),
        format!("{}/small", mock_server.uri()),
    ];
    let report = run_crawl(config, &seeds).await.unwrap();

    assert_eq!(report.items.len(), 501);
    let big: Vec<&str> = report
        .items
        .iter()
        .map(|item| item.id())
        .filter(|id| *id != "s1")
        .collect();
    let expected: Vec<String> = (0..500).map(|n| format!("x{}", n)).collect();
    assert_eq!(big, expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_slow_page_does_not_lose_fast_items() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page(&item_html("slow", "/s.png", "http://dest/slow", "")))
                .insert_header("content-type", "text/html")
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/fast",
        page(&item_html("fast", "/f.png", "http://dest/fast", "F")),
    )
    .await;

    let seeds = vec![
        format!("{}/slow", mock_server.uri()),
        format!("{}/fast", mock_server.uri()),
    ];
    let report = run_crawl(Config::default(), &seeds).await.unwrap();

    let ids: HashSet<&str> = report.items.iter().map(|item| item.id()).collect();
    assert_eq!(ids, HashSet::from(["slow", "fast"]));
    // The fast page cannot have waited for the slow one
    assert_eq!(report.items[0].id(), "fast");
}

#[tokio::test]
async fn test_request_timeout_is_a_seed_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stuck"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.fetch.timeout_secs = Some(1);
    let seeds = vec![format!("{}/stuck", mock_server.uri())];
    let report = run_crawl(config, &seeds).await.unwrap();

    assert!(report.items.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].error.contains("timeout"));
}

#[tokio::test]
async fn test_config_seeds_are_crawled_after_cli_seeds() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/cli",
        page(&item_html("cli", "/c.png", "http://dest/cli", "")),
    )
    .await;
    mount_page(
        &mock_server,
        "/cfg",
        page(&item_html("cfg", "/g.png", "http://dest/cfg", "")),
    )
    .await;

    let mut config = Config::default();
    config.crawl.seeds = vec![format!("{}/cfg", mock_server.uri())];

    let report = crawl(config, vec![format!("{}/cli", mock_server.uri())])
        .await
        .unwrap();

    assert_eq!(report.workers, 2);
    let ids: HashSet<&str> = report.items.iter().map(|item| item.id()).collect();
    assert_eq!(ids, HashSet::from(["cli", "cfg"]));
}

#[tokio::test]
async fn test_coordinator_can_run_twice() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/a",
        page(&item_html("x1", "/i.png", "http://dest/a", "A")),
    )
    .await;

    let coordinator = Coordinator::new(Config::default()).unwrap();
    let seeds = vec![format!("{}/a", mock_server.uri())];

    let first = coordinator.run(&seeds).await;
    let second = coordinator.run(&seeds).await;
    assert_eq!(first.items, second.items);
    assert_eq!(second.items.len(), 1);
}
