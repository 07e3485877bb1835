//! Behavior tests for the HTTP surface
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; Yahoo is
//! replaced by a scripted transport.

use std::io::Write;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use clap::Parser;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tickerboard_core::http_client::HttpFuture;
use tickerboard_core::{HttpClient, HttpRequest, HttpResponse, ScriptedHttpClient};
use tickerboard_web::{router, Config};
use tower::ServiceExt;

const IDENTIFIERS: &str = r#"{
  "data": [
    { "kode": "BBCA", "nama": "Bank Central Asia" },
    { "kode": "BBRI", "nama": "Bank Rakyat Indonesia" },
    { "kode": "TLKM", "nama": "Telkom Indonesia" }
  ]
}"#;

const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>BBCA.JK</title><link>https://finance.yahoo.com/</link><description>news</description>
  <item>
    <title>BCA cetak laba</title>
    <link>https://example.test/bca</link>
    <pubDate>Mon, 06 Oct 2025 03:15:00 +0000</pubDate>
    <description>Laba &lt;b&gt;naik&lt;/b&gt;</description>
  </item>
</channel></rss>"#;

struct TestApp {
    router: Router,
    _identifiers: Option<NamedTempFile>,
}

fn app_with(identifiers: Option<&str>, client: impl HttpClient + 'static) -> TestApp {
    let (path, file) = match identifiers {
        Some(contents) => {
            let mut file = NamedTempFile::new().expect("temp file");
            file.write_all(contents.as_bytes()).expect("write identifiers");
            (file.path().to_path_buf(), Some(file))
        }
        None => (std::env::temp_dir().join("tickerboard-missing-identifiers.json"), None),
    };

    let config = Config::try_parse_from([
        "tickerboard",
        "--identifiers",
        path.to_str().expect("utf-8 temp path"),
    ])
    .expect("config parses");
    let state = Arc::new(config.app_state(Arc::new(client)));

    TestApp {
        router: router(state),
        _identifiers: file,
    }
}

/// Transport that blows up on every request.
struct PanickingHttpClient;

impl HttpClient for PanickingHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        panic!("transport failure for {}", request.url);
    }
}

fn scripted_yahoo() -> ScriptedHttpClient {
    ScriptedHttpClient::new()
        .respond("fc.yahoo.com", HttpResponse::ok(""))
        .respond("getcrumb", HttpResponse::ok("crumb123"))
        .respond(
            "symbols=BBCA.JK",
            HttpResponse::ok(
                json!({ "quoteResponse": { "result": [{ "regularMarketPrice": 9850 }], "error": null } })
                    .to_string(),
            ),
        )
        .respond("headline?s=BBCA.JK", HttpResponse::ok(FEED))
        .fail("headline?s=TLKM.JK", "feed unreachable")
}

async fn get(app: &TestApp, uri: &str) -> (StatusCode, Option<String>, Value) {
    let response = app
        .router
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
        .await
        .expect("router answers");

    let status = response.status();
    let cache_control = response
        .headers()
        .get(header::CACHE_CONTROL)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = serde_json::from_slice(&bytes).expect("json body");

    (status, cache_control, body)
}

// =============================================================================
// GET /api/stock
// =============================================================================

#[tokio::test]
async fn stock_returns_one_entry_per_identifier_in_order() {
    // Given: Three identifiers, only BBCA has upstream data
    let app = app_with(Some(IDENTIFIERS), scripted_yahoo());

    // When: The dashboard loads the stock table
    let (status, _, body) = get(&app, "/api/stock").await;

    // Then: Every identifier has a slot with defaults where data is missing
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().expect("data array");
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["kode"], "BBCA");
    assert_eq!(data[0]["price"], 9850.0);
    assert_eq!(data[0]["sector"], "-");
    assert_eq!(data[0]["fullTimeEmployees"], "-");
    assert_eq!(data[1]["kode"], "BBRI");
    assert_eq!(data[1]["price"], 0.0);
    assert_eq!(data[2]["nama"], "Telkom Indonesia");
}

#[tokio::test]
async fn stock_answers_500_when_identifiers_cannot_load() {
    let app = app_with(None, scripted_yahoo());

    let (status, _, body) = get(&app, "/api/stock").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Terjadi kesalahan pada server" }));
}

#[tokio::test]
async fn stock_answers_500_for_malformed_identifiers() {
    let app = app_with(Some(r#"{"data":{}}"#), scripted_yahoo());

    let (status, _, body) = get(&app, "/api/stock").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

// =============================================================================
// GET /api/news/{symbol}
// =============================================================================

#[tokio::test]
async fn news_resolves_symbol_case_insensitively() {
    // Given: The feed has one headline for BBCA
    let app = app_with(Some(IDENTIFIERS), scripted_yahoo());

    // When: A lowercase symbol is requested
    let (status, cache_control, body) = get(&app, "/api/news/bbca").await;

    // Then: The canonical identifier and normalized headline come back
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        cache_control.as_deref(),
        Some("public, s-maxage=300, stale-while-revalidate=600")
    );
    assert_eq!(body["kode"], "BBCA");
    assert_eq!(body["nama"], "Bank Central Asia");
    assert_eq!(
        body["news"],
        json!([{
            "title": "BCA cetak laba",
            "link": "https://example.test/bca",
            "date": "Mon, 06 Oct 2025 03:15:00 +0000",
            "summary": "Laba naik"
        }])
    );
}

#[tokio::test]
async fn unknown_symbol_is_404_with_uppercased_name() {
    let app = app_with(Some(IDENTIFIERS), scripted_yahoo());

    let (status, cache_control, body) = get(&app, "/api/news/xyz").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(cache_control, None);
    assert_eq!(body, json!({ "error": "Saham XYZ tidak ditemukan" }));
}

#[tokio::test]
async fn feed_failure_still_returns_report_with_no_news() {
    let app = app_with(Some(IDENTIFIERS), scripted_yahoo());

    let (status, _, body) = get(&app, "/api/news/TLKM").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kode"], "TLKM");
    assert_eq!(body["news"], json!([]));
}

#[tokio::test]
async fn news_answers_500_when_identifiers_cannot_load() {
    let app = app_with(None, scripted_yahoo());

    let (status, _, _) = get(&app, "/api/news/BBCA").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Unexpected failures
// =============================================================================

#[tokio::test]
async fn panicking_news_path_answers_generic_500() {
    // Given: The upstream transport panics on every request
    let app = app_with(Some(IDENTIFIERS), PanickingHttpClient);

    // When: News is requested for a known symbol
    let (status, cache_control, body) = get(&app, "/api/news/BBCA").await;

    // Then: The client still gets a JSON 500 without internals
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(cache_control, None);
    assert_eq!(body, json!({ "error": "Terjadi kesalahan pada server" }));
}

#[tokio::test]
async fn panicking_quote_slots_still_fill_the_batch() {
    // Given: The upstream transport panics on every request
    let app = app_with(Some(IDENTIFIERS), PanickingHttpClient);

    // When: The stock table is requested
    let (status, _, body) = get(&app, "/api/stock").await;

    // Then: Each identifier has a placeholder slot
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().expect("data array");
    assert_eq!(data.len(), 3);
    assert!(data.iter().all(|slot| slot["error"] == "Data tidak tersedia"));
}
