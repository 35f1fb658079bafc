//! End-to-end tests of the dashboard against a canned upstream

mod common;

use std::sync::Arc;

use chrono::Duration;
use pharmawatch::data::roster::PHARMA_SYMBOLS;

use common::{dashboard, healthy_api, FakeApi};

#[tokio::test]
async fn test_load_all_fills_every_section() {
    let api = Arc::new(healthy_api());
    let (dashboard, _clock) = dashboard(api.clone());

    let snapshot = dashboard.load_all(5).await;

    assert_eq!(snapshot.approvals.len(), 2);
    assert_eq!(snapshot.approvals[0].products[0].brand_name, "WEGOVY");
    assert_eq!(snapshot.recalls.len(), 1);
    assert!(snapshot.recalls[0]
        .title
        .starts_with("Recall: Generic Labs LLC - Metformin"));
    assert_eq!(snapshot.quotes.len(), PHARMA_SYMBOLS.len());
    // "raises dividend" items only match via "approves" in the summary, which
    // is not a keyword.
    assert_eq!(snapshot.market_news.len(), 5);
    assert_eq!(snapshot.market_news[0].related, "VRTX");

    // 1 approvals + 1 recalls + 20 quote/profile + 5 news
    assert_eq!(api.request_count(), 27);
}

#[tokio::test]
async fn test_load_all_twice_within_ttl_hits_cache() {
    let api = Arc::new(healthy_api());
    let (dashboard, clock) = dashboard(api.clone());

    let first = dashboard.load_all(5).await;
    clock.advance(Duration::minutes(4));
    let second = dashboard.load_all(5).await;

    assert_eq!(first, second);
    assert_eq!(api.request_count(), 27);

    clock.advance(Duration::minutes(1));
    dashboard.load_all(5).await;
    assert_eq!(api.request_count(), 54);
}

#[tokio::test]
async fn test_keys_are_sent_to_each_api() {
    let api = Arc::new(healthy_api());
    let (dashboard, _clock) = dashboard(api.clone());

    dashboard.load_all(5).await;

    for url in api.requests() {
        if url.contains("api.fda.gov") {
            assert!(url.ends_with("&api_key=fda-test"), "{}", url);
        } else {
            assert!(url.contains("token=fh-test"), "{}", url);
        }
    }
}

#[tokio::test]
async fn test_partial_outage_degrades_sections_independently() {
    let api = Arc::new(
        FakeApi::new()
            .fail_on("drugsfda.json")
            .on("enforcement.json", common::recalls_body())
            .fail_on("quote?symbol=JNJ")
            .on("/quote", serde_json::json!({ "c": 10.0, "d": 0.1, "dp": 1.0 }))
            .fail_on("/stock/profile2"),
    );
    let (dashboard, _clock) = dashboard(api);

    let snapshot = dashboard.load_all(5).await;

    assert!(snapshot.approvals.is_empty());
    assert_eq!(snapshot.recalls.len(), 1);
    assert_eq!(snapshot.quotes.len(), PHARMA_SYMBOLS.len() - 1);
    assert!(snapshot.quotes.iter().all(|q| q.symbol != "JNJ"));
    assert!(snapshot.quotes.iter().all(|q| q.name.is_none()));
    assert!(snapshot.market_news.is_empty());
}

#[tokio::test]
async fn test_company_lookup_by_sponsor_name() {
    let api = Arc::new(
        healthy_api().on(
            "/stock/candle",
            serde_json::json!({ "s": "ok", "t": [1788000000], "o": [1.0], "h": [1.0], "l": [1.0], "c": [1.0] }),
        ),
    );
    let (dashboard, _clock) = dashboard(api);

    let snapshot = dashboard.company("NOVO NORDISK INC").await;

    assert_eq!(snapshot.symbol.as_deref(), Some("NVO"));
    assert_eq!(
        snapshot.profile.and_then(|p| p.name).as_deref(),
        Some("Listed Pharma")
    );
    assert_eq!(snapshot.history.len(), 1);
    assert_eq!(snapshot.news.len(), 2);
}
