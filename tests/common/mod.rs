//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use pharmawatch::cache::{Cache, ManualClock};
use pharmawatch::http::{FetchError, HttpTransport};
use pharmawatch::{Dashboard, Settings};

/// Canned upstream API that records every request
///
/// Requests are answered by the first rule whose pattern occurs in the URL.
#[derive(Default)]
pub struct FakeApi {
    rules: Vec<(String, Option<Value>)>,
    requests: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, pattern: &str, body: Value) -> Self {
        self.rules.push((pattern.to_string(), Some(body)));
        self
    }

    pub fn fail_on(mut self, pattern: &str) -> Self {
        self.rules.push((pattern.to_string(), None));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl HttpTransport for FakeApi {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.rules.iter().find(|(pattern, _)| url.contains(pattern.as_str())) {
            Some((_, Some(body))) => Ok(body.clone()),
            _ => Err(FetchError::Transport(format!("refused {}", url))),
        }
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 14, 0, 0).unwrap()
}

pub fn settings() -> Settings {
    Settings {
        openfda_api_key: Some("fda-test".to_string()),
        finnhub_api_key: Some("fh-test".to_string()),
        year: 2026,
        ..Settings::default()
    }
}

/// A dashboard over `api` with a manual clock and the default TTL
pub fn dashboard(api: Arc<FakeApi>) -> (Dashboard, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start_time()));
    let cache = Cache::with_clock(clock.clone(), Duration::minutes(5));
    (Dashboard::new(api, cache, &settings()), clock)
}

pub fn approvals_body() -> Value {
    json!({
        "meta": { "results": { "skip": 0, "limit": 5, "total": 2 } },
        "results": [
            {
                "application_number": "NDA217806",
                "sponsor_name": "NOVO NORDISK INC",
                "products": [{
                    "brand_name": "WEGOVY",
                    "marketing_status": "Prescription",
                    "active_ingredients": [{ "name": "SEMAGLUTIDE", "strength": "25MG" }]
                }],
                "submissions": [{ "submission_status_date": "20260822", "submission_type": "ORIG" }]
            },
            {
                "application_number": "BLA761248",
                "sponsor_name": "ELI LILLY AND CO",
                "products": [],
                "submissions": [{ "submission_status_date": "20260710", "submission_type": "SUPPL" }]
            }
        ]
    })
}

pub fn recalls_body() -> Value {
    json!({
        "results": [{
            "recall_number": "D-0420-2026",
            "reason_for_recall": "CGMP deviations",
            "status": "Ongoing",
            "product_description": "Metformin HCl extended-release tablets, 500 mg, 100-count bottles",
            "report_date": "20260826",
            "recalling_firm": "Generic Labs LLC"
        }]
    })
}

pub fn news_body(symbol: &str, base_time: i64) -> Value {
    json!([
        {
            "category": "company",
            "datetime": base_time,
            "headline": format!("{} gets FDA approval", symbol),
            "id": base_time,
            "image": "",
            "related": symbol,
            "source": "MarketWatch",
            "summary": "",
            "url": "https://example.com"
        },
        {
            "category": "company",
            "datetime": base_time + 10,
            "headline": format!("{} raises dividend", symbol),
            "id": base_time + 10,
            "image": "",
            "related": symbol,
            "source": "MarketWatch",
            "summary": "Board approves payout",
            "url": "https://example.com"
        }
    ])
}

/// An API that answers every dashboard endpoint successfully
pub fn healthy_api() -> FakeApi {
    FakeApi::new()
        .on("drugsfda.json", approvals_body())
        .on("enforcement.json", recalls_body())
        .on("/quote", json!({ "c": 120.5, "d": -1.25, "dp": -1.03 }))
        .on("/stock/profile2", json!({ "logo": "https://logo.png", "name": "Listed Pharma" }))
        .on("company-news?symbol=LLY", news_body("LLY", 1_788_000_000))
        .on("company-news?symbol=NVO", news_body("NVO", 1_788_100_000))
        .on("company-news?symbol=PFE", news_body("PFE", 1_788_200_000))
        .on("company-news?symbol=MRK", news_body("MRK", 1_788_300_000))
        .on("company-news?symbol=VRTX", news_body("VRTX", 1_788_400_000))
}
