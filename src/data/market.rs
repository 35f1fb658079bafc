//! Finnhub market data client
//!
//! This module fetches quotes, company profiles, daily candles and company
//! news from the Finnhub API, and resolves company names to tickers through a
//! static override table with a symbol-search fallback.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::roster;
use super::{ChartPoint, CompanyNewsItem, CompanyProfile, Quote, SymbolMatch};
use crate::cache::{Cache, Clock};
use crate::config::Settings;
use crate::http::{FetchError, HttpTransport};

/// Placeholder key shipped in sample configs; never used for symbol search
const DEMO_KEY: &str = "DEMO";

/// Days of daily candles requested for price history
pub const HISTORY_DAYS: i64 = 90;

/// Days of company news requested per symbol
pub const NEWS_DAYS: i64 = 30;

/// Errors that can occur when querying Finnhub
#[derive(Debug, Error)]
pub enum MarketError {
    /// Transport or JSON decoding failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Response JSON did not match the expected shape
    #[error("Unexpected response shape: {0}")]
    Schema(#[source] serde_json::Error),

    /// Valid response that carried no data for the symbol
    #[error("No data for {0}")]
    NoData(String),

    /// Request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Symbol search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SymbolMatch>,
}

/// Daily candle response: parallel arrays plus a status string
#[derive(Debug, Deserialize)]
struct CandleResponse {
    #[serde(default)]
    o: Vec<f64>,
    #[serde(default)]
    h: Vec<f64>,
    #[serde(default)]
    l: Vec<f64>,
    #[serde(default)]
    c: Vec<f64>,
    #[serde(default)]
    t: Vec<i64>,
    /// "ok" or "no_data"
    s: String,
}

/// Real-time quote response
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// Change
    d: Option<f64>,
    /// Percent change
    dp: Option<f64>,
}

/// Client for the Finnhub REST API
#[derive(Clone)]
pub struct MarketClient {
    transport: Arc<dyn HttpTransport>,
    cache: Cache,
    clock: Arc<dyn Clock>,
    base_url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for MarketClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketClient")
            .field("base_url", &self.base_url)
            .field("search_enabled", &self.search_enabled())
            .finish()
    }
}

impl MarketClient {
    /// Creates a client from settings, sharing `cache` with the other clients
    ///
    /// Trailing date windows are measured on the cache's clock.
    pub fn new(transport: Arc<dyn HttpTransport>, cache: Cache, settings: &Settings) -> Self {
        let clock = cache.clock();
        Self {
            transport,
            cache,
            clock,
            base_url: settings.finnhub_base_url.trim_end_matches('/').to_string(),
            api_key: settings.finnhub_api_key.clone(),
        }
    }

    fn token(&self) -> &str {
        self.api_key.as_deref().unwrap_or("")
    }

    /// Whether a real (non-demo) key is configured
    pub fn search_enabled(&self) -> bool {
        matches!(&self.api_key, Some(key) if !key.eq_ignore_ascii_case(DEMO_KEY))
    }

    /// Builds `{base_url}{path}` with `params` plus the API token, query-encoded
    fn endpoint_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, MarketError> {
        let mut url = Url::parse_with_params(&format!("{}{}", self.base_url, path), params)
            .map_err(|err| MarketError::InvalidUrl(err.to_string()))?;
        url.query_pairs_mut().append_pair("token", self.token());
        Ok(url)
    }

    fn search_url(&self, query: &str) -> Result<Url, MarketError> {
        self.endpoint_url("/search", &[("q", query)])
    }

    fn candle_url(&self, symbol: &str, now: DateTime<Utc>) -> Result<Url, MarketError> {
        let to = now.timestamp();
        let from = to - Duration::days(HISTORY_DAYS).num_seconds();
        self.endpoint_url(
            "/stock/candle",
            &[
                ("symbol", symbol),
                ("resolution", "D"),
                ("from", &from.to_string()),
                ("to", &to.to_string()),
            ],
        )
    }

    fn quote_url(&self, symbol: &str) -> Result<Url, MarketError> {
        self.endpoint_url("/quote", &[("symbol", symbol)])
    }

    fn profile_url(&self, symbol: &str) -> Result<Url, MarketError> {
        self.endpoint_url("/stock/profile2", &[("symbol", symbol)])
    }

    fn news_url(&self, symbol: &str, now: DateTime<Utc>) -> Result<Url, MarketError> {
        let to = now.format("%Y-%m-%d").to_string();
        let from = (now - Duration::days(NEWS_DAYS)).format("%Y-%m-%d").to_string();
        self.endpoint_url(
            "/company-news",
            &[("symbol", symbol), ("from", &from), ("to", &to)],
        )
    }

    /// Resolves a company name to a ticker symbol
    ///
    /// # Behavior
    /// - The override table is consulted first (case-insensitive substring)
    /// - Otherwise, with a usable key, the first search hit without a `.` in
    ///   its symbol is preferred, falling back to the first hit
    /// - Results, including misses after a search, are cached per name
    pub async fn resolve_symbol(&self, company_name: &str) -> Option<String> {
        let cache_key = format!("symbol_{}", company_name);
        if let Some(cached) = self.cache.get::<Option<String>>(&cache_key) {
            return cached;
        }

        if let Some(symbol) = roster::override_symbol(company_name) {
            let symbol = Some(symbol.to_string());
            self.cache.set(&cache_key, &symbol);
            return symbol;
        }

        if !self.search_enabled() {
            return None;
        }

        let resolved = match self.fetch_search(company_name).await {
            Ok(matches) => pick_primary_listing(&matches).map(|m| m.symbol.clone()),
            Err(err) => {
                tracing::warn!(company = company_name, error = %err, "error searching symbol");
                None
            }
        };

        self.cache.set(&cache_key, &resolved);
        resolved
    }

    /// Searches for symbols matching `query`
    ///
    /// Returns an empty list without a usable key or on failure.
    pub async fn search_symbols(&self, query: &str) -> Vec<SymbolMatch> {
        if !self.search_enabled() {
            return Vec::new();
        }

        self.fetch_search(query).await.unwrap_or_else(|err| {
            tracing::warn!(query, error = %err, "error searching symbol");
            Vec::new()
        })
    }

    /// Fetches daily candles for the trailing 90 days, oldest first
    ///
    /// Returns an empty list if the status is not "ok", the series is empty or
    /// the request fails.
    pub async fn price_history(&self, symbol: &str) -> Vec<ChartPoint> {
        match self.fetch_candles(symbol).await {
            Ok(points) => points,
            Err(err) => {
                tracing::warn!(symbol, error = %err, "error fetching candles");
                Vec::new()
            }
        }
    }

    /// Fetches the latest quote, or `None` when the symbol has no price
    pub async fn quote(&self, symbol: &str) -> Option<Quote> {
        match self.fetch_quote(symbol).await {
            Ok(quote) => Some(quote),
            Err(err) => {
                tracing::warn!(symbol, error = %err, "error fetching quote");
                None
            }
        }
    }

    /// Fetches the logo and display name for a symbol
    ///
    /// `None` only when the request or decoding fails; a profile without
    /// those fields comes back with `None` members.
    pub async fn company_profile(&self, symbol: &str) -> Option<CompanyProfile> {
        match self.fetch_profile(symbol).await {
            Ok(profile) => Some(profile),
            Err(err) => {
                tracing::warn!(symbol, error = %err, "error fetching profile");
                None
            }
        }
    }

    /// Fetches company news for the trailing 30 days
    ///
    /// Returns an empty list on failure or when the response is not an array.
    pub async fn company_news(&self, symbol: &str) -> Vec<CompanyNewsItem> {
        match self.fetch_news(symbol).await {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(symbol, error = %err, "error fetching news");
                Vec::new()
            }
        }
    }

    async fn fetch_search(&self, query: &str) -> Result<Vec<SymbolMatch>, MarketError> {
        let url = self.search_url(query)?;
        let body = self.transport.get_json(url.as_str()).await?;
        let response: SearchResponse = serde_json::from_value(body).map_err(MarketError::Schema)?;
        Ok(response.result)
    }

    async fn fetch_candles(&self, symbol: &str) -> Result<Vec<ChartPoint>, MarketError> {
        let url = self.candle_url(symbol, self.clock.now())?;
        let body = self.transport.get_json(url.as_str()).await?;
        let candles: CandleResponse = serde_json::from_value(body).map_err(MarketError::Schema)?;

        if candles.s != "ok" || candles.t.is_empty() {
            return Err(MarketError::NoData(symbol.to_string()));
        }

        Ok(candles_to_points(&candles))
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketError> {
        let url = self.quote_url(symbol)?;
        let body = self.transport.get_json(url.as_str()).await?;
        let response: QuoteResponse = serde_json::from_value(body).map_err(MarketError::Schema)?;

        // Unknown symbols come back with a zero price.
        let price = response
            .c
            .filter(|price| *price != 0.0)
            .ok_or_else(|| MarketError::NoData(symbol.to_string()))?;

        Ok(Quote {
            symbol: symbol.to_string(),
            price,
            change: response.d.unwrap_or_default(),
            percent_change: response.dp.unwrap_or_default(),
            logo: None,
            name: None,
        })
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, MarketError> {
        let url = self.profile_url(symbol)?;
        let body = self.transport.get_json(url.as_str()).await?;
        serde_json::from_value(body).map_err(MarketError::Schema)
    }

    async fn fetch_news(&self, symbol: &str) -> Result<Vec<CompanyNewsItem>, MarketError> {
        let url = self.news_url(symbol, self.clock.now())?;
        let body = self.transport.get_json(url.as_str()).await?;

        let Value::Array(items) = body else {
            return Err(MarketError::NoData(symbol.to_string()));
        };

        Ok(items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<CompanyNewsItem>(item) {
                Ok(news) => Some(news),
                Err(err) => {
                    tracing::debug!(symbol, error = %err, "skipping malformed news item");
                    None
                }
            })
            .collect())
    }
}

/// Picks the primary-exchange listing from search hits
///
/// Symbols with a `.` are usually foreign listings (e.g. "NOVO-B.CO").
fn pick_primary_listing(matches: &[SymbolMatch]) -> Option<&SymbolMatch> {
    matches
        .iter()
        .find(|m| !m.symbol.contains('.'))
        .or_else(|| matches.first())
}

/// Zips the candle arrays into points, dropping any unmatched tail
fn candles_to_points(candles: &CandleResponse) -> Vec<ChartPoint> {
    let len = [
        candles.t.len(),
        candles.o.len(),
        candles.h.len(),
        candles.l.len(),
        candles.c.len(),
    ]
    .into_iter()
    .min()
    .unwrap_or(0);

    (0..len)
        .filter_map(|i| {
            let date = DateTime::from_timestamp(candles.t[i], 0)?;
            Some(ChartPoint {
                time: date.format("%Y-%m-%d").to_string(),
                open: candles.o[i],
                high: candles.h[i],
                low: candles.l[i],
                close: candles.c[i],
            })
        })
        .collect()
}
