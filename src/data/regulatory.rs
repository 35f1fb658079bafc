//! openFDA client for drug approvals and recall reports
//!
//! Fetches recent drug application activity and enforcement (recall) reports
//! for one calendar year and maps them into display records. Public operations
//! never fail: upstream problems are logged and turned into an empty list.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use super::{ApprovalRecord, RecallNewsItem};
use crate::cache::Cache;
use crate::config::Settings;
use crate::http::{FetchError, HttpTransport};

/// Path of the drug application endpoint
const APPROVALS_PATH: &str = "/drug/drugsfda.json";

/// Path of the drug enforcement (recall) endpoint
const ENFORCEMENT_PATH: &str = "/drug/enforcement.json";

/// Number of enforcement reports requested per refresh
pub const RECALL_LIMIT: usize = 10;

/// Number of product description characters kept in a recall title
const TITLE_DESCRIPTION_CHARS: usize = 60;

/// Public recall search page every recall item links to
pub const RECALL_LINK: &str = "https://www.accessdata.fda.gov/scripts/ires/index.cfm";

/// Errors that can occur when querying openFDA
#[derive(Debug, Error)]
pub enum RegulatoryError {
    /// Transport or JSON decoding failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Response JSON did not match the expected shape
    #[error("Unexpected response shape: {0}")]
    Schema(#[source] serde_json::Error),

    /// Valid response without a `results` array
    #[error("No results in response")]
    NoResults,
}

/// Envelope shared by all openFDA endpoints
#[derive(Debug, Deserialize)]
struct OpenFdaResponse<T> {
    results: Option<Vec<T>>,
}

/// A single enforcement report from openFDA
#[derive(Debug, Deserialize)]
struct EnforcementRecord {
    #[serde(default)]
    recalling_firm: String,
    #[serde(default)]
    product_description: String,
    #[serde(default)]
    reason_for_recall: String,
    #[serde(default)]
    status: String,
    /// Report date in YYYYMMDD format
    #[serde(default)]
    report_date: String,
}

/// Client for the openFDA drug endpoints
#[derive(Clone)]
pub struct RegulatoryClient {
    transport: Arc<dyn HttpTransport>,
    cache: Cache,
    base_url: String,
    api_key: Option<String>,
    year: i32,
}

impl std::fmt::Debug for RegulatoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegulatoryClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.api_key.is_some())
            .field("year", &self.year)
            .finish()
    }
}

impl RegulatoryClient {
    /// Creates a client from settings, sharing `cache` with the other clients
    pub fn new(transport: Arc<dyn HttpTransport>, cache: Cache, settings: &Settings) -> Self {
        Self {
            transport,
            cache,
            base_url: settings.openfda_base_url.trim_end_matches('/').to_string(),
            api_key: settings.openfda_api_key.clone(),
            year: settings.year,
        }
    }

    /// The calendar year results are restricted to
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Generates a cache key for an operation
    fn cache_key(operation: &str, limit: usize, year: i32) -> String {
        format!("{}_{}_{}", operation, limit, year)
    }

    /// `&api_key=...` when a key is configured, otherwise nothing
    fn auth_param(&self) -> String {
        match &self.api_key {
            Some(key) => format!("&api_key={}", key),
            None => String::new(),
        }
    }

    /// Bracketed openFDA date range covering the configured year
    fn year_range(&self) -> String {
        format!("[{0}0101+TO+{0}1231]", self.year)
    }

    /// URL for the most recently updated applications in the year window
    pub fn approvals_url(&self, limit: usize) -> String {
        format!(
            "{}{}?limit={}&sort=submissions.submission_status_date:desc&search=submissions.submission_status_date:{}{}",
            self.base_url,
            APPROVALS_PATH,
            limit,
            self.year_range(),
            self.auth_param()
        )
    }

    /// URL for the latest enforcement reports in the year window
    pub fn recalls_url(&self) -> String {
        format!(
            "{}{}?limit={}&sort=report_date:desc&search=report_date:{}{}",
            self.base_url,
            ENFORCEMENT_PATH,
            RECALL_LIMIT,
            self.year_range(),
            self.auth_param()
        )
    }

    /// Fetches applications with submission activity in the configured year
    ///
    /// # Returns
    /// At most `limit` records, newest status date first. Returns an empty
    /// list if the request fails, the response is malformed or nothing matched.
    ///
    /// # Behavior
    /// - A fresh cache entry short-circuits the network call
    /// - Only successful fetches are cached
    pub async fn recent_approvals(&self, limit: usize) -> Vec<ApprovalRecord> {
        if limit == 0 {
            return Vec::new();
        }

        let cache_key = Self::cache_key("approvals", limit, self.year);
        if let Some(cached) = self.cache.get::<Vec<ApprovalRecord>>(&cache_key) {
            return cached;
        }

        match self.fetch_approvals(limit).await {
            Ok(records) => {
                self.cache.set(&cache_key, &records);
                records
            }
            Err(err) => {
                tracing::warn!(limit, year = self.year, error = %err, "error fetching approvals");
                Vec::new()
            }
        }
    }

    /// Fetches the latest recalls as news items
    ///
    /// # Returns
    /// Up to ten items whose report date lies in the configured year, or an
    /// empty list on any failure.
    pub async fn latest_news(&self) -> Vec<RecallNewsItem> {
        let cache_key = Self::cache_key("recalls", RECALL_LIMIT, self.year);
        if let Some(cached) = self.cache.get::<Vec<RecallNewsItem>>(&cache_key) {
            return cached;
        }

        match self.fetch_recalls().await {
            Ok(items) => {
                self.cache.set(&cache_key, &items);
                items
            }
            Err(err) => {
                tracing::warn!(year = self.year, error = %err, "error fetching enforcement news");
                Vec::new()
            }
        }
    }

    async fn fetch_approvals(&self, limit: usize) -> Result<Vec<ApprovalRecord>, RegulatoryError> {
        let body = self.transport.get_json(&self.approvals_url(limit)).await?;
        let response: OpenFdaResponse<ApprovalRecord> =
            serde_json::from_value(body).map_err(RegulatoryError::Schema)?;
        let results = response.results.ok_or(RegulatoryError::NoResults)?;

        Ok(results
            .into_iter()
            .filter(|record| record.has_submission_in_year(self.year))
            .take(limit)
            .collect())
    }

    async fn fetch_recalls(&self) -> Result<Vec<RecallNewsItem>, RegulatoryError> {
        let body = self.transport.get_json(&self.recalls_url()).await?;
        let response: OpenFdaResponse<EnforcementRecord> =
            serde_json::from_value(body).map_err(RegulatoryError::Schema)?;
        let results = response.results.ok_or(RegulatoryError::NoResults)?;

        let year = self.year.to_string();
        Ok(results
            .iter()
            .filter(|record| record.report_date.starts_with(&year))
            .map(recall_to_news)
            .collect())
    }
}

/// Maps an enforcement report to a news item
fn recall_to_news(record: &EnforcementRecord) -> RecallNewsItem {
    RecallNewsItem {
        title: format!(
            "Recall: {} - {}...",
            record.recalling_firm,
            truncate_chars(&record.product_description, TITLE_DESCRIPTION_CHARS)
        ),
        link: RECALL_LINK.to_string(),
        publication_date: record.report_date.clone(),
        snippet: format!(
            "Status: {}. Reason: {}",
            record.status, record.reason_for_recall
        ),
    }
}

/// Returns at most the first `max` characters of `s`
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
