//! Environment-driven settings for the API clients
//!
//! Both API keys are optional. A missing openFDA key means unauthenticated
//! (rate-limited) queries; a missing Finnhub key disables symbol search.

use chrono::{Datelike, Utc};
use std::time::Duration;

use crate::http::DEFAULT_TIMEOUT_SECS;

/// Default openFDA API root
pub const OPENFDA_BASE_URL: &str = "https://api.fda.gov";

/// Default Finnhub API root
pub const FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";

#[derive(Debug, Clone)]
pub struct Settings {
    pub openfda_api_key: Option<String>,
    pub finnhub_api_key: Option<String>,
    pub openfda_base_url: String,
    pub finnhub_base_url: String,
    /// Calendar year that approvals and recalls are restricted to
    pub year: i32,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openfda_api_key: None,
            finnhub_api_key: None,
            openfda_base_url: OPENFDA_BASE_URL.to_string(),
            finnhub_base_url: FINNHUB_BASE_URL.to_string(),
            year: Utc::now().year(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            openfda_api_key: var("OPENFDA_API_KEY"),
            finnhub_api_key: var("FINNHUB_API_KEY"),
            openfda_base_url: var("OPENFDA_BASE_URL").unwrap_or(defaults.openfda_base_url),
            finnhub_base_url: var("FINNHUB_BASE_URL").unwrap_or(defaults.finnhub_base_url),
            year: var("PHARMAWATCH_YEAR")
                .and_then(|s| s.trim().parse::<i32>().ok())
                .unwrap_or(defaults.year),
            request_timeout: var("PHARMAWATCH_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}
