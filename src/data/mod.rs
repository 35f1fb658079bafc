//! Core data models for pharmawatch
//!
//! This module contains the display records built from openFDA and Finnhub
//! responses. Every record is derived entirely from its upstream payload and
//! round-trips through serde so it can live in the response cache.

pub mod market;
pub mod regulatory;
pub mod roster;

pub use market::{MarketClient, MarketError};
pub use regulatory::{RegulatoryClient, RegulatoryError};

use serde::{Deserialize, Serialize};

/// A drug application with recent submission activity (openFDA drugsfda)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    /// FDA application number, e.g. "NDA215256"
    #[serde(default)]
    pub application_number: String,
    /// Company holding the application
    #[serde(default)]
    pub sponsor_name: String,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub submissions: Vec<Submission>,
}

/// A marketed product under an application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub brand_name: String,
    /// e.g. "Prescription", "Discontinued"
    #[serde(default)]
    pub marketing_status: String,
    #[serde(default)]
    pub active_ingredients: Vec<ActiveIngredient>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveIngredient {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub strength: String,
}

/// One regulatory submission against an application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Status date in YYYYMMDD format
    #[serde(default)]
    pub submission_status_date: String,
    /// e.g. "ORIG", "SUPPL"
    #[serde(default)]
    pub submission_type: String,
}

impl ApprovalRecord {
    /// Whether any submission's status date falls in `year`
    pub fn has_submission_in_year(&self, year: i32) -> bool {
        let prefix = year.to_string();
        self.submissions
            .iter()
            .any(|s| s.submission_status_date.len() == 8 && s.submission_status_date.starts_with(&prefix))
    }
}

/// A recall/enforcement report rendered as a news item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallNewsItem {
    pub title: String,
    pub link: String,
    /// Report date in YYYYMMDD format
    pub publication_date: String,
    pub snippet: String,
}

/// Latest price for a ticker, optionally decorated with company details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    /// Current price
    pub price: f64,
    /// Absolute change since previous close
    pub change: f64,
    /// Percent change since previous close
    pub percent_change: f64,
    /// Logo URL from the company profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Company name from the company profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Quote {
    /// Copies profile fields onto the quote
    pub fn with_profile(mut self, profile: CompanyProfile) -> Self {
        self.logo = profile.logo;
        self.name = profile.name;
        self
    }
}

/// Display fields from a company profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// One daily OHLC candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Calendar day (UTC) in YYYY-MM-DD format
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// A company news article as returned by Finnhub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyNewsItem {
    #[serde(default)]
    pub category: String,
    /// Publication time in unix seconds
    pub datetime: i64,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub image: String,
    /// Comma-separated related symbols
    #[serde(default)]
    pub related: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: String,
}

impl CompanyNewsItem {
    /// Whether the headline or summary mentions any of `keywords`
    ///
    /// Matching is case-insensitive; keywords are expected in upper case.
    pub fn mentions_any(&self, keywords: &[&str]) -> bool {
        let text = format!("{} {}", self.headline, self.summary).to_uppercase();
        keywords.iter().any(|k| text.contains(k))
    }
}

/// A symbol search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub symbol: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "displaySymbol")]
    pub display_symbol: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Everything shown for a single company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySnapshot {
    pub company_name: String,
    pub symbol: Option<String>,
    pub quote: Option<Quote>,
    pub profile: Option<CompanyProfile>,
    pub history: Vec<ChartPoint>,
    pub news: Vec<CompanyNewsItem>,
}

impl CompanySnapshot {
    /// A snapshot for a company with no known ticker
    pub fn unlisted(company_name: &str) -> Self {
        Self {
            company_name: company_name.to_string(),
            symbol: None,
            quote: None,
            profile: None,
            history: Vec::new(),
            news: Vec::new(),
        }
    }
}

/// The home page sections, fetched together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub approvals: Vec<ApprovalRecord>,
    pub recalls: Vec<RecallNewsItem>,
    pub quotes: Vec<Quote>,
    pub market_news: Vec<CompanyNewsItem>,
}
