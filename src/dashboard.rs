//! Dashboard aggregation over the regulatory and market clients
//!
//! Each section fans out one request (or pair of requests) per symbol, joins
//! them, and caches the combined result. Branches turn their own failures into
//! empty values before the join, so one bad symbol never sinks the batch.

use std::sync::Arc;

use futures::future::join_all;

use crate::cache::Cache;
use crate::config::Settings;
use crate::data::roster::{KEY_MOVER_SYMBOLS, MARKET_NEWS_LIMIT, NEWS_KEYWORDS, PHARMA_SYMBOLS};
use crate::data::{
    ApprovalRecord, CompanyNewsItem, CompanySnapshot, DashboardSnapshot, MarketClient, Quote,
    RecallNewsItem, RegulatoryClient,
};
use crate::http::{HttpTransport, ReqwestTransport};

/// Composition of the API clients around one shared cache
#[derive(Debug, Clone)]
pub struct Dashboard {
    regulatory: RegulatoryClient,
    market: MarketClient,
    cache: Cache,
    year: i32,
}

impl Dashboard {
    /// Builds the clients over `transport`, all sharing `cache`
    pub fn new(transport: Arc<dyn HttpTransport>, cache: Cache, settings: &Settings) -> Self {
        Self {
            regulatory: RegulatoryClient::new(Arc::clone(&transport), cache.clone(), settings),
            market: MarketClient::new(transport, cache.clone(), settings),
            cache,
            year: settings.year,
        }
    }

    /// Builds a dashboard that talks to the real APIs with a fresh cache
    pub fn from_settings(settings: &Settings) -> Self {
        let transport = Arc::new(ReqwestTransport::with_timeout(settings.request_timeout));
        Self::new(transport, Cache::new(), settings)
    }

    pub fn regulatory(&self) -> &RegulatoryClient {
        &self.regulatory
    }

    pub fn market(&self) -> &MarketClient {
        &self.market
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Recent drug application activity, newest first
    pub async fn recent_approvals(&self, limit: usize) -> Vec<ApprovalRecord> {
        self.regulatory.recent_approvals(limit).await
    }

    /// Latest recalls as news items
    pub async fn latest_recalls(&self) -> Vec<RecallNewsItem> {
        self.regulatory.latest_news().await
    }

    /// Quotes for the pharma roster, in roster order
    ///
    /// # Behavior
    /// - Quote and profile for a symbol are requested together, and all
    ///   symbols are requested at once
    /// - A symbol whose quote fails is left out; a failed profile only leaves
    ///   `logo` and `name` unset
    /// - The combined list is cached as a single entry
    pub async fn pharma_quotes(&self) -> Vec<Quote> {
        let cache_key = format!("pharma_quotes_{}", self.year);
        if let Some(cached) = self.cache.get::<Vec<Quote>>(&cache_key) {
            return cached;
        }

        let lookups = PHARMA_SYMBOLS
            .iter()
            .map(|symbol| self.quote_with_profile(symbol));
        let quotes: Vec<Quote> = join_all(lookups).await.into_iter().flatten().collect();

        tracing::debug!(count = quotes.len(), "pharma quotes refreshed");
        self.cache.set(&cache_key, &quotes);
        quotes
    }

    /// Regulatory headlines from the key movers' company news
    ///
    /// Keeps stories mentioning FDA, APPROVAL, REJECT or CLINICAL, newest
    /// first, at most 15.
    pub async fn pharma_market_news(&self) -> Vec<CompanyNewsItem> {
        let cache_key = format!("pharma_market_news_{}", self.year);
        if let Some(cached) = self.cache.get::<Vec<CompanyNewsItem>>(&cache_key) {
            return cached;
        }

        let feeds = join_all(
            KEY_MOVER_SYMBOLS
                .iter()
                .map(|symbol| self.market.company_news(symbol)),
        )
        .await;
        let news = rank_market_news(feeds.into_iter().flatten());

        tracing::debug!(count = news.len(), "pharma market news refreshed");
        self.cache.set(&cache_key, &news);
        news
    }

    /// Everything shown on a company's detail page
    ///
    /// Resolves the ticker first, then requests quote, profile, history and
    /// news together. A company without a ticker gets an empty snapshot.
    pub async fn company(&self, company_name: &str) -> CompanySnapshot {
        let Some(symbol) = self.market.resolve_symbol(company_name).await else {
            return CompanySnapshot::unlisted(company_name);
        };

        let (quote, profile, history, news) = tokio::join!(
            self.market.quote(&symbol),
            self.market.company_profile(&symbol),
            self.market.price_history(&symbol),
            self.market.company_news(&symbol),
        );

        CompanySnapshot {
            company_name: company_name.to_string(),
            symbol: Some(symbol),
            quote,
            profile,
            history,
            news,
        }
    }

    /// All home page sections, fetched concurrently
    pub async fn load_all(&self, approvals_limit: usize) -> DashboardSnapshot {
        let (approvals, recalls, quotes, market_news) = tokio::join!(
            self.recent_approvals(approvals_limit),
            self.latest_recalls(),
            self.pharma_quotes(),
            self.pharma_market_news(),
        );

        DashboardSnapshot {
            approvals,
            recalls,
            quotes,
            market_news,
        }
    }

    async fn quote_with_profile(&self, symbol: &str) -> Option<Quote> {
        let (quote, profile) = tokio::join!(
            self.market.quote(symbol),
            self.market.company_profile(symbol)
        );

        let quote = quote?;
        Some(match profile {
            Some(profile) => quote.with_profile(profile),
            None => quote,
        })
    }
}

/// Filters news to regulatory keywords, newest first, capped at the limit
///
/// Items with equal timestamps keep their input order.
pub fn rank_market_news<I>(items: I) -> Vec<CompanyNewsItem>
where
    I: IntoIterator<Item = CompanyNewsItem>,
{
    let mut news: Vec<CompanyNewsItem> = items
        .into_iter()
        .filter(|item| item.mentions_any(&NEWS_KEYWORDS))
        .collect();
    news.sort_by(|a, b| b.datetime.cmp(&a.datetime));
    news.truncate(MARKET_NEWS_LIMIT);
    news
}
