//! pharmawatch library
//!
//! Data access for a pharmaceutical news site: openFDA approvals and recalls,
//! Finnhub quotes and news, behind a shared five minute response cache.

pub mod cache;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod http;

pub use cache::Cache;
pub use config::Settings;
pub use dashboard::Dashboard;
