//! pharmawatch - print pharmaceutical regulatory and market data as JSON
//!
//! Builds the settings, one shared cache and the API clients, then runs a
//! single dashboard section or lookup.

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pharmawatch::cli::{Cli, Command};
use pharmawatch::{Dashboard, Settings};

/// Writes `value` to stdout as pretty JSON
fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::from_env();
    tracing::debug!(
        year = settings.year,
        openfda_key = settings.openfda_api_key.is_some(),
        finnhub_key = settings.finnhub_api_key.is_some(),
        "settings loaded"
    );

    let dashboard = Dashboard::from_settings(&settings);

    match cli.command {
        Command::Dashboard { approvals } => print_json(&dashboard.load_all(approvals).await),
        Command::Approvals { limit } => print_json(&dashboard.recent_approvals(limit).await),
        Command::Recalls => print_json(&dashboard.latest_recalls().await),
        Command::Quotes => print_json(&dashboard.pharma_quotes().await),
        Command::News => print_json(&dashboard.pharma_market_news().await),
        Command::Company { name } => print_json(&dashboard.company(&name).await),
        Command::Symbol { name } => print_json(&dashboard.market().resolve_symbol(&name).await),
        Command::Search { query } => print_json(&dashboard.market().search_symbols(&query).await),
        Command::History { symbol } => print_json(&dashboard.market().price_history(&symbol).await),
    }
}
