//! Command-line interface parsing for pharmawatch
//!
//! This module handles parsing of CLI arguments using clap. Each subcommand
//! maps to one dashboard section or lookup, printed as JSON.

use clap::{Parser, Subcommand};
use thiserror::Error;

/// Default number of approvals shown on the dashboard
pub const DEFAULT_APPROVALS_LIMIT: usize = 5;

/// Largest page size openFDA accepts without paging
pub const MAX_LIMIT: usize = 100;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The limit is not a number in range
    #[error("Invalid limit: '{0}'. Expected a number from 1 to 100")]
    InvalidLimit(String),
}

/// pharmawatch - FDA approvals, recalls and pharma market data
#[derive(Parser, Debug)]
#[command(name = "pharmawatch")]
#[command(about = "Pharmaceutical regulatory and market data from openFDA and Finnhub")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// All home page sections at once
    Dashboard {
        /// Number of approvals to include
        #[arg(long, default_value_t = DEFAULT_APPROVALS_LIMIT, value_parser = parse_limit_arg)]
        approvals: usize,
    },
    /// Recent drug application activity
    Approvals {
        #[arg(long, default_value_t = DEFAULT_APPROVALS_LIMIT, value_parser = parse_limit_arg)]
        limit: usize,
    },
    /// Latest drug recalls
    Recalls,
    /// Quotes for the pharma roster
    Quotes,
    /// Regulatory headlines from key movers
    News,
    /// Quote, profile, history and news for one company
    Company {
        /// Company name, e.g. "Eli Lilly and Company"
        name: String,
    },
    /// Resolve a company name to a ticker
    Symbol {
        name: String,
    },
    /// Symbol search matches for a free-text query
    Search {
        query: String,
    },
    /// 90 days of daily candles for a ticker
    History {
        symbol: String,
    },
}

/// Parses a page size argument
///
/// # Returns
/// * `Ok(usize)` for a number from 1 to 100
/// * `Err(CliError::InvalidLimit)` otherwise
pub fn parse_limit_arg(s: &str) -> Result<usize, CliError> {
    match s.trim().parse::<usize>() {
        Ok(n) if (1..=MAX_LIMIT).contains(&n) => Ok(n),
        _ => Err(CliError::InvalidLimit(s.to_string())),
    }
}
