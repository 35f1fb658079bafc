//! Static ticker tables
//!
//! The dashboard roster, the news subset, the name-to-ticker overrides and the
//! keywords that mark regulatory news.

/// Tickers shown on the quotes board, in display order
pub static PHARMA_SYMBOLS: [&str; 10] = [
    "LLY",  // Eli Lilly
    "NVO",  // Novo Nordisk
    "JNJ",  // Johnson & Johnson
    "MRK",  // Merck
    "ABBV", // AbbVie
    "PFE",  // Pfizer
    "AMGN", // Amgen
    "VRTX", // Vertex
    "GILD", // Gilead
    "REGN", // Regeneron
];

/// Subset whose company news feeds the market news section
///
/// Kept small to stay inside the free-tier rate limit.
pub static KEY_MOVER_SYMBOLS: [&str; 5] = ["LLY", "NVO", "PFE", "MRK", "VRTX"];

/// Headline/summary keywords that make a story relevant (upper case)
pub static NEWS_KEYWORDS: [&str; 4] = ["FDA", "APPROVAL", "REJECT", "CLINICAL"];

/// Maximum number of market news items returned
pub const MARKET_NEWS_LIMIT: usize = 15;

/// Company name fragments mapped to their primary listing
///
/// Checked in order; the first fragment contained in the upper-cased company
/// name wins.
pub static SYMBOL_OVERRIDES: [(&str, &str); 14] = [
    ("NOVO NORDISK", "NVO"),
    ("ELI LILLY", "LLY"),
    ("PFIZER", "PFE"),
    ("MODERNA", "MRNA"),
    ("ASTRAZENECA", "AZN"),
    ("MERCK", "MRK"),
    ("JOHNSON & JOHNSON", "JNJ"),
    ("BRISTOL MYERS SQUIBB", "BMY"),
    ("AMGEN", "AMGN"),
    ("GILEAD", "GILD"),
    ("REGENERON", "REGN"),
    ("SANOFI", "SNY"),
    ("VERTEX", "VRTX"),
    ("BIOGEN", "BIIB"),
];

/// Looks up a company name in the override table
///
/// # Examples
/// `override_symbol("Eli Lilly and Company")` is `Some("LLY")`.
pub fn override_symbol(company_name: &str) -> Option<&'static str> {
    let upper = company_name.to_uppercase();
    SYMBOL_OVERRIDES
        .iter()
        .find(|(fragment, _)| upper.contains(fragment))
        .map(|(_, symbol)| *symbol)
}
