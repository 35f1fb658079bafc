//! Cache module for holding API responses in memory
//!
//! This module provides a TTL cache that stores JSON-encoded responses keyed by
//! string, together with the clock it measures freshness against. Stale entries
//! read as absent and are simply overwritten by the next successful fetch.

mod clock;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{Cache, DEFAULT_TTL_SECS};
