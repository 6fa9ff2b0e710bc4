//! Polymarket API access: HTTP client, response types and caching.

mod cache;
mod data_client;
mod market_data;
#[cfg(test)]
pub mod mock;
mod types;

pub use cache::{CacheTtls, CachedMarketData};
pub use data_client::{DataClient, DATA_API_BASE, DEFAULT_TIMEOUT, PROFILE_API_BASE};
pub use market_data::MarketData;
pub use types::*;
