//! Failure-tolerant fetches over [`MarketData`].
//!
//! Nothing here returns an error: failures become a fallback name or an
//! empty collection, and trade/position failures add an `error` log entry.

use tracing::{debug, warn};

use crate::api::MarketData;
use crate::models::{ActivityLog, Position, Trade};

/// Raw activity records requested per fetch.
pub const ACTIVITY_FETCH_LIMIT: u32 = 50;

/// BUY trades kept after filtering.
pub const MAX_LATEST_TRADES: usize = 10;

/// First ten characters of the address followed by an ellipsis.
pub fn fallback_name(address: &str) -> String {
    let prefix: String = address.chars().take(10).collect();
    format!("{}...", prefix)
}

/// Display name of `address`: profile name, else pseudonym, else a truncated address.
pub async fn fetch_profile_name(client: &dyn MarketData, address: &str) -> String {
    match client.profile(address).await {
        Ok(profile) => profile
            .display_name()
            .map(str::to_string)
            .unwrap_or_else(|| fallback_name(address)),
        Err(e) => {
            debug!(address = %address, error = %e, "Profile lookup failed");
            fallback_name(address)
        }
    }
}

/// Up to ten most recent BUY trades of `address`, newest first.
pub async fn fetch_latest_buy_trades(
    client: &dyn MarketData,
    address: &str,
    log: &mut ActivityLog,
) -> Vec<Trade> {
    let records = match client.activity(address, ACTIVITY_FETCH_LIMIT).await {
        Ok(records) => records,
        Err(e) => {
            log.error(format!("Error fetching trades: {:#}", e));
            return Vec::new();
        }
    };

    let total = records.len();
    let trades: Vec<Trade> = records
        .into_iter()
        .filter(|r| r.is_buy_trade())
        .filter_map(|r| r.into_trade())
        .take(MAX_LATEST_TRADES)
        .collect();

    debug!(address = %address, records = total, buys = trades.len(), "Fetched activity");
    trades
}

/// Every position reported for `address`.
pub async fn fetch_positions(
    client: &dyn MarketData,
    address: &str,
    log: &mut ActivityLog,
) -> Vec<Position> {
    match client.positions(address).await {
        Ok(records) => records.into_iter().map(Position::from).collect(),
        Err(e) => {
            warn!(address = %address, "Positions fetch failed");
            log.error(format!("Error fetching positions: {:#}", e));
            Vec::new()
        }
    }
}
