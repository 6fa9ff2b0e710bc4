//! Monitoring logic: configuration, tolerant fetches, position index, decision engine.

mod config;
mod engine;
mod feed;
mod position_index;

pub use config::MonitorConfig;
pub use engine::{CheckOutcome, DecisionEngine, BET_AMOUNT};
pub use feed::{fetch_profile_name, ACTIVITY_FETCH_LIMIT, MAX_LATEST_TRADES};
