//! Data models for trades, positions, the activity log and monitor state.

mod activity_log;
mod position;
mod state;
mod trade;

pub use activity_log::{ActivityLog, LogKind, LOG_CAPACITY};
pub use position::{Position, PositionKey};
pub use state::MonitorState;
pub use trade::{round_for_display, ActivityType, Outcome, Trade, TradeSide};
