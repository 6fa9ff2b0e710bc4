//! Trade model representing a purchase observed in a trader's activity feed.

use std::fmt;

use chrono::{DateTime, Local, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::position::PositionKey;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "BUY" => Some(TradeSide::Buy),
            "SELL" => Some(TradeSide::Sell),
            _ => None,
        }
    }
}

/// Kind of record in the activity feed. Only `Trade` records are copy candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityType {
    Trade,
    Split,
    Merge,
    Redeem,
    Reward,
    Conversion,
    Unknown,
}

impl ActivityType {
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "TRADE" => Self::Trade,
            "SPLIT" => Self::Split,
            "MERGE" => Self::Merge,
            "REDEEM" => Self::Redeem,
            "REWARD" => Self::Reward,
            "CONVERSION" => Self::Conversion,
            _ => Self::Unknown,
        }
    }
}

/// Outcome token of a binary market. Non-binary markets carry their outcome name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Yes,
    No,
    Named(String),
}

impl Outcome {
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("yes") {
            Outcome::Yes
        } else if s.eq_ignore_ascii_case("no") {
            Outcome::No
        } else {
            Outcome::Named(s.to_string())
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Yes => f.write_str("YES"),
            Outcome::No => f.write_str("NO"),
            Outcome::Named(name) => f.write_str(name),
        }
    }
}

/// Snapshot of a single trade from the target's activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Market title for display
    pub title: String,

    /// Outcome bought or sold
    pub outcome: Outcome,

    /// Number of outcome tokens traded
    pub size: Decimal,

    /// Price per token in USDC (0.0 to 1.0)
    pub price: Decimal,

    /// When the trade happened, epoch milliseconds
    pub timestamp: i64,

    /// Market condition ID
    pub condition_id: String,

    /// Index of the outcome within the market, if the feed reported it
    pub outcome_index: Option<i32>,

    pub side: TradeSide,

    pub activity_type: ActivityType,
}

/// Round half to even at `dp` places so fixed-precision formatting rounds
/// rather than truncates.
pub fn round_for_display(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
}

impl Trade {
    /// Key of the (market, outcome) pair this trade bought into.
    pub fn position_key(&self) -> Option<PositionKey> {
        PositionKey::from_parts(&self.condition_id, self.outcome_index)
    }

    /// USDC value of the trade.
    pub fn value(&self) -> Decimal {
        self.size * self.price
    }

    /// Price expressed in cents.
    pub fn price_cents(&self) -> Decimal {
        self.price * Decimal::ONE_HUNDRED
    }

    pub fn traded_at(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.timestamp).single()
    }
}
