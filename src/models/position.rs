//! Position model representing the operator's holding in one market outcome.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::trade::Outcome;

/// Current holding in a prediction market outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Market title for display
    pub title: String,

    /// Outcome token held
    pub outcome: Outcome,

    /// Number of outcome tokens held
    pub size: Decimal,

    /// Average entry price per token
    pub avg_price: Decimal,

    /// Unrealized P&L in USDC
    pub cash_pnl: Decimal,

    /// Market condition ID
    pub condition_id: String,

    pub outcome_index: Option<i32>,
}

impl Position {
    pub fn key(&self) -> Option<PositionKey> {
        PositionKey::from_parts(&self.condition_id, self.outcome_index)
    }

    pub fn avg_price_cents(&self) -> Decimal {
        self.avg_price * Decimal::ONE_HUNDRED
    }
}

/// Identifies a (market, outcome) pair as `{conditionId}_{outcomeIndex}`.
///
/// Two positions with the same key are the same exposure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey(String);

impl PositionKey {
    pub fn new(condition_id: &str, outcome_index: i32) -> Self {
        Self(format!("{}_{}", condition_id, outcome_index))
    }

    /// Build a key when both identifiers are present.
    pub fn from_parts(condition_id: &str, outcome_index: Option<i32>) -> Option<Self> {
        if condition_id.is_empty() {
            return None;
        }
        outcome_index.map(|index| Self::new(condition_id, index))
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
