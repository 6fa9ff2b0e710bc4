//! API response types for the Polymarket Data and Gamma profile APIs.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{ActivityType, Outcome, Position, Trade, TradeSide};

/// Timestamps below this are reported in seconds rather than milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Public profile from the /public-profile endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pseudonym: Option<String>,
}

impl ProfileResponse {
    /// Name if present, else pseudonym. Empty strings count as absent.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.pseudonym.as_deref().filter(|p| !p.is_empty()))
    }
}

/// Activity record from the /activity endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub activity_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub side: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub outcome: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub condition_id: String,
    #[serde(default)]
    pub outcome_index: Option<i32>,
}

impl ActivityResponse {
    pub fn is_buy_trade(&self) -> bool {
        ActivityType::parse(&self.activity_type) == ActivityType::Trade
            && TradeSide::parse(&self.side) == Some(TradeSide::Buy)
    }

    /// Convert a trade record into a `Trade`. Non-trade records yield `None`.
    pub fn into_trade(self) -> Option<Trade> {
        let side = TradeSide::parse(&self.side)?;
        let activity_type = ActivityType::parse(&self.activity_type);
        if activity_type != ActivityType::Trade {
            return None;
        }

        let timestamp = if self.timestamp < MILLIS_THRESHOLD {
            self.timestamp.saturating_mul(1000)
        } else {
            self.timestamp
        };

        Some(Trade {
            title: self.title,
            outcome: Outcome::parse(&self.outcome),
            size: self.size,
            price: self.price,
            timestamp,
            condition_id: self.condition_id,
            outcome_index: self.outcome_index,
            side,
            activity_type,
        })
    }
}

/// Position record from the /positions endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub condition_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub outcome: String,
    #[serde(default)]
    pub outcome_index: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cash_pnl: Decimal,
}

impl From<PositionResponse> for Position {
    fn from(p: PositionResponse) -> Self {
        Position {
            title: p.title,
            outcome: Outcome::parse(&p.outcome),
            size: p.size,
            avg_price: p.avg_price,
            cash_pnl: p.cash_pnl,
            condition_id: p.condition_id,
            outcome_index: p.outcome_index,
        }
    }
}
