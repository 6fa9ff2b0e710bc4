//! Monitor state: counters, cached fetch results and the activity log.

use std::fmt;

use rust_decimal::Decimal;

use super::activity_log::ActivityLog;
use super::position::Position;
use super::trade::{round_for_display, Trade};

/// Number of positions listed in the state view before summarising the rest.
const POSITIONS_SHOWN: usize = 3;

/// Everything the operator sees. Mutated only by the scheduler and the decision engine.
#[derive(Debug, Clone, Default)]
pub struct MonitorState {
    pub active: bool,

    /// Address whose trades are observed
    pub target_address: String,

    /// Address whose positions are checked for overlap
    pub operator_address: String,

    /// Display name of the target, resolved once per start
    pub trader_name: Option<String>,

    pub check_count: u64,
    pub trade_count: u64,
    pub copy_count: u64,
    pub skip_count: u64,

    /// Latest BUY trades of the target, newest first (at most 10)
    pub latest_trades: Vec<Trade>,

    /// Operator's positions as of the last cycle
    pub current_positions: Vec<Position>,

    pub log: ActivityLog,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return to the zero form used before the first start.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn trader_label(&self) -> &str {
        self.trader_name.as_deref().unwrap_or("Not set")
    }

    /// One-line counter summary.
    pub fn summary(&self) -> String {
        format!(
            "Checks: {} | Trades: {} | Would copy: {} | Already in: {}",
            self.check_count, self.trade_count, self.copy_count, self.skip_count
        )
    }
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Monitor Status ===")?;
        writeln!(f, "Status:              {}", if self.active { "Active" } else { "Inactive" })?;
        writeln!(f, "Target Trader:       {}", self.trader_label())?;
        writeln!(f, "Checks Performed:    {}", self.check_count)?;
        writeln!(f, "Trades Detected:     {}", self.trade_count)?;
        writeln!(f, "Would Copy:          {}", self.copy_count)?;
        writeln!(f, "Already In Position: {}", self.skip_count)?;

        writeln!(f, "\n=== Target's Latest Trades ===")?;
        if self.latest_trades.is_empty() {
            writeln!(f, "  No recent trades found")?;
        }
        for (i, trade) in self.latest_trades.iter().enumerate() {
            let time = trade
                .traded_at()
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(f, "  #{} {}", i + 1, trade.title)?;
            writeln!(
                f,
                "     {} | {:.2} contracts @ {:.1}¢ | ${:.2} | {}",
                trade.outcome,
                round_for_display(trade.size, 2),
                round_for_display(trade.price_cents(), 1),
                round_for_display(trade.value(), 2),
                time
            )?;
        }

        writeln!(f, "\n=== Your Current Positions ===")?;
        if self.current_positions.is_empty() {
            writeln!(f, "  No open positions")?;
        }
        for pos in self.current_positions.iter().take(POSITIONS_SHOWN) {
            let sign = if pos.cash_pnl >= Decimal::ZERO { "+" } else { "-" };
            writeln!(f, "  {}", pos.title)?;
            writeln!(
                f,
                "     {} | size {:.2} | avg {:.1}¢ | P&L {}${:.2}",
                pos.outcome,
                round_for_display(pos.size, 2),
                round_for_display(pos.avg_price_cents(), 1),
                sign,
                round_for_display(pos.cash_pnl.abs(), 2)
            )?;
        }
        if self.current_positions.len() > POSITIONS_SHOWN {
            writeln!(
                f,
                "  + {} more positions",
                self.current_positions.len() - POSITIONS_SHOWN
            )?;
        }

        writeln!(f, "\n=== Activity Log ===")?;
        if self.log.is_empty() {
            writeln!(f, "  Activity will appear here when monitoring starts.")?;
        }
        for entry in self.log.entries() {
            writeln!(
                f,
                "  [{}] {:<7} {}",
                entry.time.format("%H:%M:%S"),
                entry.kind,
                entry.message
            )?;
        }
        Ok(())
    }
}
