//! Decision engine: one dry-run polling cycle.
//!
//! A cycle fetches the target's latest BUY trades and the operator's
//! positions, then decides whether the newest trade would be copied. No order
//! is ever transmitted.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};

use crate::api::MarketData;
use crate::models::{round_for_display, MonitorState};

use super::feed::{fetch_latest_buy_trades, fetch_positions};
use super::position_index::already_has_position;

/// Simulated bet placed for every copy decision.
pub const BET_AMOUNT: Decimal = dec!(2.00);

const TITLE_MAX_CHARS: usize = 50;
const SEPARATOR_WIDTH: usize = 50;

/// Result of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Target has no recent BUY trades
    NoTrades,
    /// Operator does not hold the latest trade's outcome
    WouldCopy,
    /// Operator already holds the latest trade's outcome
    AlreadyHeld,
    /// Latest trade lacks the identifiers needed to decide
    Malformed,
}

/// Runs polling cycles against a `MarketData` source.
pub struct DecisionEngine {
    client: Arc<dyn MarketData>,
}

impl DecisionEngine {
    pub fn new(client: Arc<dyn MarketData>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &dyn MarketData {
        self.client.as_ref()
    }

    /// Run one cycle, updating counters, caches and the log in `state`.
    pub async fn perform_check(&self, state: &mut MonitorState) -> CheckOutcome {
        state.check_count += 1;
        state
            .log
            .info(format!("[Check {}] Fetching target's latest bet...", state.check_count));

        let trades =
            fetch_latest_buy_trades(self.client(), &state.target_address, &mut state.log).await;

        if trades.is_empty() {
            state.log.warning("No recent trades found. Nothing to copy.");
            state.latest_trades.clear();
            return CheckOutcome::NoTrades;
        }

        state.latest_trades = trades;
        state.trade_count += 1;

        let latest = state.latest_trades[0].clone();
        let title: String = latest.title.chars().take(TITLE_MAX_CHARS).collect();
        state.log.success(format!(
            "Found {} recent trades. Latest: {} - {:.1} {} @ {:.1}¢",
            state.latest_trades.len(),
            title,
            round_for_display(latest.size, 1),
            latest.outcome,
            round_for_display(latest.price_cents(), 1)
        ));

        state.log.info("Checking your positions...");
        state.current_positions =
            fetch_positions(self.client(), &state.operator_address, &mut state.log).await;

        match state.current_positions.len() {
            0 => state.log.info("You have no open positions"),
            n => state.log.info(format!("You have {} open position(s)", n)),
        }

        let outcome = match (latest.position_key(), latest.outcome_index) {
            (Some(key), Some(outcome_index)) => {
                let condition_id = latest.condition_id.as_str();
                if already_has_position(&state.current_positions, condition_id, outcome_index) {
                    state.skip_count += 1;
                    state.log.warning("Already in this market. Would NOT copy.");
                    CheckOutcome::AlreadyHeld
                } else {
                    state.copy_count += 1;
                    state.log.success(format!(
                        "Not in this market. Would copy: BUY ${:.2} of {}",
                        BET_AMOUNT, latest.outcome
                    ));
                    state.log.info("[DRY RUN] Simulated order placed successfully");
                    info!(
                        key = %key,
                        outcome = %latest.outcome,
                        amount = %BET_AMOUNT,
                        "[DRY RUN] Would copy trade"
                    );
                    CheckOutcome::WouldCopy
                }
            }
            _ => {
                state
                    .log
                    .error("Latest trade is missing its market identifiers. Skipping decision.");
                CheckOutcome::Malformed
            }
        };

        state.log.info("─".repeat(SEPARATOR_WIDTH));
        debug!(check = state.check_count, outcome = ?outcome, "Check complete");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{buy_trade, held, MockMarketData};
    use crate::models::LogKind;

    fn engine_with(mock: &Arc<MockMarketData>) -> DecisionEngine {
        DecisionEngine::new(mock.clone())
    }

    fn state_for(target: &str) -> MonitorState {
        let mut state = MonitorState::new();
        state.active = true;
        state.target_address = target.to_string();
        state.operator_address = target.to_string();
        state
    }

    #[tokio::test]
    async fn test_no_trades_only_counts_the_check() {
        let mock = Arc::new(MockMarketData::new());
        let engine = engine_with(&mock);
        let mut state = state_for("0xabc");
        state.trade_count = 3;
        state.copy_count = 2;
        state.skip_count = 1;

        let outcome = engine.perform_check(&mut state).await;

        assert_eq!(outcome, CheckOutcome::NoTrades);
        assert_eq!(state.check_count, 1);
        assert_eq!((state.trade_count, state.copy_count, state.skip_count), (3, 2, 1));
        assert!(state.latest_trades.is_empty());
        assert!(state.log.contains(LogKind::Warning, "No recent trades found. Nothing to copy."));
        assert_eq!(mock.positions_calls(), 0);
    }

    #[tokio::test]
    async fn test_would_copy_when_not_held() {
        let mock = Arc::new(MockMarketData::new());
        mock.set_activity(vec![buy_trade("Will X happen?", "YES", "abc", 0)]);
        let engine = engine_with(&mock);
        let mut state = state_for("0xabc");

        let outcome = engine.perform_check(&mut state).await;

        assert_eq!(outcome, CheckOutcome::WouldCopy);
        assert_eq!(state.trade_count, 1);
        assert_eq!(state.copy_count, 1);
        assert_eq!(state.skip_count, 0);
        assert!(state
            .log
            .contains(LogKind::Success, "Not in this market. Would copy: BUY $2.00 of YES"));
        assert!(state
            .log
            .contains(LogKind::Info, "[DRY RUN] Simulated order placed successfully"));
        assert!(state
            .log
            .contains(LogKind::Success, "Latest: Will X happen? - 10.0 YES @ 45.0¢"));
        assert!(state.log.contains(LogKind::Info, "You have no open positions"));
    }

    #[tokio::test]
    async fn test_latest_line_rounds_size_and_price() {
        let mock = Arc::new(MockMarketData::new());
        let mut record = buy_trade("Will X happen?", "YES", "abc", 0);
        record.size = dec!(10.96);
        record.price = dec!(0.4567);
        mock.set_activity(vec![record]);
        let engine = engine_with(&mock);
        let mut state = state_for("0xabc");

        engine.perform_check(&mut state).await;

        assert!(state
            .log
            .contains(LogKind::Success, "Latest: Will X happen? - 11.0 YES @ 45.7¢"));
    }

    #[tokio::test]
    async fn test_skips_when_already_held() {
        let mock = Arc::new(MockMarketData::new());
        mock.set_activity(vec![buy_trade("Will X happen?", "YES", "abc", 0)]);
        mock.set_positions(vec![held("abc", 0)]);
        let engine = engine_with(&mock);
        let mut state = state_for("0xabc");

        let outcome = engine.perform_check(&mut state).await;

        assert_eq!(outcome, CheckOutcome::AlreadyHeld);
        assert_eq!(state.skip_count, 1);
        assert_eq!(state.copy_count, 0);
        assert_eq!(state.current_positions.len(), 1);
        assert!(state
            .log
            .contains(LogKind::Warning, "Already in this market. Would NOT copy."));
        assert!(state.log.contains(LogKind::Info, "You have 1 open position(s)"));
    }

    #[tokio::test]
    async fn test_other_outcome_of_same_market_is_copied() {
        let mock = Arc::new(MockMarketData::new());
        mock.set_activity(vec![buy_trade("Will X happen?", "NO", "abc", 1)]);
        mock.set_positions(vec![held("abc", 0)]);
        let engine = engine_with(&mock);
        let mut state = state_for("0xabc");

        assert_eq!(engine.perform_check(&mut state).await, CheckOutcome::WouldCopy);
        assert!(state.log.contains(LogKind::Success, "BUY $2.00 of NO"));
    }

    #[tokio::test]
    async fn test_activity_timeout_degrades_to_no_trades() {
        let mock = Arc::new(MockMarketData::new());
        mock.fail_activity("operation timed out");
        let engine = engine_with(&mock);
        let mut state = state_for("0xabc");

        let outcome = engine.perform_check(&mut state).await;

        assert_eq!(outcome, CheckOutcome::NoTrades);
        assert_eq!(state.trade_count, 0);
        let errors: Vec<_> = state
            .log
            .entries()
            .filter(|e| e.kind == LogKind::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("operation timed out"));
        assert!(state.log.contains(LogKind::Warning, "No recent trades found"));
    }

    #[tokio::test]
    async fn test_positions_failure_still_decides() {
        let mock = Arc::new(MockMarketData::new());
        mock.set_activity(vec![buy_trade("Will X happen?", "YES", "abc", 0)]);
        mock.fail_positions("connection reset");
        let engine = engine_with(&mock);
        let mut state = state_for("0xabc");

        assert_eq!(engine.perform_check(&mut state).await, CheckOutcome::WouldCopy);
        assert!(state.log.contains(LogKind::Error, "connection reset"));
    }

    #[tokio::test]
    async fn test_malformed_latest_trade_is_a_logged_no_op() {
        let mock = Arc::new(MockMarketData::new());
        let mut record = buy_trade("Broken", "YES", "abc", 0);
        record.outcome_index = None;
        mock.set_activity(vec![record]);
        let engine = engine_with(&mock);
        let mut state = state_for("0xabc");

        let outcome = engine.perform_check(&mut state).await;

        assert_eq!(outcome, CheckOutcome::Malformed);
        assert_eq!(state.trade_count, 1);
        assert_eq!((state.copy_count, state.skip_count), (0, 0));
        assert!(state.log.contains(LogKind::Error, "missing its market identifiers"));
        assert!(state.log.contains(LogKind::Info, &"─".repeat(SEPARATOR_WIDTH)));
    }

    #[tokio::test]
    async fn test_long_titles_are_truncated() {
        let mock = Arc::new(MockMarketData::new());
        let title = "x".repeat(80);
        mock.set_activity(vec![buy_trade(&title, "YES", "abc", 0)]);
        let engine = engine_with(&mock);
        let mut state = state_for("0xabc");

        engine.perform_check(&mut state).await;

        let expected = format!("Latest: {} - ", "x".repeat(TITLE_MAX_CHARS));
        assert!(state.log.contains(LogKind::Success, &expected));
        assert!(!state.log.contains(LogKind::Success, &"x".repeat(TITLE_MAX_CHARS + 1)));
    }

    #[tokio::test]
    async fn test_positions_fetched_for_operator_address() {
        let mock = Arc::new(MockMarketData::new());
        mock.set_activity(vec![buy_trade("Will X happen?", "YES", "abc", 0)]);
        let engine = engine_with(&mock);
        let mut state = state_for("0xtarget");
        state.operator_address = "0xoperator".to_string();

        engine.perform_check(&mut state).await;

        assert_eq!(mock.position_addresses(), vec!["0xoperator".to_string()]);
    }

    #[tokio::test]
    async fn test_cycle_log_order() {
        let mock = Arc::new(MockMarketData::new());
        mock.set_activity(vec![buy_trade("Will X happen?", "YES", "abc", 0)]);
        let engine = engine_with(&mock);
        let mut state = state_for("0xabc");

        engine.perform_check(&mut state).await;

        // Oldest first for readability
        let messages: Vec<&str> = state.log.entries().map(|e| e.message.as_str()).collect();
        let mut chronological = messages.clone();
        chronological.reverse();
        assert_eq!(chronological[0], "[Check 1] Fetching target's latest bet...");
        assert!(chronological[1].starts_with("Found 1 recent trades."));
        assert_eq!(chronological[2], "Checking your positions...");
        assert_eq!(chronological[3], "You have no open positions");
        assert!(chronological[4].starts_with("Not in this market."));
        assert_eq!(chronological[5], "[DRY RUN] Simulated order placed successfully");
        assert_eq!(chronological[6], "─".repeat(SEPARATOR_WIDTH));
    }
}
