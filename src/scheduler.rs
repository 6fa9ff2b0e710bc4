//! Scheduler: drives the decision engine on a fixed cadence while active.
//!
//! Cycles never overlap. A stop request is honoured at the next cycle
//! boundary (an in-flight cycle, including its HTTP calls, always finishes)
//! or immediately if the scheduler is waiting between cycles.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::models::MonitorState;
use crate::monitor::{fetch_profile_name, CheckOutcome, DecisionEngine};

/// Delay source between cycles.
#[async_trait]
pub trait Ticker: Send {
    /// Resolve when the next cycle may start.
    async fn tick(&mut self);
}

/// Sleeps a fixed period after each cycle.
#[derive(Debug, Clone)]
pub struct SleepTicker {
    period: Duration,
}

impl SleepTicker {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

#[async_trait]
impl Ticker for SleepTicker {
    async fn tick(&mut self) {
        tokio::time::sleep(self.period).await;
    }
}

/// Start-command validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("Please enter a target trader address")]
    MissingAddress,

    #[error("Please enter a valid Ethereum address (starting with 0x), got '{0}'")]
    InvalidAddress(String),

    #[error("Monitoring is already active")]
    AlreadyActive,
}

/// Trim and check that `raw` is a `0x`-prefixed address.
pub fn validate_address(raw: &str) -> Result<String, StartError> {
    let address = raw.trim();
    if address.is_empty() {
        return Err(StartError::MissingAddress);
    }
    if !address.starts_with("0x") {
        return Err(StartError::InvalidAddress(address.to_string()));
    }
    Ok(address.to_string())
}

/// Cloneable handle that asks a running scheduler to stop.
#[derive(Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn request_stop(&self) {
        self.tx.send_replace(true);
    }
}

/// Owns the monitor state and runs cycles until stopped.
pub struct Scheduler<T> {
    engine: DecisionEngine,
    ticker: T,
    state: MonitorState,
    stop_tx: Arc<watch::Sender<bool>>,
    stop_rx: watch::Receiver<bool>,
    snapshots: watch::Sender<MonitorState>,
}

impl<T: Ticker> Scheduler<T> {
    pub fn new(engine: DecisionEngine, ticker: T) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        let (snapshots, _) = watch::channel(MonitorState::new());

        Self {
            engine,
            ticker,
            state: MonitorState::new(),
            stop_tx: Arc::new(stop_tx),
            stop_rx,
            snapshots,
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            tx: self.stop_tx.clone(),
        }
    }

    /// Read-only snapshots, published after start, every cycle and stop.
    pub fn subscribe(&self) -> watch::Receiver<MonitorState> {
        self.snapshots.subscribe()
    }

    fn stop_requested(&self) -> bool {
        *self.stop_rx.borrow()
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.clone());
    }

    /// Activate monitoring of `target`, checking positions of `operator`.
    ///
    /// Without an operator address the target's own positions are used.
    /// On validation failure nothing is mutated.
    pub async fn start(&mut self, target: &str, operator: Option<&str>) -> Result<(), StartError> {
        if self.state.active {
            return Err(StartError::AlreadyActive);
        }

        let target = validate_address(target)?;
        let operator = operator.map(validate_address).transpose()?;

        self.stop_tx.send_replace(false);
        self.state.active = true;
        self.state.target_address = target.clone();

        match operator {
            Some(operator) => self.state.operator_address = operator,
            None => {
                self.state.operator_address = target.clone();
                self.state
                    .log
                    .warning("No operator address set. Checking the target's own positions.");
            }
        }

        if self.state.trader_name.is_none() {
            let name = fetch_profile_name(self.engine.client(), &target).await;
            self.state.trader_name = Some(name);
        }

        info!(
            target = %self.state.target_address,
            operator = %self.state.operator_address,
            trader = %self.state.trader_label(),
            "Monitoring started"
        );
        self.publish();
        Ok(())
    }

    /// Run exactly one cycle and publish the resulting state.
    pub async fn run_cycle(&mut self) -> CheckOutcome {
        let outcome = self.engine.perform_check(&mut self.state).await;
        self.publish();
        outcome
    }

    /// Cycle until a stop is requested, then reset.
    ///
    /// Returns the state as it was just before the reset. An inactive
    /// scheduler returns its current state untouched.
    pub async fn run(&mut self) -> MonitorState {
        if !self.is_active() {
            return self.state.clone();
        }

        while self.is_active() && !self.stop_requested() {
            self.run_cycle().await;

            if self.stop_requested() {
                break;
            }

            let mut stop_rx = self.stop_rx.clone();
            tokio::select! {
                _ = self.ticker.tick() => {}
                _ = async {
                    let _ = stop_rx.wait_for(|stop| *stop).await;
                } => {}
            }
        }

        let last = self.state.clone();
        self.stop();
        last
    }

    /// Deactivate and reset counters, caches and the log.
    pub fn stop(&mut self) {
        if self.state.active {
            info!(checks = self.state.check_count, "Monitoring stopped");
        } else {
            warn!("Stop requested while inactive");
        }

        self.state.reset();
        self.engine.client().clear_cache();
        self.stop_tx.send_replace(false);
        self.publish();
    }
}
