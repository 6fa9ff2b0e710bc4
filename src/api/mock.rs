//! Scripted `MarketData` for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::market_data::MarketData;
use super::types::{ActivityResponse, PositionResponse, ProfileResponse};

type Hook = Box<dyn Fn() + Send + Sync>;

pub struct MockMarketData {
    profile: Mutex<Result<ProfileResponse, String>>,
    activity: Mutex<Result<Vec<ActivityResponse>, String>>,
    positions: Mutex<Result<Vec<PositionResponse>, String>>,
    position_addresses: Mutex<Vec<String>>,
    on_activity: Mutex<Option<Hook>>,
    profile_calls: AtomicUsize,
    activity_calls: AtomicUsize,
    positions_calls: AtomicUsize,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            profile: Mutex::new(Ok(ProfileResponse::default())),
            activity: Mutex::new(Ok(Vec::new())),
            positions: Mutex::new(Ok(Vec::new())),
            position_addresses: Mutex::new(Vec::new()),
            on_activity: Mutex::new(None),
            profile_calls: AtomicUsize::new(0),
            activity_calls: AtomicUsize::new(0),
            positions_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_profile(&self, profile: ProfileResponse) {
        *self.profile.lock().unwrap() = Ok(profile);
    }

    pub fn fail_profile(&self, message: &str) {
        *self.profile.lock().unwrap() = Err(message.to_string());
    }

    pub fn set_activity(&self, records: Vec<ActivityResponse>) {
        *self.activity.lock().unwrap() = Ok(records);
    }

    pub fn fail_activity(&self, message: &str) {
        *self.activity.lock().unwrap() = Err(message.to_string());
    }

    pub fn set_positions(&self, records: Vec<PositionResponse>) {
        *self.positions.lock().unwrap() = Ok(records);
    }

    pub fn fail_positions(&self, message: &str) {
        *self.positions.lock().unwrap() = Err(message.to_string());
    }

    /// Run `hook` every time activity is fetched, before it returns.
    pub fn on_activity(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_activity.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    pub fn activity_calls(&self) -> usize {
        self.activity_calls.load(Ordering::SeqCst)
    }

    pub fn positions_calls(&self) -> usize {
        self.positions_calls.load(Ordering::SeqCst)
    }

    /// Addresses passed to `positions`, in call order.
    pub fn position_addresses(&self) -> Vec<String> {
        self.position_addresses.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketData for MockMarketData {
    async fn profile(&self, _address: &str) -> Result<ProfileResponse> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.profile.lock().unwrap().clone().map_err(|e| anyhow!(e))
    }

    async fn activity(&self, _address: &str, limit: u32) -> Result<Vec<ActivityResponse>> {
        self.activity_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = self.on_activity.lock().unwrap().as_ref() {
            hook();
        }
        self.activity
            .lock()
            .unwrap()
            .clone()
            .map(|records| records.into_iter().take(limit as usize).collect())
            .map_err(|e| anyhow!(e))
    }

    async fn positions(&self, address: &str) -> Result<Vec<PositionResponse>> {
        self.positions_calls.fetch_add(1, Ordering::SeqCst);
        self.position_addresses
            .lock()
            .unwrap()
            .push(address.to_string());
        self.positions.lock().unwrap().clone().map_err(|e| anyhow!(e))
    }
}

/// A BUY trade record as the activity feed reports it.
pub fn buy_trade(title: &str, outcome: &str, condition_id: &str, outcome_index: i32) -> ActivityResponse {
    ActivityResponse {
        activity_type: "TRADE".to_string(),
        side: "BUY".to_string(),
        title: title.to_string(),
        outcome: outcome.to_string(),
        size: rust_decimal_macros::dec!(10.0),
        price: rust_decimal_macros::dec!(0.45),
        timestamp: 1_700_000_000_000,
        condition_id: condition_id.to_string(),
        outcome_index: Some(outcome_index),
        ..Default::default()
    }
}

/// A position record with just the identifying fields set.
pub fn held(condition_id: &str, outcome_index: i32) -> PositionResponse {
    PositionResponse {
        condition_id: condition_id.to_string(),
        outcome_index: Some(outcome_index),
        title: "Held market".to_string(),
        outcome: "Yes".to_string(),
        size: rust_decimal_macros::dec!(5),
        ..Default::default()
    }
}
