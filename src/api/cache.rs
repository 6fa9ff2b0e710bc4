//! Time-boxed memoization of upstream responses.
//!
//! Each endpoint gets its own [`TtlCache`] keyed by address. Only successful
//! responses are stored, so a failed fetch is retried on the next cycle.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::market_data::MarketData;
use super::types::{ActivityResponse, PositionResponse, ProfileResponse};

/// Source of monotonic time, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Real monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// String-keyed cache whose entries expire `ttl` after insertion.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: HashMap<String, (Instant, V)>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// A zero TTL disables caching.
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub fn get(&self, key: &str, now: Instant) -> Option<V> {
        let (stored_at, value) = self.entries.get(key)?;
        if now.saturating_duration_since(*stored_at) < self.ttl {
            Some(value.clone())
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: String, value: V, now: Instant) {
        if !self.is_enabled() {
            return;
        }
        // Expired entries are dropped lazily on insert.
        let ttl = self.ttl;
        self.entries
            .retain(|_, (stored_at, _)| now.saturating_duration_since(*stored_at) < ttl);
        self.entries.insert(key, (now, value));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Cache lifetimes for each endpoint.
#[derive(Debug, Clone, Copy)]
pub struct CacheTtls {
    pub profile: Duration,
    pub activity: Duration,
    pub positions: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            profile: Duration::from_secs(300),
            activity: Duration::from_secs(60),
            positions: Duration::from_secs(60),
        }
    }
}

/// `MarketData` decorator memoizing responses per address.
pub struct CachedMarketData<M, C = SystemClock> {
    inner: M,
    clock: C,
    profiles: Mutex<TtlCache<ProfileResponse>>,
    activity: Mutex<TtlCache<Vec<ActivityResponse>>>,
    positions: Mutex<TtlCache<Vec<PositionResponse>>>,
}

impl<M: MarketData> CachedMarketData<M, SystemClock> {
    pub fn new(inner: M, ttls: CacheTtls) -> Self {
        Self::with_clock(inner, ttls, SystemClock)
    }
}

impl<M: MarketData, C: Clock> CachedMarketData<M, C> {
    pub fn with_clock(inner: M, ttls: CacheTtls, clock: C) -> Self {
        Self {
            inner,
            clock,
            profiles: Mutex::new(TtlCache::new(ttls.profile)),
            activity: Mutex::new(TtlCache::new(ttls.activity)),
            positions: Mutex::new(TtlCache::new(ttls.positions)),
        }
    }

    #[cfg(test)]
    pub fn inner(&self) -> &M {
        &self.inner
    }
}

fn lookup<V: Clone>(cache: &Mutex<TtlCache<V>>, key: &str, now: Instant) -> Option<V> {
    cache.lock().ok()?.get(key, now)
}

fn store<V: Clone>(cache: &Mutex<TtlCache<V>>, key: String, value: &V, now: Instant) {
    if let Ok(mut guard) = cache.lock() {
        guard.insert(key, value.clone(), now);
    }
}

fn clear<V: Clone>(cache: &Mutex<TtlCache<V>>) {
    if let Ok(mut guard) = cache.lock() {
        guard.clear();
    }
}

#[async_trait]
impl<M: MarketData, C: Clock> MarketData for CachedMarketData<M, C> {
    async fn profile(&self, address: &str) -> Result<ProfileResponse> {
        if let Some(hit) = lookup(&self.profiles, address, self.clock.now()) {
            debug!(address = %address, "Profile cache hit");
            return Ok(hit);
        }

        let profile = self.inner.profile(address).await?;
        store(&self.profiles, address.to_string(), &profile, self.clock.now());
        Ok(profile)
    }

    async fn activity(&self, address: &str, limit: u32) -> Result<Vec<ActivityResponse>> {
        let key = format!("{}:{}", address, limit);
        if let Some(hit) = lookup(&self.activity, &key, self.clock.now()) {
            debug!(address = %address, "Activity cache hit");
            return Ok(hit);
        }

        let records = self.inner.activity(address, limit).await?;
        store(&self.activity, key, &records, self.clock.now());
        Ok(records)
    }

    async fn positions(&self, address: &str) -> Result<Vec<PositionResponse>> {
        if let Some(hit) = lookup(&self.positions, address, self.clock.now()) {
            debug!(address = %address, "Positions cache hit");
            return Ok(hit);
        }

        let records = self.inner.positions(address).await?;
        store(&self.positions, address.to_string(), &records, self.clock.now());
        Ok(records)
    }

    fn clear_cache(&self) {
        clear(&self.profiles);
        clear(&self.activity);
        clear(&self.positions);
        self.inner.clear_cache();
    }
}
