//! Monitor configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::api::{
    CacheTtls, CachedMarketData, DataClient, MarketData, DATA_API_BASE, DEFAULT_TIMEOUT,
    PROFILE_API_BASE,
};

/// Configuration for the upstream APIs and the polling cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Base URL of the Data API (activity, positions)
    pub data_api_base: String,

    /// Base URL of the profile API
    pub profile_api_base: String,

    /// Delay between the end of one check and the start of the next (seconds)
    pub poll_interval_secs: u64,

    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,

    /// How long a resolved profile is reused (seconds, 0 disables)
    pub profile_cache_ttl_secs: u64,

    /// How long an activity response is reused (seconds, 0 disables)
    pub activity_cache_ttl_secs: u64,

    /// How long a positions response is reused (seconds, 0 disables)
    pub positions_cache_ttl_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            data_api_base: DATA_API_BASE.to_string(),
            profile_api_base: PROFILE_API_BASE.to_string(),
            poll_interval_secs: 10,
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            profile_cache_ttl_secs: 300,
            activity_cache_ttl_secs: 60,
            positions_cache_ttl_secs: 60,
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttls(&self) -> CacheTtls {
        CacheTtls {
            profile: Duration::from_secs(self.profile_cache_ttl_secs),
            activity: Duration::from_secs(self.activity_cache_ttl_secs),
            positions: Duration::from_secs(self.positions_cache_ttl_secs),
        }
    }

    /// Turn off response memoization for every endpoint.
    pub fn without_cache(mut self) -> Self {
        self.profile_cache_ttl_secs = 0;
        self.activity_cache_ttl_secs = 0;
        self.positions_cache_ttl_secs = 0;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.poll_interval_secs > 0, "Poll interval must be at least 1 second");
        ensure!(self.request_timeout_secs > 0, "Request timeout must be at least 1 second");
        ensure!(!self.data_api_base.is_empty(), "Data API base URL is empty");
        ensure!(!self.profile_api_base.is_empty(), "Profile API base URL is empty");
        Ok(())
    }

    /// Build the HTTP client wrapped in the response cache.
    pub fn build_client(&self) -> Result<Arc<dyn MarketData>> {
        self.validate()?;
        let client = DataClient::with_base_urls(
            self.data_api_base.clone(),
            self.profile_api_base.clone(),
            self.request_timeout(),
        )?;
        Ok(Arc::new(CachedMarketData::new(client, self.cache_ttls())))
    }
}
