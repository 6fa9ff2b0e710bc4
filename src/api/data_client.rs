//! HTTP client for the Polymarket Data API and Gamma profile API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::market_data::MarketData;
use super::types::*;

pub const DATA_API_BASE: &str = "https://data-api.polymarket.com";
pub const PROFILE_API_BASE: &str = "https://gamma-api.polymarket.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the read-only Polymarket endpoints.
pub struct DataClient {
    client: Client,
    data_base_url: String,
    profile_base_url: String,
}

impl DataClient {
    /// Create with custom base URLs and request timeout.
    pub fn with_base_urls(
        data_base_url: String,
        profile_base_url: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            data_base_url: data_base_url.trim_end_matches('/').to_string(),
            profile_base_url: profile_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        debug!(url = %url, "Fetching {}", what);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", what))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{} request failed: {} - {}", what, status, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", what))
    }
}

#[async_trait]
impl MarketData for DataClient {
    async fn profile(&self, address: &str) -> Result<ProfileResponse> {
        let url = format!("{}/public-profile?address={}", self.profile_base_url, address);
        self.get_json(&url, "profile").await
    }

    async fn activity(&self, address: &str, limit: u32) -> Result<Vec<ActivityResponse>> {
        let url = format!(
            "{}/activity?user={}&limit={}",
            self.data_base_url,
            address,
            limit.min(500)
        );
        self.get_json(&url, "activity").await
    }

    async fn positions(&self, address: &str) -> Result<Vec<PositionResponse>> {
        let url = format!(
            "{}/positions?user={}&sizeThreshold=0",
            self.data_base_url, address
        );
        self.get_json(&url, "positions").await
    }
}
