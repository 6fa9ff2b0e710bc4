//! Read-only view of the upstream market APIs.

use anyhow::Result;
use async_trait::async_trait;

use super::types::{ActivityResponse, PositionResponse, ProfileResponse};

/// Raw, fallible access to the three read-only endpoints the monitor uses.
///
/// Implementations never place orders.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Public profile of an address.
    async fn profile(&self, address: &str) -> Result<ProfileResponse>;

    /// Most recent activity records for an address, newest first.
    async fn activity(&self, address: &str, limit: u32) -> Result<Vec<ActivityResponse>>;

    /// All reported positions for an address, including those sized to zero.
    async fn positions(&self, address: &str) -> Result<Vec<PositionResponse>>;

    /// Drop any memoized responses.
    fn clear_cache(&self) {}
}
