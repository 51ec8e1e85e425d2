// Claim source abstraction, so the poller can run against a fake feed.

use anyhow::Result;
use async_trait::async_trait;

use crate::claims::filter::FilterCriteria;
use crate::claims::models::Claim;

/// Anything that can produce a fresh batch of claims.
#[async_trait]
pub trait ClaimsFeed: Send + Sync {
    /// Fetch claims narrowed server-side by `criteria`'s category, status
    /// and time period.
    async fn fetch_claims(&self, criteria: &FilterCriteria) -> Result<Vec<Claim>>;
}
