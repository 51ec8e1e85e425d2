// Dashboard feed records polled from /api/updates and /api/trends.

use serde::{Deserialize, Serialize};

use crate::claims::models::ClaimStatus;

/// A recent verification summary as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardUpdate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub status: String,
}

impl DashboardUpdate {
    pub fn claim_status(&self) -> ClaimStatus {
        ClaimStatus::parse(&self.status)
    }
}

/// A trending misinformation topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub mentions: u64,
    #[serde(default, rename = "falseClaims")]
    pub false_claims: u64,
}

/// The top three trends get highlighted.
pub fn is_top_rank(index: usize) -> bool {
    index < 3
}
