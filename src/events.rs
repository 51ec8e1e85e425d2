// Real-time push events from the detection backend.
//
// The backend emits three named Socket.IO events: `new_verification` for
// every claim it scores, `human_review` for high-risk ones, and
// `crisis_alert` when a claim touches an active crisis. The socket client
// in api::realtime hands each event's JSON argument to PushEvent::from_value.
//
// LiveFeed is the dashboard's "recent updates" panel. It also accepts
// polled /api/updates entries and skips claims it has already shown, so
// push and polling never double-count the same claim.

use std::collections::VecDeque;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::claims::filter::normalize;
use crate::claims::models::ClaimStatus;
use crate::crisis::{matching_alert, CrisisAlert};
use crate::dashboard::DashboardUpdate;

/// Updates kept in the live panel.
pub const FEED_CAPACITY: usize = 10;

/// Review items kept in the human review queue.
pub const REVIEW_QUEUE_CAPACITY: usize = 50;

/// Crisis alerts remembered for matching review items.
pub const CRISIS_CAPACITY: usize = 20;

/// Scores strictly above this are verified, strictly below the negative are false.
pub const SCORE_THRESHOLD: f64 = 0.3;

/// Event names the backend pushes.
pub const PUSH_EVENT_NAMES: [&str; 3] = ["new_verification", "human_review", "crisis_alert"];

/// Payload of `new_verification` and `human_review`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub claim: String,
    /// Credibility score in -1.0..=1.0; negative leans false.
    #[serde(default)]
    pub score: f64,
    #[serde(default = "uncertain")]
    pub severity: String,
    #[serde(default)]
    pub emerging: bool,
    /// Where the verified content came from, when the publisher knows.
    #[serde(default)]
    pub origin: Option<String>,
}

fn uncertain() -> String {
    "Uncertain".to_string()
}

impl Verification {
    pub fn status(&self) -> ClaimStatus {
        status_for_score(self.score)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    NewVerification(Verification),
    CrisisAlert(CrisisAlert),
    HumanReview(Verification),
}

impl PushEvent {
    /// Decode a named event from its JSON argument. Unknown event names
    /// yield `Ok(None)` so new backend events don't break older clients.
    pub fn from_value(name: &str, payload: Value) -> Result<Option<Self>> {
        let event = match name {
            "new_verification" => PushEvent::NewVerification(
                serde_json::from_value(payload).context("Invalid new_verification payload")?,
            ),
            "human_review" => PushEvent::HumanReview(
                serde_json::from_value(payload).context("Invalid human_review payload")?,
            ),
            "crisis_alert" => PushEvent::CrisisAlert(
                serde_json::from_value(payload).context("Invalid crisis_alert payload")?,
            ),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    /// Decode a named event from raw JSON text.
    pub fn decode(name: &str, data: &str) -> Result<Option<Self>> {
        if !PUSH_EVENT_NAMES.contains(&name) {
            return Ok(None);
        }
        let payload: Value =
            serde_json::from_str(data).with_context(|| format!("Invalid {name} payload"))?;
        Self::from_value(name, payload)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PushEvent::NewVerification(_) => "new_verification",
            PushEvent::CrisisAlert(_) => "crisis_alert",
            PushEvent::HumanReview(_) => "human_review",
        }
    }
}

/// Map a credibility score onto the claim status scale.
pub fn status_for_score(score: f64) -> ClaimStatus {
    if score < -SCORE_THRESHOLD {
        ClaimStatus::False
    } else if score > SCORE_THRESHOLD {
        ClaimStatus::Verified
    } else {
        ClaimStatus::Pending
    }
}

// -- Live feed --

/// One line in the live updates panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveUpdate {
    pub claim: String,
    pub summary: String,
    pub status: ClaimStatus,
    pub time: String,
}

/// Running totals by status, bumped once per newly seen claim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub false_claims: u64,
    pub verified: u64,
    pub pending: u64,
}

impl StatusCounts {
    fn bump(&mut self, status: &ClaimStatus) {
        match status.display_status() {
            ClaimStatus::False => self.false_claims += 1,
            ClaimStatus::Verified => self.verified += 1,
            _ => self.pending += 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct LiveFeed {
    updates: VecDeque<LiveUpdate>,
    counts: StatusCounts,
    review_queue: VecDeque<Verification>,
    /// Newest first. The head is the active crisis banner.
    crises: VecDeque<CrisisAlert>,
}

impl LiveFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a push event. Returns false if it was a duplicate and nothing
    /// changed.
    pub fn apply(&mut self, event: PushEvent) -> bool {
        match event {
            PushEvent::NewVerification(v) => {
                let update = LiveUpdate {
                    status: v.status(),
                    summary: format!("Claim analyzed: {}", v.severity),
                    time: v.timestamp.clone().unwrap_or_else(|| "Just now".to_string()),
                    claim: v.claim,
                };
                self.push_update(update)
            }
            PushEvent::HumanReview(v) => {
                let key = normalize(&v.claim);
                if self.review_queue.iter().any(|r| normalize(&r.claim) == key) {
                    return false;
                }
                self.review_queue.push_front(v);
                self.review_queue.truncate(REVIEW_QUEUE_CAPACITY);
                true
            }
            PushEvent::CrisisAlert(alert) => {
                let key = normalize(&alert.claim);
                self.crises.retain(|c| normalize(&c.claim) != key);
                self.crises.push_front(alert);
                self.crises.truncate(CRISIS_CAPACITY);
                true
            }
        }
    }

    /// Fold in a polled batch of dashboard updates, skipping claims already
    /// shown. Returns how many were added.
    pub fn merge_polled(&mut self, polled: Vec<DashboardUpdate>) -> usize {
        // Polled lists come newest-first; insert oldest-first so the order holds.
        let mut added = 0;
        for u in polled.into_iter().rev() {
            let update = LiveUpdate {
                status: u.claim_status(),
                claim: u.title,
                summary: u.content,
                time: u.time,
            };
            if self.push_update(update) {
                added += 1;
            }
        }
        added
    }

    fn push_update(&mut self, update: LiveUpdate) -> bool {
        let key = normalize(&update.claim);
        if self.updates.iter().any(|u| normalize(&u.claim) == key) {
            return false;
        }
        self.counts.bump(&update.status);
        self.updates.push_front(update);
        self.updates.truncate(FEED_CAPACITY);
        true
    }

    /// Newest first.
    pub fn updates(&self) -> impl Iterator<Item = &LiveUpdate> {
        self.updates.iter()
    }

    pub fn counts(&self) -> StatusCounts {
        self.counts
    }

    pub fn review_queue(&self) -> impl Iterator<Item = &Verification> {
        self.review_queue.iter()
    }

    /// Seed the known crises from /api/crisis-alerts. Pushed alerts stay
    /// ahead of the listed ones.
    pub fn load_crises(&mut self, alerts: Vec<CrisisAlert>) {
        for alert in alerts {
            let key = normalize(&alert.claim);
            if !self.crises.iter().any(|c| normalize(&c.claim) == key) {
                self.crises.push_back(alert);
            }
        }
        self.crises.truncate(CRISIS_CAPACITY);
    }

    /// The most recent crisis alert, shown as the banner.
    pub fn crisis(&self) -> Option<&CrisisAlert> {
        self.crises.front()
    }

    /// The known crisis a claim belongs to, if any.
    pub fn crisis_for(&self, claim: &str) -> Option<&CrisisAlert> {
        let (front, back) = self.crises.as_slices();
        matching_alert(claim, front).or_else(|| matching_alert(claim, back))
    }
}
