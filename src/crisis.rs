// Crisis monitoring: active crisis alerts and the crisis stats panel.
//
// The same alert shape comes from two places. /api/crisis-alerts lists the
// alerts the backend is tracking, and the `crisis_alert` push event carries
// a verification payload plus a `crisis_context` map of matched crisis
// types. Both decode into CrisisAlert.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::claims::filter::normalize;

/// Leading characters of an alert's claim used to match it against other
/// claim text.
pub const ALERT_MATCH_CHARS: usize = 20;

/// One crisis type matched in a claim, with the keywords that triggered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisMatch {
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub triggers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisAlert {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub claim: String,
    #[serde(default)]
    pub crisis_type: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub reach: Option<u64>,
    #[serde(default)]
    pub first_detected: Option<String>,
    #[serde(default)]
    pub trend: Option<String>,
    #[serde(default)]
    pub recommended_action: Option<String>,
    /// Only on pushed alerts: crisis type -> match details.
    #[serde(default)]
    pub crisis_context: BTreeMap<String, CrisisMatch>,
}

impl CrisisAlert {
    /// The alert's crisis type, or the best-matching type from its context
    /// when the backend didn't name one.
    pub fn kind(&self) -> Option<&str> {
        if let Some(kind) = self.crisis_type.as_deref().filter(|k| !k.is_empty()) {
            return Some(kind);
        }
        self.crisis_context
            .iter()
            .max_by(|a, b| a.1.confidence.total_cmp(&b.1.confidence))
            .map(|(kind, _)| kind.as_str())
    }

    /// "HEALTH CRISIS - high RISK"
    pub fn badge(&self) -> String {
        let kind = self.kind().unwrap_or("unknown").to_uppercase();
        match self.severity.as_deref() {
            Some(severity) if !severity.is_empty() => format!("{kind} CRISIS - {severity} RISK"),
            _ => format!("{kind} CRISIS"),
        }
    }

    /// Whether `claim` mentions this alert's claim, judged on the alert's
    /// first ALERT_MATCH_CHARS characters.
    pub fn matches(&self, claim: &str) -> bool {
        let head: String = normalize(&self.claim)
            .chars()
            .take(ALERT_MATCH_CHARS)
            .collect();
        !head.is_empty() && normalize(claim).contains(&head)
    }
}

/// First alert in `alerts` that matches `claim`.
pub fn matching_alert<'a>(claim: &str, alerts: &'a [CrisisAlert]) -> Option<&'a CrisisAlert> {
    alerts.iter().find(|alert| alert.matches(claim))
}

/// Headline numbers from /api/crisis-stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisStats {
    #[serde(default)]
    pub active_crises: u64,
    #[serde(default)]
    pub crisis_claims_today: u64,
    #[serde(default)]
    pub high_risk_alerts: u64,
    #[serde(default)]
    pub response_time_minutes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(claim: &str) -> CrisisAlert {
        CrisisAlert {
            id: None,
            claim: claim.to_string(),
            crisis_type: Some("health".to_string()),
            severity: Some("high".to_string()),
            reach: None,
            first_detected: None,
            trend: None,
            recommended_action: None,
            crisis_context: BTreeMap::new(),
        }
    }

    #[test]
    fn badge_reads_type_and_severity() {
        assert_eq!(alert("x").badge(), "HEALTH CRISIS - high RISK");
    }

    #[test]
    fn kind_falls_back_to_strongest_context_match() {
        let mut pushed = alert("Dam burst upstream");
        pushed.crisis_type = None;
        pushed.severity = None;
        pushed.crisis_context.insert(
            "disaster".to_string(),
            CrisisMatch {
                confidence: 0.4,
                triggers: vec!["dam".to_string()],
            },
        );
        pushed.crisis_context.insert(
            "health".to_string(),
            CrisisMatch {
                confidence: 0.1,
                triggers: vec![],
            },
        );
        assert_eq!(pushed.kind(), Some("disaster"));
        assert_eq!(pushed.badge(), "DISASTER CRISIS");
    }

    #[test]
    fn empty_alert_claim_matches_nothing() {
        assert!(!alert("").matches("anything at all"));
    }
}
