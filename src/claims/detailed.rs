// Detailed claim records from /api/claims/detailed and their summary stats.
//
// A detailed record is an ordinary claim plus reach and verification
// metadata. It decodes with the same per-field fallbacks as Claim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::filter::{apply, FilterCriteria};
use super::models::{Claim, ClaimStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedClaim {
    #[serde(flatten)]
    pub claim: Claim,
    pub source: String,
    pub reach_estimate: u64,
    /// Human-readable duration such as "12 minutes".
    pub verification_time: String,
    pub similar_claims: u64,
    /// 0..=100.
    pub impact_score: u8,
}

impl DetailedClaim {
    /// Returns `None` only when the value is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let claim = Claim::from_value(value)?;
        let obj = value.as_object()?;
        let string_field = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Some(Self {
            claim,
            source: string_field("source"),
            reach_estimate: count_from_value(obj.get("reach_estimate")),
            verification_time: string_field("verification_time"),
            similar_claims: count_from_value(obj.get("similar_claims")),
            impact_score: count_from_value(obj.get("impact_score")).min(100) as u8,
        })
    }

    /// Minutes taken to verify, parsed from `verification_time`.
    pub fn verification_minutes(&self) -> Option<u64> {
        parse_minutes(&self.verification_time)
    }
}

impl<'de> Deserialize<'de> for DetailedClaim {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        DetailedClaim::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom("claim record is not a JSON object"))
    }
}

/// Non-negative integer from a number or numeric string. Anything else is 0.
fn count_from_value(value: Option<&Value>) -> u64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(v) if v.is_finite() && v > 0.0 => v.round() as u64,
        _ => 0,
    }
}

/// "45 seconds", "12 minutes", "2 hours", "1 day" -> whole minutes.
pub fn parse_minutes(raw: &str) -> Option<u64> {
    let mut parts = raw.split_whitespace();
    let amount: f64 = parts.next()?.parse().ok()?;
    let unit = parts.next().unwrap_or("minutes").to_lowercase();
    let per_unit = match unit.trim_end_matches('s') {
        "second" | "sec" => 1.0 / 60.0,
        "minute" | "min" | "m" => 1.0,
        "hour" | "hr" | "h" => 60.0,
        "day" | "d" => 1440.0,
        _ => return None,
    };
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    Some((amount * per_unit).round() as u64)
}

/// Apply the claims filter pipeline to detailed records, returning them in
/// display order.
pub fn select<'a>(
    records: &'a [DetailedClaim],
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> Vec<&'a DetailedClaim> {
    let claims: Vec<Claim> = records.iter().map(|r| r.claim.clone()).collect();
    apply(&claims, criteria, now)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

/// Headline numbers over a set of detailed records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetailedSummary {
    pub total: usize,
    /// Whole percent of records marked false.
    pub false_rate: u64,
    pub total_reach: u64,
    /// Mean verification time over the records whose time parses.
    pub avg_verification_minutes: Option<u64>,
}

pub fn summarize<'a>(records: impl IntoIterator<Item = &'a DetailedClaim>) -> DetailedSummary {
    let mut summary = DetailedSummary::default();
    let mut false_count = 0u64;
    let mut minutes = Vec::new();

    for record in records {
        summary.total += 1;
        if record.claim.status == ClaimStatus::False {
            false_count += 1;
        }
        summary.total_reach += record.reach_estimate;
        if let Some(m) = record.verification_minutes() {
            minutes.push(m);
        }
    }

    if summary.total > 0 {
        summary.false_rate = (false_count as f64 / summary.total as f64 * 100.0).round() as u64;
    }
    if !minutes.is_empty() {
        let sum: u64 = minutes.iter().sum();
        summary.avg_verification_minutes =
            Some((sum as f64 / minutes.len() as f64).round() as u64);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_parse_common_units() {
        assert_eq!(parse_minutes("12 minutes"), Some(12));
        assert_eq!(parse_minutes("1 hour"), Some(60));
        assert_eq!(parse_minutes("2 days"), Some(2880));
        assert_eq!(parse_minutes("90 seconds"), Some(2));
        assert_eq!(parse_minutes("soon"), None);
        assert_eq!(parse_minutes(""), None);
    }

    #[test]
    fn counts_tolerate_strings_and_junk() {
        assert_eq!(count_from_value(Some(&Value::from("12,500"))), 12500);
        assert_eq!(count_from_value(Some(&Value::from(-4))), 0);
        assert_eq!(count_from_value(Some(&Value::Bool(true))), 0);
        assert_eq!(count_from_value(None), 0);
    }
}
