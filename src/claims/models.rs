// Claim records as served by the dashboard backend.
//
// Decoding is forgiving: every field falls back to a safe default instead
// of failing the record. A record only fails outright when it isn't a JSON
// object at all.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Claim identifier. The backend uses integers, but strings are tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ClaimId {
    Int(i64),
    Text(String),
}

impl ClaimId {
    /// Numeric value of the id, if it has one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ClaimId::Int(n) => Some(*n),
            ClaimId::Text(s) => s.trim().parse().ok(),
        }
    }

    fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => ClaimId::Int(i),
                None => ClaimId::Text(n.to_string()),
            },
            Some(Value::String(s)) => ClaimId::Text(s.clone()),
            _ => ClaimId::Text(String::new()),
        }
    }
}

impl fmt::Display for ClaimId {
    /// Integer ids render as `CLM-0042`; anything else is shown verbatim.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimId::Int(n) => write!(f, "CLM-{n:04}"),
            ClaimId::Text(s) if s.is_empty() => write!(f, "CLM-?"),
            ClaimId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Verification status of a claim.
///
/// The set is closed on the backend, but anything unrecognized is kept as
/// `Unknown` so the status filter can still compare raw values exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClaimStatus {
    False,
    Verified,
    Pending,
    Unknown(String),
}

impl ClaimStatus {
    /// Map a raw backend value to a status. Matching is exact.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "false" => ClaimStatus::False,
            "verified" => ClaimStatus::Verified,
            "pending" => ClaimStatus::Pending,
            other => ClaimStatus::Unknown(other.to_string()),
        }
    }

    /// The raw wire value.
    pub fn as_str(&self) -> &str {
        match self {
            ClaimStatus::False => "false",
            ClaimStatus::Verified => "verified",
            ClaimStatus::Pending => "pending",
            ClaimStatus::Unknown(raw) => raw,
        }
    }

    /// Human-readable label. Unrecognized statuses display as pending.
    pub fn label(&self) -> &'static str {
        match self {
            ClaimStatus::False => "False",
            ClaimStatus::Verified => "Verified",
            ClaimStatus::Pending | ClaimStatus::Unknown(_) => "Pending",
        }
    }

    /// The status used for display styling.
    pub fn display_status(&self) -> ClaimStatus {
        match self {
            ClaimStatus::Unknown(_) => ClaimStatus::Pending,
            known => known.clone(),
        }
    }
}

impl FromStr for ClaimStatus {
    type Err = anyhow::Error;

    /// Strict parse for user input. Only the three known statuses are accepted.
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match ClaimStatus::parse(&s.to_lowercase()) {
            ClaimStatus::Unknown(_) => {
                anyhow::bail!("unknown status '{s}' (expected false, verified or pending)")
            }
            status => Ok(status),
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for ClaimStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single claim tracked by the detection backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Claim {
    pub id: ClaimId,
    pub text: String,
    pub category: String,
    pub status: ClaimStatus,
    /// ISO-8601 date as sent by the backend. See [`Claim::parsed_date`].
    pub date: String,
    /// Confidence percentage, always within 0..=100.
    pub confidence: u8,
}

impl Claim {
    /// Decode a claim from a JSON value, falling back per field.
    ///
    /// Returns `None` only when the value is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let string_field = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Some(Self {
            id: ClaimId::from_value(obj.get("id")),
            text: string_field("text"),
            category: string_field("category"),
            status: ClaimStatus::parse(obj.get("status").and_then(Value::as_str).unwrap_or("")),
            date: string_field("date"),
            confidence: confidence_from_value(obj.get("confidence")),
        })
    }

    /// The claim date as a UTC timestamp, or `None` if it doesn't parse.
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        parse_claim_date(&self.date)
    }
}

impl<'de> Deserialize<'de> for Claim {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Claim::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom("claim record is not a JSON object"))
    }
}

/// Parse a claim date. Accepts RFC 3339, naive ISO datetimes and plain
/// `YYYY-MM-DD` dates (taken as midnight UTC).
pub fn parse_claim_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Coerce a confidence value into 0..=100.
///
/// Accepts integers, floats (rounded) and numeric strings. Anything else is 0.
fn confidence_from_value(value: Option<&Value>) -> u8 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(v) if v.is_finite() => v.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

/// Platform label shown next to a claim, derived from its numeric id.
pub fn source_label(id: &ClaimId) -> &'static str {
    const SOURCES: [&str; 5] = ["Twitter", "Facebook", "News Site", "Blog", "Forum"];
    match id.as_int() {
        Some(n) => SOURCES[n.rem_euclid(SOURCES.len() as i64) as usize],
        None => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_a_well_formed_claim() {
        let claim = Claim::from_value(&json!({
            "id": 1,
            "text": "Vaccines contain microchips",
            "category": "Health",
            "status": "false",
            "date": "2023-11-15",
            "confidence": 95
        }))
        .unwrap();
        assert_eq!(claim.id, ClaimId::Int(1));
        assert_eq!(claim.status, ClaimStatus::False);
        assert_eq!(claim.confidence, 95);
        assert!(claim.parsed_date().is_some());
    }

    #[test]
    fn missing_fields_fall_back() {
        let claim = Claim::from_value(&json!({ "id": "abc" })).unwrap();
        assert_eq!(claim.text, "");
        assert_eq!(claim.confidence, 0);
        assert_eq!(claim.status, ClaimStatus::Unknown(String::new()));
        assert!(claim.parsed_date().is_none());
    }

    #[test]
    fn confidence_is_clamped_and_rounded() {
        assert_eq!(confidence_from_value(Some(&json!(140))), 100);
        assert_eq!(confidence_from_value(Some(&json!(-3))), 0);
        assert_eq!(confidence_from_value(Some(&json!(72.6))), 73);
        assert_eq!(confidence_from_value(Some(&json!("88%"))), 88);
        assert_eq!(confidence_from_value(Some(&json!(null))), 0);
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(Claim::from_value(&json!("just a string")).is_none());
        assert!(serde_json::from_value::<Claim>(json!(42)).is_err());
    }

    #[test]
    fn unknown_status_displays_as_pending() {
        let status = ClaimStatus::parse("disputed");
        assert_eq!(status.label(), "Pending");
        assert_eq!(status.display_status(), ClaimStatus::Pending);
        assert_eq!(status.as_str(), "disputed");
    }

    #[test]
    fn strict_status_parse_rejects_unknown() {
        assert_eq!("Verified".parse::<ClaimStatus>().unwrap(), ClaimStatus::Verified);
        assert!("disputed".parse::<ClaimStatus>().is_err());
    }

    #[test]
    fn parses_date_formats() {
        assert!(parse_claim_date("2023-11-15").is_some());
        assert!(parse_claim_date("2023-11-15T10:30:00Z").is_some());
        assert!(parse_claim_date("2023-11-15T10:30:00.123456").is_some());
        assert!(parse_claim_date("last tuesday").is_none());
    }

    #[test]
    fn id_display_and_source() {
        assert_eq!(ClaimId::Int(7).to_string(), "CLM-0007");
        assert_eq!(source_label(&ClaimId::Int(1)), "Facebook");
        assert_eq!(source_label(&ClaimId::Text("x".into())), "Unknown");
    }
}
