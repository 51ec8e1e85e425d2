// Filter + sort pipeline for the claims view.
//
// Criteria are compiled once per recompute so the per-claim predicates
// don't re-normalize the search term or recompute the time cutoff.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

use super::models::{Claim, ClaimStatus};

/// Case normalization shared by every case-insensitive comparison
/// (category, impact, search, feed dedup).
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

/// Parse a `"all"`-or-value selector from user input.
pub fn parse_selection(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Relative time window measured back from "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimePeriod {
    #[default]
    All,
    Week,
    Month,
    Quarter,
    Year,
}

impl TimePeriod {
    /// Window length in days, or `None` for no cutoff.
    pub fn days(self) -> Option<i64> {
        match self {
            TimePeriod::All => None,
            TimePeriod::Week => Some(7),
            TimePeriod::Month => Some(30),
            TimePeriod::Quarter => Some(90),
            TimePeriod::Year => Some(365),
        }
    }

    /// Earliest timestamp still inside the window.
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.days().map(|d| now - Duration::days(d))
    }

    /// Wire value used in `time_period=` query parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            TimePeriod::All => "all",
            TimePeriod::Week => "7d",
            TimePeriod::Month => "30d",
            TimePeriod::Quarter => "90d",
            TimePeriod::Year => "1y",
        }
    }
}

impl FromStr for TimePeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(TimePeriod::All),
            "7d" => Ok(TimePeriod::Week),
            "30d" => Ok(TimePeriod::Month),
            "90d" => Ok(TimePeriod::Quarter),
            "1y" => Ok(TimePeriod::Year),
            other => anyhow::bail!("unknown time period '{other}' (expected all, 7d, 30d, 90d, 1y)"),
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort order for the filtered claim list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    ConfidenceDesc,
    ConfidenceAsc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::DateDesc => "date_desc",
            SortOrder::DateAsc => "date_asc",
            SortOrder::ConfidenceDesc => "confidence_desc",
            SortOrder::ConfidenceAsc => "confidence_asc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "date_desc" => Ok(SortOrder::DateDesc),
            "date_asc" => Ok(SortOrder::DateAsc),
            "confidence_desc" => Ok(SortOrder::ConfidenceDesc),
            "confidence_asc" => Ok(SortOrder::ConfidenceAsc),
            other => anyhow::bail!(
                "unknown sort '{other}' (expected date_desc, date_asc, confidence_desc, confidence_asc)"
            ),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the user can narrow or reorder the claims list by.
///
/// `None` for category/status means "all".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub category: Option<String>,
    pub status: Option<ClaimStatus>,
    pub search_term: String,
    pub time_period: TimePeriod,
    pub sort: SortOrder,
}

impl FilterCriteria {
    /// True when the criteria keep every claim in default order.
    pub fn is_default(&self) -> bool {
        *self == FilterCriteria::default()
    }

    /// Query parameters understood by `/api/claims` and `/api/export`.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "category",
                self.category.clone().unwrap_or_else(|| "all".to_string()),
            ),
            (
                "status",
                self.status
                    .as_ref()
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_else(|| "all".to_string()),
            ),
            ("time_period", self.time_period.as_str().to_string()),
        ]
    }

    /// Single-claim check against these criteria, evaluated at `now`.
    pub fn matches(&self, claim: &Claim, now: DateTime<Utc>) -> bool {
        CompiledFilter::new(self, now).matches(claim)
    }
}

/// Criteria with the search term and category pre-normalized and the time
/// cutoff resolved against a fixed "now".
pub struct CompiledFilter<'a> {
    category: Option<String>,
    status: Option<&'a ClaimStatus>,
    needle: Option<String>,
    cutoff: Option<DateTime<Utc>>,
}

impl<'a> CompiledFilter<'a> {
    pub fn new(criteria: &'a FilterCriteria, now: DateTime<Utc>) -> Self {
        Self {
            category: criteria.category.as_deref().map(normalize),
            status: criteria.status.as_ref(),
            needle: (!criteria.search_term.is_empty()).then(|| normalize(&criteria.search_term)),
            cutoff: criteria.time_period.cutoff(now),
        }
    }

    pub fn matches(&self, claim: &Claim) -> bool {
        if let Some(category) = &self.category {
            if normalize(&claim.category) != *category {
                return false;
            }
        }

        if let Some(status) = self.status {
            if claim.status != *status {
                return false;
            }
        }

        if let Some(needle) = &self.needle {
            if !normalize(&claim.text).contains(needle.as_str()) {
                return false;
            }
        }

        // Claims whose date doesn't parse never fall inside a time window.
        if let Some(cutoff) = self.cutoff {
            match claim.parsed_date() {
                Some(date) if date >= cutoff => {}
                _ => return false,
            }
        }

        true
    }
}

/// Indices of the claims that pass `criteria`, in input order.
pub fn filter_indices(claims: &[Claim], criteria: &FilterCriteria, now: DateTime<Utc>) -> Vec<usize> {
    let compiled = CompiledFilter::new(criteria, now);
    claims
        .iter()
        .enumerate()
        .filter(|(_, claim)| compiled.matches(claim))
        .map(|(i, _)| i)
        .collect()
}

/// Sort claim indices in place. The sort is stable, so ties keep their
/// incoming order.
///
/// Unparseable dates compare as older than any real date: last under
/// `DateDesc`, first under `DateAsc`.
pub fn sort_indices(indices: &mut [usize], claims: &[Claim], order: SortOrder) {
    match order {
        SortOrder::DateDesc | SortOrder::DateAsc => {
            let dates: Vec<Option<DateTime<Utc>>> =
                claims.iter().map(Claim::parsed_date).collect();
            indices.sort_by(|&a, &b| {
                let ord = dates[a].cmp(&dates[b]);
                if order == SortOrder::DateDesc {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }
        SortOrder::ConfidenceDesc => {
            indices.sort_by(|&a, &b| claims[b].confidence.cmp(&claims[a].confidence));
        }
        SortOrder::ConfidenceAsc => {
            indices.sort_by(|&a, &b| claims[a].confidence.cmp(&claims[b].confidence));
        }
    }
}

/// Full pipeline: filter then sort. Returns indices into `claims`.
pub fn apply(claims: &[Claim], criteria: &FilterCriteria, now: DateTime<Utc>) -> Vec<usize> {
    let mut indices = filter_indices(claims, criteria, now);
    sort_indices(&mut indices, claims, criteria.sort);
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_all_means_none() {
        assert_eq!(parse_selection("all"), None);
        assert_eq!(parse_selection("ALL"), None);
        assert_eq!(parse_selection(""), None);
        assert_eq!(parse_selection("Health"), Some("Health".to_string()));
    }

    #[test]
    fn time_period_round_trips_wire_values() {
        for raw in ["all", "7d", "30d", "90d", "1y"] {
            let period: TimePeriod = raw.parse().unwrap();
            assert_eq!(period.as_str(), raw);
        }
        assert!("2w".parse::<TimePeriod>().is_err());
    }

    #[test]
    fn year_is_365_days() {
        assert_eq!(TimePeriod::Year.days(), Some(365));
        assert_eq!(TimePeriod::All.cutoff(Utc::now()), None);
    }

    #[test]
    fn default_query_params_are_all() {
        let params = FilterCriteria::default().query_params();
        assert_eq!(
            params,
            vec![
                ("category", "all".to_string()),
                ("status", "all".to_string()),
                ("time_period", "all".to_string()),
            ]
        );
    }
}
