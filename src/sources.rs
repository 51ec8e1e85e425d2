// Sources analysis: claim volume and false rates by source type.
//
// The backend returns one group per source type (social media, news sites,
// blogs). Each group names its breakdown differently (platforms, categories,
// types), so all three are accepted and merged into `breakdown`.

use serde::{Deserialize, Serialize};

/// A named sub-source inside a group (a platform, outlet type, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceBreakdown {
    pub name: String,
    #[serde(default)]
    pub claims: u64,
    /// Percentage of this sub-source's claims judged false.
    #[serde(default)]
    pub false_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceGroup {
    #[serde(default)]
    pub total_claims: u64,
    #[serde(default)]
    pub false_claims: u64,
    #[serde(default)]
    pub verified_claims: u64,
    #[serde(default, alias = "categories", alias = "types")]
    pub platforms: Vec<SourceBreakdown>,
}

impl SourceGroup {
    /// Share of claims judged false, as a rounded percentage. Zero when the
    /// group has no claims.
    pub fn false_rate(&self) -> u64 {
        percent(self.false_claims, self.total_claims)
    }
}

/// Response of `GET /api/sources/analysis`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourcesAnalysis {
    #[serde(default)]
    pub social_media: SourceGroup,
    #[serde(default)]
    pub news_sites: SourceGroup,
    #[serde(default)]
    pub blogs: SourceGroup,
}

/// One row of the sources table.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub label: &'static str,
    pub total: u64,
    pub false_claims: u64,
    pub verified: u64,
    pub false_rate: u64,
}

/// Headline numbers across every source type.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcesSummary {
    pub total_claims: u64,
    pub overall_false_rate: u64,
    pub platforms_monitored: usize,
}

impl SourcesAnalysis {
    fn groups(&self) -> [(&'static str, &SourceGroup); 3] {
        [
            ("Social Media", &self.social_media),
            ("News Sites", &self.news_sites),
            ("Blogs", &self.blogs),
        ]
    }

    pub fn rows(&self) -> Vec<SourceRow> {
        self.groups()
            .into_iter()
            .map(|(label, group)| SourceRow {
                label,
                total: group.total_claims,
                false_claims: group.false_claims,
                verified: group.verified_claims,
                false_rate: group.false_rate(),
            })
            .collect()
    }

    pub fn summary(&self) -> SourcesSummary {
        let (total, false_total) = self
            .groups()
            .iter()
            .fold((0u64, 0u64), |(t, f), (_, g)| {
                (t + g.total_claims, f + g.false_claims)
            });
        SourcesSummary {
            total_claims: total,
            overall_false_rate: percent(false_total, total),
            platforms_monitored: self.social_media.platforms.len(),
        }
    }
}

fn percent(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u64
}
