// Insights: trend summaries produced by the detection backend.
//
// The time window is applied server-side (it's a query parameter); category
// and impact are narrowed locally using the same case normalization as the
// claims filter.

use serde::{Deserialize, Serialize};

use crate::claims::filter::normalize;
use crate::paging::Paginator;

/// Insight cards shown per page.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// A single insight card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Relative age as sent by the backend ("3 hours ago").
    #[serde(default)]
    pub time: String,
    /// Percentage change; negative means the topic is cooling off.
    #[serde(default)]
    pub trend: f64,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Impact level of an insight. Unrecognized values style as medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn parse(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "high" => Impact::High,
            "low" => Impact::Low,
            _ => Impact::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Impact::High => "High",
            Impact::Medium => "Medium",
            Impact::Low => "Low",
        }
    }
}

impl Insight {
    pub fn impact_level(&self) -> Impact {
        Impact::parse(&self.impact)
    }

    pub fn is_rising(&self) -> bool {
        self.trend > 0.0
    }
}

/// Local narrowing for the insights grid. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightFilter {
    pub category: Option<String>,
    pub impact: Option<String>,
}

impl InsightFilter {
    pub fn matches(&self, insight: &Insight) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| normalize(c) == normalize(&insight.category));
        let impact_ok = self
            .impact
            .as_deref()
            .map_or(true, |i| normalize(i) == normalize(&insight.impact));
        category_ok && impact_ok
    }
}

/// Paged, filterable list of insights. Same shape as the claims view but
/// without sorting: insights keep backend order.
#[derive(Debug, Clone)]
pub struct InsightsView {
    all: Vec<Insight>,
    visible: Vec<usize>,
    filter: InsightFilter,
    pager: Paginator,
}

impl Default for InsightsView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl InsightsView {
    pub fn new(page_size: usize) -> Self {
        Self {
            all: Vec::new(),
            visible: Vec::new(),
            filter: InsightFilter::default(),
            pager: Paginator::new(page_size),
        }
    }

    /// Replace the insight set, keeping the current filter.
    pub fn load(&mut self, insights: Vec<Insight>) {
        self.all = insights;
        self.recompute();
    }

    pub fn apply_filter(&mut self, filter: InsightFilter) {
        self.filter = filter;
        self.recompute();
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.pager.go_to(page, self.visible.len())
    }

    pub fn next_page(&mut self) -> bool {
        self.pager.next(self.visible.len())
    }

    pub fn previous_page(&mut self) -> bool {
        self.pager.previous(self.visible.len())
    }

    pub fn current_page_items(&self) -> Vec<&Insight> {
        self.visible[self.pager.window(self.visible.len())]
            .iter()
            .map(|&i| &self.all[i])
            .collect()
    }

    pub fn visible(&self) -> Vec<&Insight> {
        self.visible.iter().map(|&i| &self.all[i]).collect()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.visible.len())
    }

    pub fn current_page(&self) -> usize {
        self.pager.current()
    }

    fn recompute(&mut self) {
        self.visible = self
            .all
            .iter()
            .enumerate()
            .filter(|(_, insight)| self.filter.matches(insight))
            .map(|(i, _)| i)
            .collect();
        self.pager.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_sparse_insight() {
        let insight: Insight =
            serde_json::from_str(r#"{"title": "Health Misinformation Spike", "trend": 45}"#)
                .unwrap();
        assert_eq!(insight.id, None);
        assert!(insight.is_rising());
        assert_eq!(insight.impact_level(), Impact::Medium);
    }

    #[test]
    fn impact_parse_is_case_insensitive() {
        assert_eq!(Impact::parse("HIGH"), Impact::High);
        assert_eq!(Impact::parse("low"), Impact::Low);
        assert_eq!(Impact::parse("critical"), Impact::Medium);
    }
}
