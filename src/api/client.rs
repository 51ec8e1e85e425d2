// HTTP client for the detection backend's dashboard API.
//
// Every endpoint returns JSON. Failures come back either as a non-2xx
// status or as a 2xx body with an `error` field; both become errors here so
// callers only have one failure path to turn into view state.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::traits::ClaimsFeed;
use crate::analysis::{prepare_text, AnalysisResult, AnalyzeRequest};
use crate::claims::detailed::DetailedClaim;
use crate::claims::filter::{FilterCriteria, TimePeriod};
use crate::claims::models::Claim;
use crate::crisis::{CrisisAlert, CrisisStats};
use crate::dashboard::{DashboardUpdate, Trend};
use crate::insights::Insight;
use crate::sources::SourcesAnalysis;

/// Default backend address (the Flask dev server).
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Per-request timeout for the JSON endpoints.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Analysis runs the full verification pipeline and can take a while.
const ANALYZE_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for the dashboard REST API.
pub struct DashboardClient {
    client: reqwest::Client,
    base_url: String,
}

impl DashboardClient {
    /// Create a client pointing at the given backend base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("claimdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON endpoint and deserialize it.
    ///
    /// `{"error": "..."}` bodies are turned into errors whatever the status.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        debug!(path = path, "API GET request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("Request to {path} failed"))?;

        read_json(path, response).await
    }

    /// POST a JSON body and deserialize the JSON reply, with the same error
    /// handling as `get_json`.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        debug!(path = path, "API POST request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .with_context(|| format!("Request to {path} failed"))?;

        read_json(path, response).await
    }

    /// Fetch claims. Category, status and time period are sent as query
    /// parameters; search and sort are always applied locally.
    pub async fn fetch_claims(&self, criteria: &FilterCriteria) -> Result<Vec<Claim>> {
        let envelope: ClaimsEnvelope = self
            .get_json("/api/claims", &criteria.query_params())
            .await?;
        Ok(decode_records(envelope.claims, "claim"))
    }

    /// The dashboard's recent insights. These records carry no category or
    /// id; use `fetch_all_insights` for the insights view.
    pub async fn fetch_insights(&self, period: TimePeriod) -> Result<Vec<Insight>> {
        self.insights_from("/api/insights", period).await
    }

    /// Every insight with its id, category and confidence.
    pub async fn fetch_all_insights(&self, period: TimePeriod) -> Result<Vec<Insight>> {
        self.insights_from("/api/insights/all", period).await
    }

    async fn insights_from(&self, path: &str, period: TimePeriod) -> Result<Vec<Insight>> {
        let envelope: InsightsEnvelope = self
            .get_json(path, &[("time_period", period.as_str().to_string())])
            .await?;
        Ok(decode_records(envelope.insights, "insight"))
    }

    /// Claims with source, reach and verification metadata. Category,
    /// status and time period are filtered server side.
    pub async fn fetch_detailed_claims(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Vec<DetailedClaim>> {
        let envelope: ClaimsEnvelope = self
            .get_json("/api/claims/detailed", &criteria.query_params())
            .await?;
        Ok(decode_records(envelope.claims, "detailed claim"))
    }

    pub async fn fetch_sources(&self) -> Result<SourcesAnalysis> {
        self.get_json("/api/sources/analysis", &[]).await
    }

    /// Server-side export. The document is passed through untouched.
    pub async fn fetch_export(&self, criteria: &FilterCriteria) -> Result<Value> {
        self.get_json("/api/export", &criteria.query_params()).await
    }

    /// Server-side export flagged as a detailed report.
    pub async fn fetch_detailed_export(&self, criteria: &FilterCriteria) -> Result<Value> {
        self.get_json("/api/export", &detailed_export_params(criteria)).await
    }

    pub async fn fetch_updates(&self) -> Result<Vec<DashboardUpdate>> {
        let envelope: UpdatesEnvelope = self.get_json("/api/updates", &[]).await?;
        Ok(decode_records(envelope.updates, "update"))
    }

    pub async fn fetch_trends(&self) -> Result<Vec<Trend>> {
        let envelope: TrendsEnvelope = self.get_json("/api/trends", &[]).await?;
        Ok(decode_records(envelope.trends, "trend"))
    }

    pub async fn fetch_crisis_alerts(&self) -> Result<Vec<CrisisAlert>> {
        let envelope: AlertsEnvelope = self.get_json("/api/crisis-alerts", &[]).await?;
        Ok(decode_records(envelope.alerts, "crisis alert"))
    }

    pub async fn fetch_crisis_stats(&self) -> Result<CrisisStats> {
        self.get_json("/api/crisis-stats", &[]).await
    }

    /// Submit free text for verification. Blank text is rejected locally.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        let text = prepare_text(text)?;
        self.post_json("/api/analyze", &AnalyzeRequest { text }, ANALYZE_TIMEOUT).await
    }
}

#[async_trait]
impl ClaimsFeed for DashboardClient {
    async fn fetch_claims(&self, criteria: &FilterCriteria) -> Result<Vec<Claim>> {
        DashboardClient::fetch_claims(self, criteria).await
    }
}

/// Decode a batch record by record, dropping (and logging) the ones that
/// don't decode instead of failing the whole batch.
pub fn decode_records<T: DeserializeOwned>(values: Vec<Value>, kind: &str) -> Vec<T> {
    let total = values.len();
    let records: Vec<T> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(kind = kind, index, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect();

    if records.len() < total {
        debug!(kind = kind, kept = records.len(), total, "Batch decoded with drops");
    }
    records
}

/// Query for a detailed export: the claims filters plus the report type.
pub fn detailed_export_params(criteria: &FilterCriteria) -> Vec<(&'static str, String)> {
    let mut params = criteria.query_params();
    params.push(("report_type", "detailed".to_string()));
    params
}

/// Check the status, surface `{error}` bodies and deserialize the rest.
async fn read_json<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to read {path} response"))?;

    if !status.is_success() {
        let message = error_message(&body).unwrap_or(body);
        anyhow::bail!("{path} returned {status}: {message}");
    }

    let value: Value = serde_json::from_str(&body)
        .with_context(|| format!("{path} returned invalid JSON"))?;
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        anyhow::bail!("{path} reported an error: {message}");
    }

    serde_json::from_value(value).with_context(|| format!("Failed to deserialize {path} response"))
}

/// Pull the `error` message out of a JSON error body, if there is one.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(str::to_string)
}

// -- Response envelopes --

#[derive(Deserialize)]
struct ClaimsEnvelope {
    #[serde(default)]
    claims: Vec<Value>,
}

#[derive(Deserialize)]
struct InsightsEnvelope {
    #[serde(default)]
    insights: Vec<Value>,
}

#[derive(Deserialize)]
struct UpdatesEnvelope {
    #[serde(default)]
    updates: Vec<Value>,
}

#[derive(Deserialize)]
struct TrendsEnvelope {
    #[serde(default)]
    trends: Vec<Value>,
}

#[derive(Deserialize)]
struct AlertsEnvelope {
    #[serde(default)]
    alerts: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn one_bad_record_does_not_sink_the_batch() {
        let claims: Vec<Claim> = decode_records(
            vec![
                json!({"id": 1, "text": "ok", "confidence": 50}),
                json!("not a claim"),
                json!({"id": 3, "text": "also ok"}),
            ],
            "claim",
        );
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[1].text, "also ok");
    }

    #[test]
    fn error_message_is_extracted() {
        assert_eq!(
            error_message(r#"{"error": "boom", "claims": []}"#),
            Some("boom".to_string())
        );
        assert_eq!(error_message("<html>502</html>"), None);
    }

    #[test]
    fn detailed_export_adds_report_type() {
        let params = detailed_export_params(&FilterCriteria::default());
        assert_eq!(params.len(), 4);
        assert_eq!(params[3], ("report_type", "detailed".to_string()));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = DashboardClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }
}
