// On-demand claim analysis: POST /api/analyze.
//
// The backend extracts claims from free text and returns one verification
// with a -1..=1 score, a severity label and a 0..=1 confidence.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::claims::filter::normalize;
use crate::claims::models::ClaimStatus;

/// Request body for /api/analyze.
#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Claims the backend extracted from the submitted text.
    #[serde(default)]
    pub claims: Vec<String>,
    #[serde(default)]
    pub verification: Option<VerificationReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    #[serde(default)]
    pub claim: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub severity: String,
    /// 0.0..=1.0
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub verification_method: String,
    #[serde(default)]
    pub analysis: String,
}

impl VerificationReport {
    pub fn status(&self) -> ClaimStatus {
        status_for_severity(&self.severity)
    }

    /// Confidence as a percentage, clamped to 0..=100.
    pub fn confidence_percent(&self) -> f64 {
        (self.confidence * 100.0).clamp(0.0, 100.0)
    }
}

/// Map a severity label onto the claim status scale. "LIKELY FALSE" and
/// friends are false, the "CREDIBLE" labels verified, anything else pending.
pub fn status_for_severity(severity: &str) -> ClaimStatus {
    let severity = normalize(severity);
    if severity.contains("false") {
        ClaimStatus::False
    } else if severity.contains("credible") {
        ClaimStatus::Verified
    } else {
        ClaimStatus::Pending
    }
}

/// Trim user input and reject empty text before it goes to the backend.
pub fn prepare_text(raw: &str) -> Result<&str> {
    let text = raw.trim();
    if text.is_empty() {
        anyhow::bail!("Please enter a claim to analyze.");
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ladder_maps_to_status() {
        assert_eq!(status_for_severity("VERY LIKELY FALSE"), ClaimStatus::False);
        assert_eq!(status_for_severity("LIKELY FALSE"), ClaimStatus::False);
        assert_eq!(status_for_severity("SUSPICIOUS"), ClaimStatus::Pending);
        assert_eq!(status_for_severity("NEUTRAL"), ClaimStatus::Pending);
        assert_eq!(status_for_severity("PLAUSIBLE"), ClaimStatus::Pending);
        assert_eq!(status_for_severity("CREDIBLE"), ClaimStatus::Verified);
        assert_eq!(status_for_severity("Highly Credible"), ClaimStatus::Verified);
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(prepare_text("   \n").is_err());
        assert_eq!(prepare_text("  The moon is cheese ").unwrap(), "The moon is cheese");
    }
}
