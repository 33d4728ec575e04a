use evidence::ClaimStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary used when the model left the evidence field out.
pub const MISSING_SUMMARY: &str = "No summary provided.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    Government,
    Academic,
    News,
    Opinion,
    Unknown,
}

impl SourceType {
    /// Map the model's free-form category onto a known source type.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match label.as_str() {
            "GOVERNMENT" | "GOV" | "OFFICIAL" => SourceType::Government,
            "ACADEMIC" | "SCIENTIFIC" | "JOURNAL" => SourceType::Academic,
            "NEWS" | "MAINSTREAM_NEWS" | "MEDIA" => SourceType::News,
            "OPINION" | "BLOG" | "SOCIAL" | "SOCIAL_MEDIA" => SourceType::Opinion,
            _ => SourceType::Unknown,
        }
    }
}

/// One evidentiary judgment, keyed by the claim's 1-based position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub claim_index: usize,
    pub status: ClaimStatus,
    pub confidence_score: u8,
    pub source_type: SourceType,
    pub evidence_summary: String,
}

/// Verdicts by claim index. Partial by nature: any index may be missing.
pub type VerdictMap = BTreeMap<usize, Verdict>;

/// Final per-claim output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimResult {
    pub claim: String,
    pub status: ClaimStatus,
    pub confidence_score: u8,
    pub source_type: SourceType,
    /// Cited source URL, or a sentinel such as "No reliable sources found"
    pub source_url: String,
    pub evidence: String,
    /// Set only when a trusted source URL exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_source: Option<String>,
}

/// Shapes the reasoning service is known to answer a judge prompt with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawVerdicts {
    List(Vec<serde_json::Value>),
    Wrapped { results: Vec<serde_json::Value> },
}

impl RawVerdicts {
    pub(crate) fn into_items(self) -> Vec<serde_json::Value> {
        match self {
            RawVerdicts::List(items) | RawVerdicts::Wrapped { results: items } => items,
        }
    }
}

/// Every field optional and untyped; a field with an unexpected type falls
/// back to its default in [`RawVerdict::into_verdict`] instead of failing the item.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawVerdict {
    pub claim_index: Option<serde_json::Value>,
    pub status: Option<serde_json::Value>,
    pub confidence_score: Option<serde_json::Value>,
    pub source_type: Option<serde_json::Value>,
    pub evidence: Option<serde_json::Value>,
    pub evidence_summary: Option<serde_json::Value>,
}

/// Trimmed, non-empty string content of a field; anything else is absent.
fn text_field(value: Option<&serde_json::Value>) -> Option<&str> {
    value
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

impl RawVerdict {
    pub(crate) fn index(&self) -> Option<usize> {
        match self.claim_index.as_ref()? {
            serde_json::Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
                .and_then(|n| usize::try_from(n).ok()),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub(crate) fn into_verdict(self, claim_index: usize) -> Verdict {
        let status = match text_field(self.status.as_ref()).map(str::to_ascii_uppercase) {
            Some(s) if s == "SUPPORTED" => ClaimStatus::Supported,
            Some(s) if s == "CONTRADICTED" => ClaimStatus::Contradicted,
            _ => ClaimStatus::Unsure,
        };

        let confidence = match &self.confidence_score {
            Some(serde_json::Value::Number(n)) => n.as_f64(),
            Some(serde_json::Value::String(s)) => s.trim().trim_end_matches('%').parse().ok(),
            _ => None,
        };

        let evidence_summary = text_field(self.evidence.as_ref())
            .or_else(|| text_field(self.evidence_summary.as_ref()))
            .unwrap_or(MISSING_SUMMARY)
            .to_string();

        Verdict {
            claim_index,
            status,
            confidence_score: clamp_confidence(confidence),
            source_type: text_field(self.source_type.as_ref())
                .map(SourceType::from_label)
                .unwrap_or(SourceType::Unknown),
            evidence_summary,
        }
    }
}

fn clamp_confidence(score: Option<f64>) -> u8 {
    match score {
        Some(s) if s.is_finite() => s.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}
