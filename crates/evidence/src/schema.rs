use extract::Claim;
use serde::{Deserialize, Serialize};

/// Source text shown when filtering left nothing to cite.
pub const NO_RELIABLE_SOURCES: &str = "No reliable sources found";

/// Source text shown when the search provider itself failed.
pub const SEARCH_ENGINE_ERROR: &str = "Search engine error";

/// One raw search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Supported,
    Contradicted,
    Unsure,
    Error,
}

/// Why a claim has no evidence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvidenceFailure {
    /// Every result was dropped by the trust filter, or there were none.
    /// An expected outcome rather than an error.
    #[error("No reliable sources found after filtering.")]
    NoReliableSources,

    /// The search provider call failed; carries the provider's error text.
    #[error("{0}")]
    SearchFailed(String),
}

impl EvidenceFailure {
    pub fn status(&self) -> ClaimStatus {
        match self {
            EvidenceFailure::NoReliableSources => ClaimStatus::Unsure,
            EvidenceFailure::SearchFailed(_) => ClaimStatus::Error,
        }
    }

    pub fn source_label(&self) -> &'static str {
        match self {
            EvidenceFailure::NoReliableSources => NO_RELIABLE_SOURCES,
            EvidenceFailure::SearchFailed(_) => SEARCH_ENGINE_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvidenceOutcome {
    Found {
        /// `"[title]: snippet"` entries joined by `" | "`
        evidence_snippets: String,
        /// URL of the highest-ranked trusted result
        primary_source: String,
    },
    Failed(EvidenceFailure),
}

/// Evidence gathered for one claim, or the reason there is none.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceBundle {
    pub claim: Claim,
    pub outcome: EvidenceOutcome,
}

impl EvidenceBundle {
    pub fn found(
        claim: Claim,
        evidence_snippets: impl Into<String>,
        primary_source: impl Into<String>,
    ) -> Self {
        Self {
            claim,
            outcome: EvidenceOutcome::Found {
                evidence_snippets: evidence_snippets.into(),
                primary_source: primary_source.into(),
            },
        }
    }

    pub fn failed(claim: Claim, failure: EvidenceFailure) -> Self {
        Self {
            claim,
            outcome: EvidenceOutcome::Failed(failure),
        }
    }

    pub fn evidence_snippets(&self) -> Option<&str> {
        match &self.outcome {
            EvidenceOutcome::Found { evidence_snippets, .. } => Some(evidence_snippets),
            EvidenceOutcome::Failed(_) => None,
        }
    }

    pub fn primary_source(&self) -> Option<&str> {
        match &self.outcome {
            EvidenceOutcome::Found { primary_source, .. } => Some(primary_source),
            EvidenceOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&EvidenceFailure> {
        match &self.outcome {
            EvidenceOutcome::Found { .. } => None,
            EvidenceOutcome::Failed(failure) => Some(failure),
        }
    }
}
