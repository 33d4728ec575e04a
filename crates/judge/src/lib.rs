pub mod prompt;
pub mod reconcile;
pub mod schema;

pub use prompt::JudgeEntry;
pub use reconcile::{fallback_result, reconcile};
pub use schema::{ClaimResult, SourceType, Verdict, VerdictMap};

use evidence::EvidenceBundle;
use extract::{ReasoningService, strip_code_fences};
use schema::{RawVerdict, RawVerdicts};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Why a judge call produced no verdicts at all.
#[derive(Debug, thiserror::Error)]
pub enum JudgeFailure {
    #[error("reasoning service call failed: {0:#}")]
    Service(anyhow::Error),

    #[error("judge response is not a JSON list of verdicts: {0}")]
    Parse(#[from] serde_json::Error),
}

pub struct BatchJudge<R> {
    reasoner: Arc<R>,
}

impl<R: ReasoningService> BatchJudge<R> {
    pub fn new(reasoner: Arc<R>) -> Self {
        Self { reasoner }
    }

    /// Judge every claim that has evidence in one combined call.
    ///
    /// Claims whose retrieval failed are left out of the prompt. The returned
    /// map only holds indices of claims that were actually judged; on any
    /// failure it is empty.
    pub async fn judge(&self, bundles: &[EvidenceBundle]) -> VerdictMap {
        let entries = eligible_entries(bundles);
        if entries.is_empty() {
            tracing::debug!("no claims with evidence to judge");
            return VerdictMap::new();
        }

        match self.try_judge(&entries).await {
            Ok(verdicts) => {
                tracing::info!(judged = entries.len(), verdicts = verdicts.len(), "batch judged");
                verdicts
            }
            Err(e) => {
                tracing::warn!(error = %e, judged = entries.len(), "batch judge failed");
                VerdictMap::new()
            }
        }
    }

    async fn try_judge(&self, entries: &[JudgeEntry<'_>]) -> Result<VerdictMap, JudgeFailure> {
        let prompt = prompt::build_judge_prompt(entries);
        tracing::debug!(prompt_chars = prompt.len(), "judge prompt built");

        let raw = self
            .reasoner
            .generate_json(&prompt)
            .await
            .map_err(JudgeFailure::Service)?;

        let expected: BTreeSet<usize> = entries.iter().map(|e| e.claim_index).collect();
        parse_verdicts(&raw, &expected)
    }
}

/// Claims with evidence, numbered by position in the full list (1-based).
pub fn eligible_entries(bundles: &[EvidenceBundle]) -> Vec<JudgeEntry<'_>> {
    bundles
        .iter()
        .enumerate()
        .filter_map(|(position, bundle)| {
            let evidence = bundle.evidence_snippets().filter(|s| !s.trim().is_empty())?;
            Some(JudgeEntry {
                claim_index: position + 1,
                claim: &bundle.claim,
                evidence,
            })
        })
        .collect()
}

/// Parse the judge's answer, keeping only verdicts for `expected` indices.
///
/// Accepts a bare list or an object with a `results` list. Malformed items,
/// unexpected indices and duplicates (after the first) are dropped; only an
/// unparseable top level is an error.
pub fn parse_verdicts(raw: &str, expected: &BTreeSet<usize>) -> Result<VerdictMap, JudgeFailure> {
    let parsed: RawVerdicts = serde_json::from_str(strip_code_fences(raw))?;
    let mut verdicts = VerdictMap::new();

    for item in parsed.into_items() {
        let raw_verdict: RawVerdict = match serde_json::from_value(item) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed verdict");
                continue;
            }
        };

        let Some(index) = raw_verdict.index() else {
            tracing::warn!("skipping verdict without a usable claim_index");
            continue;
        };

        if !expected.contains(&index) {
            tracing::warn!(claim_index = index, "skipping verdict for unexpected claim index");
            continue;
        }

        if verdicts.contains_key(&index) {
            tracing::warn!(claim_index = index, "skipping duplicate verdict");
            continue;
        }

        verdicts.insert(index, raw_verdict.into_verdict(index));
    }

    Ok(verdicts)
}
