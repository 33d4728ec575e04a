use evidence::{ClaimStatus, EvidenceBundle, EvidenceOutcome};

use crate::schema::{ClaimResult, SourceType, Verdict, VerdictMap};

/// Join verdicts back onto the claim list by 1-based index.
///
/// Always returns one result per bundle, in bundle order. Claims without a
/// usable verdict keep what retrieval determined, with zero confidence.
pub fn reconcile(bundles: &[EvidenceBundle], verdicts: &VerdictMap) -> Vec<ClaimResult> {
    for index in verdicts.keys() {
        if *index == 0 || *index > bundles.len() {
            tracing::warn!(claim_index = index, claims = bundles.len(), "verdict index out of range");
        }
    }

    bundles
        .iter()
        .enumerate()
        .map(|(position, bundle)| {
            let claim_index = position + 1;
            match (verdicts.get(&claim_index), &bundle.outcome) {
                (Some(verdict), EvidenceOutcome::Found { primary_source, .. }) => {
                    judged_result(bundle, verdict, primary_source)
                }
                (Some(_), EvidenceOutcome::Failed(_)) => {
                    tracing::warn!(claim_index, "ignoring verdict for claim without evidence");
                    fallback_result(bundle)
                }
                (None, EvidenceOutcome::Found { .. }) if !verdicts.is_empty() => {
                    tracing::warn!(claim_index, "judge omitted claim");
                    fallback_result(bundle)
                }
                (None, _) => fallback_result(bundle),
            }
        })
        .collect()
}

fn judged_result(bundle: &EvidenceBundle, verdict: &Verdict, primary_source: &str) -> ClaimResult {
    ClaimResult {
        claim: bundle.claim.text().to_string(),
        status: verdict.status,
        confidence_score: verdict.confidence_score,
        source_type: verdict.source_type,
        source_url: primary_source.to_string(),
        evidence: verdict.evidence_summary.clone(),
        primary_source: Some(primary_source.to_string()),
    }
}

/// Result for a claim that was not judged, built from retrieval output alone.
pub fn fallback_result(bundle: &EvidenceBundle) -> ClaimResult {
    let claim = bundle.claim.text().to_string();
    match &bundle.outcome {
        EvidenceOutcome::Found {
            evidence_snippets,
            primary_source,
        } => ClaimResult {
            claim,
            status: ClaimStatus::Unsure,
            confidence_score: 0,
            source_type: SourceType::Unknown,
            source_url: primary_source.clone(),
            evidence: evidence_snippets.clone(),
            primary_source: Some(primary_source.clone()),
        },
        EvidenceOutcome::Failed(failure) => ClaimResult {
            claim,
            status: failure.status(),
            confidence_score: 0,
            source_type: SourceType::Unknown,
            source_url: failure.source_label().to_string(),
            evidence: failure.to_string(),
            primary_source: None,
        },
    }
}
