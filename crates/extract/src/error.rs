/// Why claim extraction produced nothing.
///
/// Never surfaced to callers: [`crate::ClaimExtractor::extract`] logs it and
/// degrades to an empty claim list.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionFailure {
    #[error("reasoning service call failed: {0:#}")]
    Service(anyhow::Error),

    #[error("extraction response is not a JSON list of claims: {0}")]
    Parse(#[from] serde_json::Error),
}
