pub mod error;
pub mod llm;
pub mod normalizer;
pub mod prompt;
pub mod schema;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::ExtractionFailure;
pub use llm::{GeminiClient, ReasoningService, strip_code_fences};
pub use normalizer::ClaimNormalizer;
pub use schema::Claim;

use std::sync::Arc;

use schema::RawClaims;

/// Texts shorter than this (in characters) are not sent for extraction.
pub const MIN_TEXT_CHARS: usize = 50;

/// Upper bound on claims returned for one request.
pub const MAX_CLAIMS: usize = 5;

pub struct ClaimExtractor<R> {
    reasoner: Arc<R>,
}

impl<R: ReasoningService> ClaimExtractor<R> {
    pub fn new(reasoner: Arc<R>) -> Self {
        Self { reasoner }
    }

    /// Extract up to [`MAX_CLAIMS`] standalone claims from `text`.
    ///
    /// When `page_context` is given and non-blank, the reasoning service uses it
    /// to resolve pronouns, but claims still come from `text` alone. Any failure
    /// yields an empty list.
    pub async fn extract(&self, text: &str, page_context: Option<&str>) -> Vec<Claim> {
        let text_chars = text.chars().count();
        if text_chars < MIN_TEXT_CHARS {
            tracing::debug!(text_chars, "text too short for claim extraction");
            return Vec::new();
        }

        match self.try_extract(text, page_context).await {
            Ok(claims) => {
                tracing::info!(claims = claims.len(), text_chars, "claims extracted");
                claims
            }
            Err(e) => {
                tracing::warn!(error = %e, "claim extraction failed");
                Vec::new()
            }
        }
    }

    async fn try_extract(
        &self,
        text: &str,
        page_context: Option<&str>,
    ) -> Result<Vec<Claim>, ExtractionFailure> {
        let prompt = match page_context {
            Some(context) if !context.trim().is_empty() => {
                prompt::build_context_extraction_prompt(text, context)
            }
            _ => prompt::build_extraction_prompt(text),
        };

        let raw = self
            .reasoner
            .generate_json(&prompt)
            .await
            .map_err(ExtractionFailure::Service)?;

        parse_claims(&raw)
    }
}

/// Parse the reasoning service's answer into at most [`MAX_CLAIMS`] claims.
///
/// Accepts a bare JSON list or an object with a `claims` list. Entries that
/// are not strings are skipped.
pub fn parse_claims(raw: &str) -> Result<Vec<Claim>, ExtractionFailure> {
    let parsed: RawClaims = serde_json::from_str(strip_code_fences(raw))?;
    let mut normalizer = ClaimNormalizer::new();

    Ok(parsed
        .into_items()
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(text) => normalizer.normalize(&text),
            _ => None,
        })
        .take(MAX_CLAIMS)
        .collect())
}
