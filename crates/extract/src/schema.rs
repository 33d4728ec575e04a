use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters of claim text kept when a claim is written to the logs.
const PREVIEW_CHARS: usize = 50;

/// A standalone factual assertion extracted from the input text.
///
/// Claims are immutable once produced; their position in the extracted
/// list is the 1-based index used to join verdicts back later.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claim(String);

impl Claim {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    /// Short form for log lines
    pub fn preview(&self) -> String {
        self.0.chars().take(PREVIEW_CHARS).collect()
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shapes the reasoning service is known to answer an extraction prompt with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawClaims {
    List(Vec<serde_json::Value>),
    Wrapped { claims: Vec<serde_json::Value> },
}

impl RawClaims {
    pub(crate) fn into_items(self) -> Vec<serde_json::Value> {
        match self {
            RawClaims::List(items) | RawClaims::Wrapped { claims: items } => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_serializes_as_plain_string() {
        let claim = Claim::new("Water boils at 100C at sea level.");
        let json = serde_json::to_string(&claim).unwrap();
        assert_eq!(json, "\"Water boils at 100C at sea level.\"");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let claim = Claim::new("é".repeat(80));
        assert_eq!(claim.preview().chars().count(), 50);
    }

    #[test]
    fn test_raw_claims_accepts_wrapped_object() {
        let raw: RawClaims = serde_json::from_str(r#"{"claims": ["a", "b"]}"#).unwrap();
        assert_eq!(raw.into_items().len(), 2);
    }
}
