use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::schema::Claim;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Quote pairs the model sometimes wraps a verbatim claim in.
const QUOTE_PAIRS: [(char, char); 3] = [('"', '"'), ('\'', '\''), ('\u{201C}', '\u{201D}')];

pub struct ClaimNormalizer {
    /// Lowercased forms of claims already emitted
    seen: HashSet<String>,
}

impl ClaimNormalizer {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }

    /// Clean up one raw claim string.
    ///
    /// Returns `None` for empty strings and for claims that repeat an earlier one
    /// (case-insensitive).
    pub fn normalize(&mut self, raw: &str) -> Option<Claim> {
        let mut text = raw.trim();

        for (open, close) in QUOTE_PAIRS {
            if let Some(inner) = text
                .strip_prefix(open)
                .and_then(|rest| rest.strip_suffix(close))
            {
                text = inner.trim();
                break;
            }
        }

        let cleaned = WHITESPACE.replace_all(text, " ").to_string();
        if cleaned.is_empty() {
            return None;
        }

        if !self.seen.insert(cleaned.to_lowercase()) {
            return None;
        }

        Some(Claim::new(cleaned))
    }
}

impl Default for ClaimNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
