//! Canned search provider for tests that must not reach the network.

use anyhow::Result;
use std::sync::Mutex;

use crate::schema::EvidenceItem;
use crate::search::SearchProvider;

enum Scripted {
    Results(Vec<EvidenceItem>),
    Failure(String),
}

/// Answers queries whose text starts with a registered claim.
///
/// Unregistered queries get an empty result list.
#[derive(Default)]
pub struct MockSearch {
    scripts: Vec<(String, Scripted)>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, claim: impl Into<String>, results: Vec<EvidenceItem>) -> Self {
        self.scripts.push((claim.into(), Scripted::Results(results)));
        self
    }

    pub fn with_failure(mut self, claim: impl Into<String>, message: impl Into<String>) -> Self {
        self.scripts.push((claim.into(), Scripted::Failure(message.into())));
        self
    }

    /// Every `(query, max_results)` pair received so far.
    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

pub fn item(title: &str, url: &str, snippet: &str) -> EvidenceItem {
    EvidenceItem {
        title: title.to_string(),
        url: url.to_string(),
        snippet: snippet.to_string(),
    }
}

impl SearchProvider for MockSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<EvidenceItem>> {
        self.queries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((query.to_string(), max_results));

        let script = self
            .scripts
            .iter()
            .find(|(claim, _)| query.starts_with(claim.as_str()))
            .map(|(_, script)| script);

        match script {
            Some(Scripted::Results(results)) => Ok(results.clone()),
            Some(Scripted::Failure(message)) => anyhow::bail!("{message}"),
            None => Ok(Vec::new()),
        }
    }
}
