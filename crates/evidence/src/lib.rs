pub mod schema;
pub mod search;
pub mod trust;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use schema::{
    ClaimStatus, EvidenceBundle, EvidenceFailure, EvidenceItem, EvidenceOutcome,
    NO_RELIABLE_SOURCES, SEARCH_ENGINE_ERROR,
};
pub use search::{DuckDuckGoSearch, SearchProvider};
pub use trust::{TrustFilter, is_trusted};

use extract::Claim;
use std::sync::Arc;

/// Raw results requested from the search provider per claim.
pub const RAW_RESULT_LIMIT: usize = 10;

/// Trusted results kept as evidence per claim.
pub const EVIDENCE_LIMIT: usize = 3;

/// Appended to each claim to bias results toward verification sources.
pub const QUERY_SUFFIX: &str = "fact check";

pub const SNIPPET_SEPARATOR: &str = " | ";

pub fn build_query(claim: &Claim) -> String {
    format!("{} {}", claim.text(), QUERY_SUFFIX)
}

pub struct EvidenceRetriever<S> {
    provider: Arc<S>,
    filter: Arc<TrustFilter>,
}

impl<S: SearchProvider> EvidenceRetriever<S> {
    pub fn new(provider: Arc<S>, filter: Arc<TrustFilter>) -> Self {
        Self { provider, filter }
    }

    /// Search for evidence on one claim and keep the top trusted results.
    ///
    /// Never fails: a provider error becomes [`EvidenceFailure::SearchFailed`]
    /// and an empty filtered set becomes [`EvidenceFailure::NoReliableSources`].
    pub async fn retrieve(&self, claim: &Claim, extra_blocked_domains: &[String]) -> EvidenceBundle {
        tracing::debug!(claim = %claim.preview(), "searching for evidence");

        let raw_results = match self.provider.search(&build_query(claim), RAW_RESULT_LIMIT).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(claim = %claim.preview(), error = %e, "search failed");
                return EvidenceBundle::failed(
                    claim.clone(),
                    EvidenceFailure::SearchFailed(format!("{e:#}")),
                );
            }
        };

        let raw_count = raw_results.len();
        let filter = self.filter.extended(extra_blocked_domains);
        let trusted: Vec<EvidenceItem> = raw_results
            .into_iter()
            .take(RAW_RESULT_LIMIT)
            .filter(|item| filter.is_trusted(&item.url, &[]))
            .take(EVIDENCE_LIMIT)
            .collect();

        tracing::debug!(raw = raw_count, trusted = trusted.len(), "search results filtered");

        let Some(top) = trusted.first() else {
            return EvidenceBundle::failed(claim.clone(), EvidenceFailure::NoReliableSources);
        };
        let primary_source = top.url.clone();

        let evidence_snippets = trusted
            .iter()
            .map(|item| format!("[{}]: {}", item.title, item.snippet))
            .collect::<Vec<_>>()
            .join(SNIPPET_SEPARATOR);

        EvidenceBundle::found(claim.clone(), evidence_snippets, primary_source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockSearch, item};

    fn retriever(search: MockSearch) -> (EvidenceRetriever<MockSearch>, Arc<MockSearch>) {
        let search = Arc::new(search);
        (
            EvidenceRetriever::new(search.clone(), Arc::new(TrustFilter::new())),
            search,
        )
    }

    #[tokio::test]
    async fn test_search_logic_filtering() {
        let (retriever, _) = retriever(MockSearch::new().with_results(
            "Some claim",
            vec![
                item("Wiki", "https://wikipedia.org/wiki/Fact", "..."),
                item("Reuters", "https://www.reuters.com/article", "..."),
            ],
        ));

        let bundle = retriever.retrieve(&Claim::new("Some claim"), &[]).await;

        let snippets = bundle.evidence_snippets().unwrap();
        assert!(!snippets.contains("Wikipedia"));
        assert!(!snippets.contains("Wiki"));
        assert!(snippets.contains("Reuters"));
        assert_eq!(bundle.primary_source(), Some("https://www.reuters.com/article"));
    }

    #[tokio::test]
    async fn test_search_no_results() {
        let (retriever, _) = retriever(MockSearch::new());

        let bundle = retriever.retrieve(&Claim::new("Unicorns exist"), &[]).await;

        let failure = bundle.failure().unwrap();
        assert_eq!(failure, &EvidenceFailure::NoReliableSources);
        assert_eq!(failure.status(), ClaimStatus::Unsure);
        assert_eq!(failure.source_label(), "No reliable sources found");
    }

    #[tokio::test]
    async fn test_everything_filtered_is_no_reliable_sources() {
        let (retriever, _) = retriever(MockSearch::new().with_results(
            "Cats can fly",
            vec![
                item("r/cats", "https://reddit.com/r/cats", "they fly"),
                item("Trusted blog", "https://catfacts.example/fly", "they do not"),
            ],
        ));

        let extra = vec!["catfacts.example".to_string()];
        let bundle = retriever.retrieve(&Claim::new("Cats can fly"), &extra).await;

        assert_eq!(bundle.failure(), Some(&EvidenceFailure::NoReliableSources));
    }

    #[tokio::test]
    async fn test_provider_error_is_recorded() {
        let (retriever, _) = retriever(MockSearch::new().with_failure("Claim", "rate limited"));

        let bundle = retriever.retrieve(&Claim::new("Claim"), &[]).await;

        let failure = bundle.failure().unwrap();
        assert_eq!(failure.status(), ClaimStatus::Error);
        assert_eq!(failure.source_label(), SEARCH_ENGINE_ERROR);
        assert_eq!(failure.to_string(), "rate limited");
    }

    #[tokio::test]
    async fn test_keeps_top_three_in_provider_order() {
        let results = (1..=6)
            .map(|n| item(&format!("Source {n}"), &format!("https://news{n}.example/a"), &format!("snippet {n}")))
            .collect();
        let (retriever, search) = retriever(MockSearch::new().with_results("Rates rose", results));

        let bundle = retriever.retrieve(&Claim::new("Rates rose"), &[]).await;

        assert_eq!(
            bundle.evidence_snippets(),
            Some("[Source 1]: snippet 1 | [Source 2]: snippet 2 | [Source 3]: snippet 3")
        );
        assert_eq!(bundle.primary_source(), Some("https://news1.example/a"));
        assert_eq!(
            search.queries(),
            vec![("Rates rose fact check".to_string(), RAW_RESULT_LIMIT)]
        );
    }

    #[tokio::test]
    async fn test_only_first_ten_raw_results_are_considered() {
        let mut results: Vec<EvidenceItem> = (0..10)
            .map(|n| item("Reddit", &format!("https://reddit.com/{n}"), "..."))
            .collect();
        results.push(item("AP", "https://apnews.com/late", "..."));
        let (retriever, _) = retriever(MockSearch::new().with_results("Late", results));

        let bundle = retriever.retrieve(&Claim::new("Late"), &[]).await;

        assert_eq!(bundle.failure(), Some(&EvidenceFailure::NoReliableSources));
    }
}
