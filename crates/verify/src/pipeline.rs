use evidence::{EvidenceBundle, EvidenceRetriever, SearchProvider, TrustFilter};
use extract::{Claim, ClaimExtractor, ReasoningService};
use judge::{BatchJudge, ClaimResult, VerdictMap};
use std::sync::Arc;

/// Claim verification for a single request: extract, retrieve, judge, reconcile.
///
/// Holds only read-only collaborators, so one instance serves every request.
pub struct VerificationPipeline<R, S> {
    extractor: ClaimExtractor<R>,
    retriever: EvidenceRetriever<S>,
    judge: BatchJudge<R>,
}

impl<R: ReasoningService, S: SearchProvider> VerificationPipeline<R, S> {
    pub fn new(reasoner: Arc<R>, search: Arc<S>, trust: Arc<TrustFilter>) -> Self {
        Self {
            extractor: ClaimExtractor::new(reasoner.clone()),
            retriever: EvidenceRetriever::new(search, trust),
            judge: BatchJudge::new(reasoner),
        }
    }

    /// Extract claims from `text` and report retrieval results without judging.
    ///
    /// Statuses come from retrieval alone: UNSURE when evidence was found or
    /// nothing trusted turned up, ERROR when the search failed.
    pub async fn verify_simple(&self, text: &str, user_bad_domains: &[String]) -> Vec<ClaimResult> {
        let claims = self.extractor.extract(text, None).await;
        if claims.is_empty() {
            return Vec::new();
        }

        let bundles = self.gather_evidence(&claims, user_bad_domains).await;
        judge::reconcile(&bundles, &VerdictMap::new())
    }

    /// Full pipeline with context-aware extraction and a batch judge call.
    pub async fn verify_with_context(
        &self,
        claim_text: &str,
        page_context: &str,
        user_bad_domains: &[String],
    ) -> Vec<ClaimResult> {
        let claims = self.extractor.extract(claim_text, Some(page_context)).await;
        if claims.is_empty() {
            return Vec::new();
        }

        let bundles = self.gather_evidence(&claims, user_bad_domains).await;
        let verdicts = self.judge.judge(&bundles).await;
        judge::reconcile(&bundles, &verdicts)
    }

    /// Retrieve evidence for every claim concurrently; output keeps claim order.
    pub async fn gather_evidence(
        &self,
        claims: &[Claim],
        user_bad_domains: &[String],
    ) -> Vec<EvidenceBundle> {
        let retrievals = claims
            .iter()
            .map(|claim| self.retriever.retrieve(claim, user_bad_domains));

        let bundles = futures::future::join_all(retrievals).await;

        let found = bundles.iter().filter(|b| b.failure().is_none()).count();
        tracing::info!(claims = claims.len(), with_evidence = found, "evidence gathered");
        bundles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidence::mock::{MockSearch, item};
    use evidence::ClaimStatus;
    use extract::mock::MockReasoner;
    use judge::SourceType;

    const LONG_TEXT: &str = "The sky is green according to a report published by a well known agency today.";

    fn pipeline(
        reasoner: MockReasoner,
        search: MockSearch,
    ) -> (VerificationPipeline<MockReasoner, MockSearch>, Arc<MockReasoner>, Arc<MockSearch>) {
        let reasoner = Arc::new(reasoner);
        let search = Arc::new(search);
        let pipeline = VerificationPipeline::new(
            reasoner.clone(),
            search.clone(),
            Arc::new(TrustFilter::new()),
        );
        (pipeline, reasoner, search)
    }

    #[tokio::test]
    async fn test_simple_verify_reports_retrieval_without_judging() {
        let (pipeline, reasoner, _) = pipeline(
            MockReasoner::with_responses([r#"["The sky is green."]"#]),
            MockSearch::new().with_results(
                "The sky is green.",
                vec![item("Science", "https://science.org", "Scientific consensus says sky is blue.")],
            ),
        );

        let results = pipeline.verify_simple(LONG_TEXT, &[]).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].claim, "The sky is green.");
        assert_eq!(results[0].primary_source.as_deref(), Some("https://science.org"));
        assert_eq!(results[0].status, ClaimStatus::Unsure);
        assert_eq!(results[0].evidence, "[Science]: Scientific consensus says sky is blue.");
        assert_eq!(reasoner.calls(), 1);
    }

    #[tokio::test]
    async fn test_zero_claims_short_circuit() {
        let (pipeline, reasoner, search) = pipeline(MockReasoner::with_responses(["[]"]), MockSearch::new());

        assert!(pipeline.verify_with_context(LONG_TEXT, "page", &[]).await.is_empty());
        assert!(pipeline.verify_simple("too short", &[]).await.is_empty());

        assert_eq!(reasoner.calls(), 1);
        assert!(search.queries().is_empty());
    }

    #[tokio::test]
    async fn test_context_verify_joins_verdicts_by_index() {
        let (pipeline, reasoner, _) = pipeline(
            MockReasoner::with_responses([
                r#"["Claim 1", "Claim 2", "Claim 3"]"#,
                r#"{"results": [
                    {"claim_index": 3, "status": "CONTRADICTED", "confidence_score": 75, "source_type": "NEWS", "evidence": "Debunked by AP."},
                    {"claim_index": 1, "status": "SUPPORTED", "confidence_score": 95, "source_type": "GOVERNMENT", "evidence": "Government stats confirm this."}
                ]}"#,
            ]),
            MockSearch::new()
                .with_results("Claim 1", vec![item("ONS", "http://gov.uk", "Evidence found.")])
                .with_failure("Claim 2", "connection reset by peer")
                .with_results("Claim 3", vec![item("AP", "https://apnews.com/c3", "False claim.")]),
        );

        let results = pipeline
            .verify_with_context(
                "He said tax is up this year, and that spending on schools has doubled.",
                "The Prime Minister spoke today...",
                &[],
            )
            .await;

        assert_eq!(results.len(), 3);

        assert_eq!(results[0].status, ClaimStatus::Supported);
        assert_eq!(results[0].confidence_score, 95);
        assert_eq!(results[0].source_type, SourceType::Government);
        assert_eq!(results[0].evidence, "Government stats confirm this.");
        assert_eq!(results[0].source_url, "http://gov.uk");

        assert_eq!(results[1].status, ClaimStatus::Error);
        assert_eq!(results[1].source_url, "Search engine error");
        assert_eq!(results[1].evidence, "connection reset by peer");

        assert_eq!(results[2].status, ClaimStatus::Contradicted);
        assert_eq!(results[2].source_url, "https://apnews.com/c3");

        let judge_prompt = &reasoner.prompts()[1];
        assert!(judge_prompt.contains("CLAIM 1:"));
        assert!(!judge_prompt.contains("CLAIM 2:"));
        assert!(judge_prompt.contains("CLAIM 3:"));
    }

    #[tokio::test]
    async fn test_judge_failure_keeps_every_claim() {
        let reasoner = MockReasoner::with_responses([r#"["Alpha", "Beta"]"#]);
        reasoner.push_ok("not json at all");
        let (pipeline, _, _) = pipeline(
            reasoner,
            MockSearch::new().with_results("Alpha", vec![item("NIH", "https://nih.gov/a", "yes")]),
        );

        let results = pipeline.verify_with_context(LONG_TEXT, "context", &[]).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, ClaimStatus::Unsure);
        assert_eq!(results[0].confidence_score, 0);
        assert_eq!(results[0].source_url, "https://nih.gov/a");
        assert_eq!(results[1].status, ClaimStatus::Unsure);
        assert_eq!(results[1].source_url, "No reliable sources found");
    }

    #[tokio::test]
    async fn test_user_blocked_domains_apply_to_every_claim() {
        let (pipeline, _, _) = pipeline(
            MockReasoner::with_responses([r#"["First", "Second"]"#]),
            MockSearch::new()
                .with_results("First", vec![item("Tabloid", "https://www.tabloid.example/1", "x")])
                .with_results("Second", vec![item("Tabloid", "https://m.tabloid.example/2", "y")]),
        );

        let blocked = vec!["tabloid.example".to_string()];
        let results = pipeline.verify_simple(LONG_TEXT, &blocked).await;

        assert!(results.iter().all(|r| r.source_url == "No reliable sources found"));
    }

    #[tokio::test]
    async fn test_identical_inputs_give_identical_results() {
        let search = || {
            MockSearch::new()
                .with_results("Water is wet", vec![item("USGS", "https://usgs.gov/water", "It is.")])
        };
        let (first, _, _) = pipeline(MockReasoner::with_responses([r#"["Water is wet"]"#]), search());
        let (second, _, _) = pipeline(MockReasoner::with_responses([r#"["Water is wet"]"#]), search());

        let a = first.verify_simple(LONG_TEXT, &[]).await;
        let b = second.verify_simple(LONG_TEXT, &[]).await;

        assert_eq!(a, b);
    }
}
