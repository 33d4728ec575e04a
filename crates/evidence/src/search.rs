//! Web search backends.
//!
//! [`DuckDuckGoSearch`] posts to the HTML-only endpoint, which needs no API
//! key and no JavaScript, and scrapes results with CSS selectors.

use anyhow::{Context, Result, anyhow};
use scraper::{Html, Selector};
use std::future::Future;
use std::time::Duration;
use url::Url;

use crate::schema::EvidenceItem;

pub const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// A search backend returning results in relevance order.
pub trait SearchProvider: Send + Sync {
    fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> impl Future<Output = Result<Vec<EvidenceItem>>> + Send;
}

#[derive(Clone)]
pub struct DuckDuckGoSearch {
    endpoint: String,
    client: reqwest::Client,
}

impl DuckDuckGoSearch {
    pub fn new(timeout: Duration, user_agent: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()))
            .build()
            .context("Failed to build search HTTP client")?;

        Ok(Self {
            endpoint: DUCKDUCKGO_HTML_URL.to_string(),
            client,
        })
    }
}

impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<EvidenceItem>> {
        tracing::trace!(query, "DuckDuckGo search");

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("q", query)])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .context("DuckDuckGo request failed")?
            .error_for_status()
            .context("DuckDuckGo HTTP error")?;

        let html = response
            .text()
            .await
            .context("DuckDuckGo response read failed")?;

        parse_results_html(&html, max_results)
    }
}

/// Parse a DuckDuckGo HTML results page, skipping ads.
///
/// A page with no result containers at all (organic, ad or the explicit
/// "no results" marker) is a rate-limit or anomaly page and is an error.
pub(crate) fn parse_results_html(html: &str, max_results: usize) -> Result<Vec<EvidenceItem>> {
    let document = Html::parse_document(html);

    let any_result_sel = selector(".result, .web-result, .no-results")?;
    if document.select(&any_result_sel).next().is_none() {
        anyhow::bail!("DuckDuckGo returned a page without results (rate limited or blocked)");
    }

    let result_sel = selector(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )?;
    let title_sel = selector(".result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let mut results = Vec::new();

    for element in document.select(&result_sel) {
        if results.len() >= max_results {
            break;
        }

        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };

        let title = title_el.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let Some(url) = title_el.value().attr("href").and_then(unwrap_redirect) else {
            continue;
        };

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        results.push(EvidenceItem { title, url, snippet });
    }

    tracing::debug!(count = results.len(), "DuckDuckGo results parsed");
    Ok(results)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {css:?}: {e:?}"))
}

/// Resolve DuckDuckGo's `//duckduckgo.com/l/?uddg=<target>` redirect links.
fn unwrap_redirect(href: &str) -> Option<String> {
    let full_href = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&full_href).ok()?;

    if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())
    } else {
        Some(full_href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<div class="result results_links results_links_deep web-result result--ad">
    <a class="result__a" href="https://ads.example.com/buy">Sponsored fact checks</a>
    <div class="result__snippet">Buy now.</div>
</div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.reuters.com%2Ffact-check%2Fmoon&amp;rut=abc123">
        Fact Check: Moon landing footage is authentic
    </a>
    <div class="result__snippet">
        Reuters found the footage was recorded during the Apollo 11 mission.
    </div>
</div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="https://en.wikipedia.org/wiki/Apollo_11">Apollo 11 - Wikipedia</a>
    <div class="result__snippet">Apollo 11 was the first crewed Moon landing.</div>
</div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="https://www.nasa.gov/apollo11">   </a>
    <div class="result__snippet">Untitled result.</div>
</div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="https://www.nasa.gov/mission/apollo-11/">Apollo 11 - NASA</a>
</div>
</body>
</html>"#;

    #[test]
    fn test_parses_results_in_page_order() {
        let results = parse_results_html(RESULTS_HTML, 10).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].url, "https://www.reuters.com/fact-check/moon");
        assert_eq!(results[0].title, "Fact Check: Moon landing footage is authentic");
        assert!(results[0].snippet.starts_with("Reuters found"));
        assert_eq!(results[1].url, "https://en.wikipedia.org/wiki/Apollo_11");
        assert_eq!(results[2].snippet, "");
    }

    #[test]
    fn test_respects_result_cap() {
        let results = parse_results_html(RESULTS_HTML, 1).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_no_results_marker_gives_empty_list() {
        let html = r#"<html><body><div class="no-results">No results.</div></body></html>"#;
        let results = parse_results_html(html, 10).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_page_without_result_markup_is_an_error() {
        let anomaly = r#"<html><body><form id="challenge-form">Please verify you are human.</form></body></html>"#;
        assert!(parse_results_html(anomaly, 10).is_err());
        assert!(parse_results_html("<html><body></body></html>", 10).is_err());
    }

    #[test]
    fn test_ads_only_page_is_not_an_error() {
        let html = r#"<html><body>
<div class="result results_links results_links_deep web-result result--ad">
    <a class="result__a" href="https://ads.example.com/buy">Sponsored</a>
</div>
</body></html>"#;
        assert!(parse_results_html(html, 10).unwrap().is_empty());
    }

    #[test]
    fn test_unwrap_redirect_variants() {
        assert_eq!(
            unwrap_redirect("//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fpage&rut=abc"),
            Some("https://example.com/page".to_string())
        );
        assert_eq!(
            unwrap_redirect("https://example.com/direct"),
            Some("https://example.com/direct".to_string())
        );
        assert_eq!(unwrap_redirect("javascript-free nonsense"), None);
    }
}
