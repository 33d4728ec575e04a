//! Domain trust filter for evidence sources.
//!
//! A URL is untrusted when its host (minus a leading `www.`) equals, or is a
//! subdomain of, a blocked domain. Matching is on label boundaries, so
//! blocking `wikipedia.org` does not block `notwikipedia.org`.

use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

/// Low-reliability or user-generated sources never used as evidence.
pub const DEFAULT_BLOCKED_DOMAINS: &[&str] = &[
    "wikipedia.org",
    "reddit.com",
    "pinterest.com",
    "twitter.com",
    "x.com",
    "facebook.com",
    "instagram.com",
    "tiktok.com",
    "youtube.com",
    "quora.com",
    "theonion.com",
    "linkedin.com",
];

static DEFAULT_FILTER: LazyLock<TrustFilter> = LazyLock::new(TrustFilter::new);

/// Check `url` against the built-in blocklist plus `extra_blocked_domains`.
pub fn is_trusted(url: &str, extra_blocked_domains: &[String]) -> bool {
    DEFAULT_FILTER.is_trusted(url, extra_blocked_domains)
}

/// Immutable set of blocked domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustFilter {
    blocked: BTreeSet<String>,
}

impl TrustFilter {
    /// Filter with only the built-in blocklist.
    pub fn new() -> Self {
        Self {
            blocked: DEFAULT_BLOCKED_DOMAINS.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Built-in blocklist plus `extra`. Only used at startup.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new().extended(extra)
    }

    /// Copy of this filter that also blocks `extra`.
    pub fn extended<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut blocked = self.blocked.clone();
        blocked.extend(extra.into_iter().filter_map(|d| normalize_domain(d.as_ref())));
        Self { blocked }
    }

    pub fn blocked_domains(&self) -> impl Iterator<Item = &str> {
        self.blocked.iter().map(String::as_str)
    }

    /// Returns `false` for unparseable URLs and URLs without a host.
    pub fn is_trusted(&self, url: &str, extra_blocked_domains: &[String]) -> bool {
        let Some(host) = host_of(url) else {
            return false;
        };

        let blocked_by_extra = extra_blocked_domains
            .iter()
            .filter_map(|d| normalize_domain(d))
            .any(|bad| is_same_or_subdomain(&host, &bad));

        !blocked_by_extra && !self.blocked.iter().any(|bad| is_same_or_subdomain(&host, bad))
    }
}

impl Default for TrustFilter {
    fn default() -> Self {
        Self::new()
    }
}

fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.trim_end_matches('.');
    let host = host.strip_prefix("www.").unwrap_or(host);
    if host.is_empty() {
        return None;
    }
    Some(host.to_string())
}

fn is_same_or_subdomain(host: &str, blocked: &str) -> bool {
    match host.strip_suffix(blocked) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('.'),
        None => false,
    }
}

/// Reduce a user-entered blocklist entry to a bare domain.
///
/// Tolerates schemes, paths, ports, `www.` and `*.` prefixes. Blank entries
/// give `None`.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let mut domain = raw.trim().to_ascii_lowercase();

    if let Some(pos) = domain.find("://") {
        domain.drain(..pos + 3);
    }
    if let Some(pos) = domain.find(['/', '?', '#']) {
        domain.truncate(pos);
    }
    if let Some(pos) = domain.rfind(':') {
        domain.truncate(pos);
    }

    let domain = domain.trim_start_matches("*.");
    let domain = domain.strip_prefix("www.").unwrap_or(domain);
    let domain = domain.trim_matches('.');

    (!domain.is_empty()).then(|| domain.to_string())
}
