//! URL canonicalization for source identity

use crate::config::RankingConfig;
use url::Url;

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '\'', '"'];

/// A canonical URL and its display domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    /// Canonical form, used as the source identity key
    pub url: String,
    /// Host without a leading `www.`
    pub domain: String,
    /// Non-empty path segments
    pub segments: Vec<String>,
}

/// Canonicalize a source URL
///
/// Returns `None` for unparseable and non-http(s) URLs.
///
/// # Examples
///
/// ```
/// use verity_sources::normalize::normalize_url;
/// use verity_sources::RankingConfig;
///
/// let config = RankingConfig::default();
/// let a = normalize_url("https://www.example.com/news/story/?utm_source=x#top", &config).unwrap();
/// let b = normalize_url("https://www.example.com/news/story", &config).unwrap();
/// assert_eq!(a.url, b.url);
/// assert_eq!(a.domain, "example.com");
/// ```
pub fn normalize_url(raw: &str, config: &RankingConfig) -> Option<NormalizedUrl> {
    let trimmed = raw.trim().trim_end_matches(TRAILING_PUNCTUATION);
    let mut url = Url::parse(trimmed).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    url.set_fragment(None);

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| !config.is_tracking_param(name))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    let path = url.path().to_string();
    if path != "/" && path.ends_with('/') {
        url.set_path(path.trim_end_matches('/'));
    }

    let host = url.host_str()?.to_string();
    let domain = host.strip_prefix("www.").unwrap_or(&host).to_string();
    let segments = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).map(str::to_string).collect())
        .unwrap_or_default();

    Some(NormalizedUrl {
        url: url.to_string(),
        domain,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(raw: &str) -> Option<String> {
        normalize_url(raw, &RankingConfig::default()).map(|n| n.url)
    }

    #[test]
    fn test_strips_tracking_params_and_fragment() {
        assert_eq!(
            norm("https://news.example.com/a?id=7&utm_source=tw&fbclid=abc#comments"),
            Some("https://news.example.com/a?id=7".to_string())
        );
    }

    #[test]
    fn test_strips_trailing_punctuation() {
        assert_eq!(
            norm("https://example.com/story)."),
            Some("https://example.com/story".to_string())
        );
    }

    #[test]
    fn test_trailing_slash() {
        assert_eq!(norm("https://example.com/a/b/"), Some("https://example.com/a/b".to_string()));
        assert_eq!(norm("https://example.com/"), Some("https://example.com/".to_string()));
        assert_eq!(norm("https://example.com"), Some("https://example.com/".to_string()));
    }

    #[test]
    fn test_rejects_non_http() {
        assert_eq!(norm("ftp://example.com/file"), None);
        assert_eq!(norm("mailto:someone@example.com"), None);
        assert_eq!(norm("not a url"), None);
    }

    #[test]
    fn test_domain_and_segments() {
        let n = normalize_url("https://WWW.Reuters.com/world/2024/05/01/some-story/", &RankingConfig::default()).unwrap();
        assert_eq!(n.domain, "reuters.com");
        assert_eq!(n.segments, vec!["world", "2024", "05", "01", "some-story"]);
    }
}
