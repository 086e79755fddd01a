//! Text normalization and token similarity

use std::collections::HashSet;

/// Lowercase, drop punctuation, collapse whitespace
///
/// # Examples
///
/// ```
/// use verity_consensus::text::normalize;
///
/// assert_eq!(normalize("  Yes!  It's   TRUE. "), "yes its true");
/// ```
pub fn normalize(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Word tokens of the normalized text
pub fn token_set(text: &str) -> HashSet<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity of the token sets of two texts
///
/// Returns 0.0 when both texts have no tokens.
pub fn similarity(a: &str, b: &str) -> f64 {
    jaccard(&token_set(a), &token_set(b))
}

/// Jaccard similarity of two token sets
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize("Bitcoin: $130,000!"), "bitcoin 130000");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("a \t\n  b"), "a b");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_similarity_identical() {
        assert_eq!(similarity("The sky is blue", "the sky is BLUE."), 1.0);
    }

    #[test]
    fn test_similarity_partial() {
        // {a, b, c} vs {b, c, d}: 2 / 4
        assert_eq!(similarity("a b c", "b c d"), 0.5);
    }

    #[test]
    fn test_similarity_empty() {
        assert_eq!(similarity("", ""), 0.0);
        assert_eq!(similarity("...", "!!!"), 0.0);
        assert_eq!(similarity("word", ""), 0.0);
    }
}
