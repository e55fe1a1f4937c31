//! Text utilities for comparing drafts.
//!
//! Similarity here is lexical: lowercase keyword sets compared with Jaccard
//! overlap or one-sided containment. No I/O, no model calls.

use std::collections::BTreeSet;

/// Words too common to carry meaning when comparing drafts.
const STOP_WORDS: &[&str] = &[
    "about", "also", "been", "could", "each", "from", "have", "into", "more", "most", "only",
    "over", "should", "some", "such", "than", "that", "their", "them", "then", "there", "these",
    "they", "this", "what", "when", "where", "which", "while", "will", "with", "would", "your",
];

/// Minimum word length (in chars) considered a keyword.
const MIN_KEYWORD_LEN: usize = 4;

/// Extract the keyword set of a text.
///
/// Lowercases, splits on anything that is not alphanumeric, and drops short
/// words and stop words.
pub fn keywords(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= MIN_KEYWORD_LEN)
        .map(|w| w.to_lowercase())
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

/// Jaccard similarity of two keyword sets, in `[0.0, 1.0]`.
///
/// Two empty sets are considered identical.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Fraction of `part`'s keywords that also appear in `whole`.
pub fn containment(part: &BTreeSet<String>, whole: &BTreeSet<String>) -> f64 {
    if part.is_empty() {
        return 1.0;
    }
    part.intersection(whole).count() as f64 / part.len() as f64
}

/// Normalize a line for equality checks: lowercase, alphanumerics only,
/// single spaces.
pub fn normalize(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_drop_short_and_stop_words() {
        let kw = keywords("Use a Bloom filter with the cache, which avoids misses.");
        assert!(kw.contains("bloom"));
        assert!(kw.contains("filter"));
        assert!(kw.contains("cache"));
        assert!(kw.contains("avoids"));
        assert!(!kw.contains("with"));
        assert!(!kw.contains("which"));
        assert!(!kw.contains("use"));
    }

    #[test]
    fn test_jaccard_identical_and_disjoint() {
        let a = keywords("redis cluster eviction policy");
        let b = keywords("redis cluster eviction policy");
        let c = keywords("grpc streaming protobuf schema");
        assert_eq!(jaccard(&a, &b), 1.0);
        assert_eq!(jaccard(&a, &c), 0.0);
        assert_eq!(jaccard(&BTreeSet::new(), &BTreeSet::new()), 1.0);
    }

    #[test]
    fn test_containment_is_one_sided() {
        let part = keywords("bloom filter");
        let whole = keywords("a bloom filter in front of redis");
        assert_eq!(containment(&part, &whole), 1.0);
        assert!(containment(&whole, &part) < 1.0);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Use   REST, not gRPC! "), "use rest not grpc");
    }
}
