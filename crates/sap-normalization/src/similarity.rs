//! Similarity scores in `[0, 1]`.
//!
//! Character similarity is the normalized Indel similarity (the classic
//! "ratio"). Token-set similarity compares the shared and differing word sets
//! so word order and repeated words do not matter.

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;

use crate::text::normalize_text;

/// Highest score a pair of different normalized strings can reach.
pub const MAX_INEXACT_SCORE: f64 = 0.99;

/// Character similarity between two strings as given.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    indel::normalized_similarity(a.chars(), b.chars())
}

/// Order-insensitive similarity over whitespace-separated tokens.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let only_a: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let only_b: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !intersection.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 1.0;
    }

    let sect = intersection.join(" ");
    let sect_a = join_tokens(&sect, &only_a);
    let sect_b = join_tokens(&sect, &only_b);

    let mut best = ratio(&sect_a, &sect_b);
    if !sect.is_empty() {
        best = best.max(ratio(&sect, &sect_a)).max(ratio(&sect, &sect_b));
    }
    best
}

fn join_tokens(prefix: &str, rest: &[&str]) -> String {
    let rest = rest.join(" ");
    match (prefix.is_empty(), rest.is_empty()) {
        (true, _) => rest,
        (_, true) => prefix.to_string(),
        _ => format!("{prefix} {rest}"),
    }
}

/// Fuzzy score between two free-text names.
///
/// Returns 1.0 only when both normalize to the same non-empty string; any
/// other pair scores at most [`MAX_INEXACT_SCORE`].
pub fn fuzzy_score(a: &str, b: &str) -> f64 {
    let norm_a = normalize_text(a);
    let norm_b = normalize_text(b);
    if norm_a.is_empty() || norm_b.is_empty() {
        return 0.0;
    }
    if norm_a == norm_b {
        return 1.0;
    }
    token_set_ratio(&norm_a, &norm_b).clamp(0.0, MAX_INEXACT_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_names_score_one() {
        assert_eq!(fuzzy_score("Colecistectomia", "COLECISTECTOMIA"), 1.0);
        assert_eq!(fuzzy_score("Hérnia inguinal", "hernia   inguinal"), 1.0);
    }

    #[test]
    fn word_order_is_ignored_but_capped() {
        let score = fuzzy_score("hernia inguinal", "inguinal hernia");
        assert_eq!(score, MAX_INEXACT_SCORE);
    }

    #[test]
    fn subset_of_tokens_is_capped() {
        let score = fuzzy_score("artroplastia total joelho", "artroplastia joelho");
        assert_eq!(score, MAX_INEXACT_SCORE);
    }

    #[test]
    fn empty_side_scores_zero() {
        assert_eq!(fuzzy_score("", "abc"), 0.0);
        assert_eq!(fuzzy_score("!!", "abc"), 0.0);
        assert_eq!(token_set_ratio("", ""), 0.0);
    }

    #[test]
    fn unrelated_names_score_low() {
        assert!(fuzzy_score("mastectomia", "craniotomia descompressiva") < 0.7);
    }

    #[test]
    fn ratio_tolerates_typos() {
        assert!(ratio("kefazol", "kefasol") >= 0.84);
        assert_eq!(ratio("abc", "abc"), 1.0);
    }
}
