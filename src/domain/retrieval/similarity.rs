//! Normalized edit-distance similarity

/// Score returned when one string contains the other
pub const CONTAINMENT_SCORE: f64 = 0.9;

/// Similarity of two strings in `[0, 1]`.
///
/// Case-insensitive. Identical strings score 1.0 and substring containment
/// scores a flat [`CONTAINMENT_SCORE`] regardless of the length difference.
/// Everything else is `(len(longer) - distance) / len(longer)`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a == b {
        return 1.0;
    }

    if a.contains(&b) || b.contains(&a) {
        return CONTAINMENT_SCORE;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (longer, shorter) = if a.len() > b.len() { (a, b) } else { (b, a) };

    if longer.is_empty() {
        return 1.0;
    }

    let distance = edit_distance(&longer, &shorter);
    let len = longer.len() as f64;

    ((len - distance as f64) / len).max(0.0)
}

/// Levenshtein distance; insertion, deletion and substitution cost 1
pub fn edit_distance(a: &[char], b: &[char]) -> usize {
    let m = a.len();
    let n = b.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance(&chars("kitten"), &chars("sitting")), 3);
        assert_eq!(edit_distance(&chars("hello"), &chars("hello")), 0);
        assert_eq!(edit_distance(&chars("hello"), &chars("helo")), 1);
        assert_eq!(edit_distance(&chars(""), &chars("abc")), 3);
        assert_eq!(edit_distance(&chars("abc"), &chars("")), 3);
    }

    #[test]
    fn test_reflexive() {
        for s in ["", "a", "Refund policy", "ÄÖÜ straße"] {
            assert_eq!(similarity(s, s), 1.0);
        }
    }

    #[test]
    fn test_case_insensitive_equality() {
        assert_eq!(similarity("Refunds", "REFUNDS"), 1.0);
    }

    #[test]
    fn test_substring_bonus() {
        assert_eq!(similarity("cat", "cats"), 0.9);
        assert_eq!(similarity("cats", "cat"), 0.9);
        assert_eq!(similarity("refund", "We REFUND within 30 days"), 0.9);
    }

    #[test]
    fn test_empty_string_is_contained_everywhere() {
        assert_eq!(similarity("", "abc"), 0.9);
        assert_eq!(similarity("abc", ""), 0.9);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_classic_edit_distance_example() {
        let score = similarity("kitten", "sitting");
        assert!((score - 4.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            ("kitten", "sitting"),
            ("refund policy", "Refunds"),
            ("shipping", "Orders ship within 2 business days."),
            ("abc", "xyz"),
        ];

        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a), "{a} / {b}");
        }
    }

    #[test]
    fn test_completely_different_scores_zero() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_score_in_unit_range() {
        let pairs = [("a", "bcdefgh"), ("password reset", "Account"), ("x", "y")];

        for (a, b) in pairs {
            let score = similarity(a, b);
            assert!((0.0..=1.0).contains(&score), "{a} / {b} -> {score}");
        }
    }
}
