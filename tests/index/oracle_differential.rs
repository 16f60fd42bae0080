//! Differential tests against a brute-force oracle.
//!
//! The oracle tries every substring of the text with `strsim::levenshtein`.
//! Slow, but obviously correct.

use chronicle::fuzzy::{substring_match, within_distance};
use proptest::prelude::*;

/// Smallest edit distance between `pattern` and any substring of `text`.
fn oracle_substring_distance(pattern: &str, text: &str) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut best = pattern.chars().count();
    for start in 0..=chars.len() {
        for end in start..=chars.len() {
            let candidate: String = chars[start..end].iter().collect();
            best = best.min(strsim::levenshtein(pattern, &candidate));
        }
    }
    best
}

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_within_distance_matches_oracle(
        pattern in "[abc]{1,6}",
        text in "[abcd]{0,12}",
        max in 0usize..4,
    ) {
        let expected = oracle_substring_distance(&pattern, &text);
        let actual = within_distance(&chars(&pattern), &chars(&text), max);
        if expected <= max {
            prop_assert_eq!(actual, Some(expected));
        } else {
            prop_assert_eq!(actual, None);
        }
    }

    #[test]
    fn prop_substring_match_agrees_with_bounded_check(
        pattern in "[abc]{1,6}",
        text in "[abcd]{0,12}",
        max in 0usize..4,
    ) {
        let p = chars(&pattern);
        let t = chars(&text);
        let found = substring_match(&p, &t, max);
        prop_assert_eq!(found.as_ref().map(|m| m.distance), within_distance(&p, &t, max));

        if let Some(m) = found {
            prop_assert!(m.start <= m.end && m.end <= t.len());
            prop_assert!(m.longest_run <= p.len());
            prop_assert!(m.longest_run <= m.end - m.start);
            // The reported span really is that close to the pattern
            let span: String = t[m.start..m.end].iter().collect();
            prop_assert_eq!(strsim::levenshtein(&pattern, &span), m.distance);
            if m.distance == 0 {
                prop_assert_eq!(m.longest_run, p.len());
            }
        }
    }
}

#[test]
fn test_oracle_sanity() {
    assert_eq!(oracle_substring_distance("meiji", "the meiji era"), 0);
    assert_eq!(oracle_substring_distance("meiji", "the meijl era"), 1);
    assert_eq!(oracle_substring_distance("abc", ""), 3);
}
