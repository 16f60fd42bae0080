//! Property-based tests for the fuzzy index and normalization.

use chronicle::testing::make_fragment;
use chronicle::session::clip_context;
use chronicle::util::{normalize, normalize_with_origins};
use chronicle::{Fragment, FragmentKind, FuzzyIndex, SearchOptions};
use proptest::prelude::*;
use std::collections::HashSet;

// =============================================================================
// STRATEGIES
// =============================================================================

/// Caption-ish text over a small alphabet so queries actually hit.
fn caption() -> impl Strategy<Value = String> {
    "[a-fA-F0-9 .,!-]{0,30}"
}

/// Mixed-script text whose NFKC and case mappings are stable.
fn mixed_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.!?'()\\-ＡＢＣａｂｃ１２３éÉüÜ明治維新江戸]{0,40}"
}

fn corpus() -> impl Strategy<Value = Vec<Fragment>> {
    prop::collection::vec((caption(), any::<bool>()), 0..25).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (text, is_line))| {
                let kind = if is_line {
                    FragmentKind::Line
                } else {
                    FragmentKind::Word
                };
                make_fragment(&format!("f{}", i), &text, kind)
            })
            .collect()
    })
}

// =============================================================================
// INDEX PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Any corpus and any query: no panic, at most `limit` ids, all distinct,
    /// all from the corpus.
    #[test]
    fn prop_search_is_bounded_and_well_formed(
        fragments in corpus(),
        query in "\\PC{0,12}",
        limit in 0usize..30,
    ) {
        let index = FuzzyIndex::build(&fragments, SearchOptions::default());
        let ids = index.search(&query, limit);

        prop_assert!(ids.len() <= limit);
        let unique: HashSet<&String> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());
        let known: HashSet<&str> = fragments.iter().map(|f| f.id.as_str()).collect();
        for id in &ids {
            prop_assert!(known.contains(id.as_str()));
        }
    }

    /// Queries that normalize to nothing never match anything.
    #[test]
    fn prop_blank_query_matches_nothing(
        fragments in corpus(),
        query in "[ .,!?\\-]{0,10}",
    ) {
        let index = FuzzyIndex::build(&fragments, SearchOptions::default());
        prop_assert!(index.search(&query, 100).is_empty());
    }

    /// Hits come out score-ascending, ties in corpus order.
    #[test]
    fn prop_hits_are_ranked(fragments in corpus(), query in "[a-f0-9]{2,6}") {
        let index = FuzzyIndex::build(&fragments, SearchOptions::default());
        let hits = index.search_hits(&query, usize::MAX);
        for pair in hits.windows(2) {
            prop_assert!(
                pair[0].score < pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].index < pair[1].index)
            );
        }
    }

    /// A smaller limit returns a prefix of the larger one.
    #[test]
    fn prop_limit_is_a_prefix(
        fragments in corpus(),
        query in "[a-f0-9]{2,6}",
        limit in 0usize..10,
    ) {
        let index = FuzzyIndex::build(&fragments, SearchOptions::default());
        let all = index.search(&query, usize::MAX);
        let some = index.search(&query, limit);
        prop_assert_eq!(&all[..some.len()], &some[..]);
        prop_assert_eq!(some.len(), limit.min(all.len()));
    }

    /// A fragment whose norm contains the query verbatim is always found.
    #[test]
    fn prop_verbatim_substring_is_found(
        fragments in corpus(),
        prefix in "[a-f]{0,5}",
        needle in "[a-f]{2,6}",
        suffix in "[a-f]{0,5}",
    ) {
        let mut fragments = fragments;
        let text = format!("{} {}{} x", prefix, needle, suffix);
        fragments.push(make_fragment("target", &text, FragmentKind::Line));
        let index = FuzzyIndex::build(&fragments, SearchOptions::default());
        let ids = index.search(&needle, usize::MAX);
        prop_assert!(ids.iter().any(|id| id == "target"));
    }

    /// Raw and pre-normalized queries give the same answer.
    #[test]
    fn prop_query_normalization_is_transparent(fragments in corpus(), query in caption()) {
        let index = FuzzyIndex::build(&fragments, SearchOptions::default());
        prop_assert_eq!(index.search(&query, 50), index.search(&normalize(&query), 50));
    }
}

// =============================================================================
// NORMALIZATION PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_normalize_is_idempotent(text in mixed_text()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once.clone());
    }

    #[test]
    fn prop_normalize_output_shape(text in mixed_text()) {
        let out = normalize(&text);
        prop_assert!(!out.starts_with(' '));
        prop_assert!(!out.ends_with(' '));
        prop_assert!(!out.contains("  "));
        prop_assert!(out.chars().all(|c| c == ' ' || c.is_alphanumeric()));
        prop_assert_eq!(out.to_lowercase(), out.clone());
    }

    #[test]
    fn prop_normalize_ignores_case_and_width(text in "[a-z0-9 ]{0,20}") {
        prop_assert_eq!(normalize(&text.to_uppercase()), normalize(&text));
        let fullwidth: String = text
            .chars()
            .map(|c| match c {
                'a'..='z' | '0'..='9' => char::from_u32(c as u32 + 0xFEE0).unwrap_or(c),
                other => other,
            })
            .collect();
        prop_assert_eq!(normalize(&fullwidth), normalize(&text));
    }

    #[test]
    fn prop_origins_align_with_normalize(text in mixed_text()) {
        let (normalized, origins) = normalize_with_origins(&text);
        prop_assert_eq!(&normalized, &normalize(&text));
        prop_assert_eq!(origins.len(), normalized.chars().count());
        let raw_len = text.chars().count();
        prop_assert!(origins.iter().all(|&o| o < raw_len));
        prop_assert!(origins.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn prop_snippet_keeps_token(
        prefix in "[a-hj-l0-9 ,.!~-]{0,150}",
        suffix in "[a-z ,.]{0,60}",
    ) {
        let text = format!("{}meiji{}", prefix, suffix);
        let clipped = clip_context(&text, "meiji", 78);
        prop_assert!(clipped.contains("meiji"), "token lost in {:?}", clipped);
    }
}
