// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for index search.
//!
//! Builds a small corpus from fuzzer-chosen captions and throws a
//! fuzzer-chosen query at it. Results must be bounded by the limit, refer
//! to real fragments, and never repeat.

#![no_main]

use arbitrary::Arbitrary;
use chronicle::fuzzy::{substring_match, within_distance};
use chronicle::testing::make_line;
use chronicle::{normalize, FuzzyIndex, SearchOptions};
use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;

#[derive(Debug, Arbitrary)]
struct SearchInput {
    captions: Vec<String>,
    query: String,
    limit: u8,
}

fuzz_target!(|input: SearchInput| {
    // Cap sizes to avoid timeouts
    let captions: Vec<String> = input
        .captions
        .iter()
        .take(32)
        .map(|c| c.chars().take(120).collect())
        .collect();
    let query: String = input.query.chars().take(64).collect();
    let limit = input.limit as usize;

    let fragments: Vec<_> = captions
        .iter()
        .enumerate()
        .map(|(i, text)| make_line(&format!("line-{}", i), text))
        .collect();
    let index = FuzzyIndex::build(&fragments, SearchOptions::default());

    let hits = index.search_hits(&query, limit);
    assert!(hits.len() <= limit);

    let mut seen = HashSet::new();
    for pair in hits.windows(2) {
        assert!(pair[0].score <= pair[1].score, "hits out of order");
    }
    for hit in &hits {
        assert!(hit.index < fragments.len());
        assert!(seen.insert(hit.index), "duplicate hit {}", hit.index);
    }

    // The cheap prefilter and the traceback agree on distance
    let pattern: Vec<char> = normalize(&query).chars().collect();
    for caption in &captions {
        let text: Vec<char> = normalize(caption).chars().collect();
        let max = pattern.len() / 3;
        match (within_distance(&pattern, &text, max), substring_match(&pattern, &text, max)) {
            (Some(d), Some(m)) => {
                assert_eq!(d, m.distance);
                assert!(m.start <= m.end && m.end <= text.len());
                assert!(m.longest_run <= pattern.len());
            }
            (None, None) => {}
            (_, None) if pattern.is_empty() => {}
            (a, b) => panic!("prefilter {:?} disagrees with traceback {:?}", a, b),
        }
    }
});
