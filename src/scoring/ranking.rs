// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ranking: how fuzzy hits get sorted.
//!
//! Ascending score, then corpus order. The corpus-order tiebreak keeps line
//! fragments (loaded first) ahead of equally-scored word fragments and makes
//! the output deterministic regardless of how rayon split the work.

use std::cmp::Ordering;

/// A fragment that matched, identified by its position in the corpus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub score: f64,
}

/// Compare two hits for ranking.
///
/// 1. **Score** ascending (lower distance wins)
/// 2. **Corpus index** ascending for absolute determinism
pub fn compare_hits(a: &Hit, b: &Hit) -> Ordering {
    match a.score.partial_cmp(&b.score) {
        Some(ord) if ord != Ordering::Equal => ord,
        _ => a.index.cmp(&b.index),
    }
}

/// Sort hits best-first and keep at most `limit`.
pub fn rank_hits(mut hits: Vec<Hit>, limit: usize) -> Vec<Hit> {
    hits.sort_by(compare_hits);
    hits.truncate(limit);
    hits
}
