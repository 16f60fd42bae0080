// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The fuzzy index: weighted, location-agnostic approximate search.
//!
//! There is no clever data structure here. OCR corpora for a single scan are
//! thousands of fragments, not millions, and the query is typed one key at a
//! time. A linear scan with a bounded edit-distance kernel is fast enough,
//! parallelizes trivially, and has no index-time knobs to get wrong.
//!
//! What the build step *does* precompute:
//! - both fields as `Vec<char>` (the `text` field lowercased), so the kernel
//!   never re-decodes UTF-8
//! - each field's length norm (`1/sqrt(tokens)`), so scoring is a lookup
//! - field weights rescaled to sum to 1
//!
//! # Matching
//!
//! A field matches when the query occurs somewhere in it with at most
//! `floor(threshold × query_chars)` edits *and* the alignment contains a run
//! of at least `min_match_char_length` exactly-matched characters. A fragment
//! matches when any field matches. See [`crate::scoring`] for how field
//! scores combine.

use crate::config::SearchOptions;
use crate::fuzzy::substring_match;
use crate::scoring::{
    combine_field_scores, field_length_norm, field_score, max_edits, rank_hits, FieldHit, Hit,
};
use crate::types::Fragment;
use crate::util::normalize;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One fragment, pre-digested for matching.
#[derive(Debug, Clone)]
struct IndexedRecord {
    id: String,
    norm: Vec<char>,
    text: Vec<char>,
    norm_length: f64,
    text_length: f64,
}

impl IndexedRecord {
    fn new(fragment: &Fragment) -> Self {
        let lowered = fragment.text.to_lowercase();
        Self {
            id: fragment.id.clone(),
            norm: fragment.norm.chars().collect(),
            text: lowered.chars().collect(),
            norm_length: field_length_norm(&fragment.norm),
            text_length: field_length_norm(&lowered),
        }
    }
}

/// Immutable fuzzy index over one corpus snapshot.
///
/// Rebuilding means constructing a new `FuzzyIndex` and replacing the old one;
/// there is no in-place mutation, so a reader never sees a partial build.
#[derive(Debug, Clone)]
pub struct FuzzyIndex {
    records: Vec<IndexedRecord>,
    options: SearchOptions,
    norm_weight: f64,
    text_weight: f64,
}

impl FuzzyIndex {
    /// Build over `fragments` in corpus order.
    pub fn build<'a, I>(fragments: I, options: SearchOptions) -> Self
    where
        I: IntoIterator<Item = &'a Fragment>,
    {
        let fragments: Vec<&Fragment> = fragments.into_iter().collect();

        #[cfg(feature = "parallel")]
        let records: Vec<IndexedRecord> = fragments.par_iter().map(|f| IndexedRecord::new(f)).collect();
        #[cfg(not(feature = "parallel"))]
        let records: Vec<IndexedRecord> = fragments.iter().map(|f| IndexedRecord::new(f)).collect();

        let (norm_weight, text_weight) = options.normalized_weights();
        debug!(fragments = records.len(), "built fuzzy index");

        Self {
            records,
            options,
            norm_weight,
            text_weight,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Id of the fragment at corpus position `index`.
    pub fn id_at(&self, index: usize) -> Option<&str> {
        self.records.get(index).map(|r| r.id.as_str())
    }

    /// Ranked fragment ids for `query`, best first, at most `limit`.
    ///
    /// The query is normalized here, so callers may pass raw input. A query
    /// that normalizes to nothing returns no ids (not the whole corpus).
    pub fn search(&self, query: &str, limit: usize) -> Vec<String> {
        self.search_hits(query, limit)
            .into_iter()
            .filter_map(|hit| self.id_at(hit.index).map(str::to_string))
            .collect()
    }

    /// Like [`search`](Self::search), but keeps positions and scores.
    pub fn search_hits(&self, query: &str, limit: usize) -> Vec<Hit> {
        let normalized = normalize(query);
        if normalized.is_empty() || limit == 0 || self.records.is_empty() {
            return Vec::new();
        }

        let pattern: Vec<char> = normalized.chars().collect();
        // A pattern shorter than the minimum run can never produce one
        if pattern.len() < self.options.min_match_char_length {
            return Vec::new();
        }
        let max = max_edits(self.options.threshold, pattern.len());

        #[cfg(feature = "parallel")]
        let hits: Vec<Hit> = self
            .records
            .par_iter()
            .enumerate()
            .filter_map(|(index, record)| {
                self.score_record(&pattern, max, record)
                    .map(|score| Hit { index, score })
            })
            .collect();
        #[cfg(not(feature = "parallel"))]
        let hits: Vec<Hit> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                self.score_record(&pattern, max, record)
                    .map(|score| Hit { index, score })
            })
            .collect();

        rank_hits(hits, limit)
    }

    fn score_record(&self, pattern: &[char], max: usize, record: &IndexedRecord) -> Option<f64> {
        let norm_length = |n: f64| if self.options.ignore_field_norm { 1.0 } else { n };
        let fields = [
            (&record.norm, self.norm_weight, norm_length(record.norm_length)),
            (&record.text, self.text_weight, norm_length(record.text_length)),
        ];

        let mut hits = Vec::with_capacity(2);
        for (chars, weight, length) in fields {
            let Some(m) = substring_match(pattern, chars, max) else {
                continue;
            };
            if m.longest_run < self.options.min_match_char_length {
                continue;
            }
            hits.push(FieldHit {
                score: field_score(m.distance, pattern.len()),
                weight,
                norm: length,
            });
        }

        if hits.is_empty() {
            None
        } else {
            Some(combine_field_scores(&hits))
        }
    }
}
