// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind search ranking.
//!
//! Each fragment is searched in two fields: `norm` and the lowercased `text`.
//! A field hit produces a *field score* in `[0, 1]`: edits divided by pattern
//! length. Field scores combine multiplicatively, each raised to its field
//! weight times a field-length norm:
//!
//! ```text
//! total = Π (score_f ^ (weight_f × norm_f))      over fields that matched
//! norm_f = round3(1 / sqrt(tokens_f))
//! ```
//!
//! Since every factor is `<= 1`, a fragment that matches in *both* fields
//! always scores at least as well as one matching in a single field. The
//! field-length norm makes a hit in a short line count more than the same hit
//! buried in a long one.
//!
//! A perfect field score of 0 would zero out the whole product, so it is
//! replaced by `f64::EPSILON`. Exact hits still win, but the other field
//! keeps its say in the tiebreak.

/// Edits-over-length score for one field hit.
///
/// `pattern_len` is in characters. Empty patterns never reach here; they are
/// rejected before searching.
pub fn field_score(distance: usize, pattern_len: usize) -> f64 {
    if pattern_len == 0 {
        return 1.0;
    }
    distance as f64 / pattern_len as f64
}

/// Largest edit count a pattern of `pattern_len` chars may use under `threshold`.
pub fn max_edits(threshold: f64, pattern_len: usize) -> usize {
    (threshold * pattern_len as f64).floor() as usize
}

/// Field-length norm: `1/sqrt(token count)`, rounded to three decimals.
///
/// Whitespace-separated tokens. An empty field counts as one token so the
/// norm stays finite.
pub fn field_length_norm(value: &str) -> f64 {
    let tokens = value.split_whitespace().count().max(1);
    (1000.0 / (tokens as f64).sqrt()).round() / 1000.0
}

/// One field's contribution to a fragment's total score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldHit {
    pub score: f64,
    pub weight: f64,
    pub norm: f64,
}

/// Combine field hits into a fragment score. Empty input means "no match" (1.0).
pub fn combine_field_scores(hits: &[FieldHit]) -> f64 {
    if hits.is_empty() {
        return 1.0;
    }
    hits.iter().fold(1.0, |total, hit| {
        let base = if hit.score == 0.0 && hit.weight > 0.0 {
            f64::EPSILON
        } else {
            hit.score
        };
        total * base.powf(hit.weight * hit.norm)
    })
}
