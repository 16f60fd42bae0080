// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Approximate substring matching with early exits.
//!
//! Plain Levenshtein compares two whole strings. Searching OCR text needs the
//! semi-global variant: the pattern must be consumed completely, but it may
//! start and end anywhere in the text, for free. That single change (row zero
//! is all zeros instead of `0..=n`) is what makes matching location-agnostic.
//!
//! Two passes:
//! 1. A two-row DP that only answers "within `max`?" and bails as soon as a
//!    whole row exceeds `max`. Most fragments in a corpus die here.
//! 2. For survivors, a full matrix with traceback, so we know *which* text
//!    characters matched and can enforce a minimum matched run length.
//!
//! The row-minimum exit is sound: every cell in row `i + 1` is derived from
//! row `i` plus a non-negative cost, so row minima never decrease.

/// Best approximate occurrence of a pattern inside a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringMatch {
    /// Edit distance of the best alignment.
    pub distance: usize,
    /// Character range `[start, end)` of the aligned text.
    pub start: usize,
    pub end: usize,
    /// Longest run of consecutive text characters matched exactly.
    pub longest_run: usize,
}

/// Find `pattern` inside `text` with at most `max` edits.
///
/// Returns the alignment with the smallest distance (earliest end position
/// on ties), or `None` when no alignment is within `max` or the pattern is
/// empty.
pub fn substring_match(pattern: &[char], text: &[char], max: usize) -> Option<SubstringMatch> {
    let m = pattern.len();
    if m == 0 {
        return None;
    }

    // Exact occurrence: distance 0, whole pattern is one run
    if let Some(start) = find_exact(pattern, text) {
        return Some(SubstringMatch {
            distance: 0,
            start,
            end: start + m,
            longest_run: m,
        });
    }

    if max == 0 {
        return None;
    }

    within_distance(pattern, text, max)?;
    let aligned = align(pattern, text);
    (aligned.distance <= max).then_some(aligned)
}

/// Cheap bounded check: smallest substring edit distance if it is `<= max`.
pub fn within_distance(pattern: &[char], text: &[char], max: usize) -> Option<usize> {
    let m = pattern.len();
    let n = text.len();

    // Early-exit: a text shorter than the pattern forces m - n deletions
    if m > n + max {
        return None;
    }

    // Row 0 is all zeros: the match may start anywhere
    let mut dp: Vec<usize> = vec![0; n + 1];
    for (i, &pc) in pattern.iter().enumerate() {
        let mut prev = dp[0];
        dp[0] = i + 1;
        let mut min_row = dp[0];

        for (j, &tc) in text.iter().enumerate() {
            let temp = dp[j + 1];
            let cost = usize::from(pc != tc);
            dp[j + 1] = (dp[j + 1] + 1).min(dp[j] + 1).min(prev + cost);
            prev = temp;
            if dp[j + 1] < min_row {
                min_row = dp[j + 1];
            }
        }

        // Early-exit: if minimum in this row exceeds max, no point continuing
        if min_row > max {
            return None;
        }
    }

    // The match may also end anywhere
    let best = dp.iter().copied().min().unwrap_or(m);
    (best <= max).then_some(best)
}

/// Full semi-global alignment with traceback.
fn align(pattern: &[char], text: &[char]) -> SubstringMatch {
    let m = pattern.len();
    let n = text.len();
    let width = n + 1;
    let mut d = vec![0usize; (m + 1) * width];

    for i in 1..=m {
        d[i * width] = i;
        for j in 1..=n {
            let cost = usize::from(pattern[i - 1] != text[j - 1]);
            let diag = d[(i - 1) * width + (j - 1)] + cost;
            let up = d[(i - 1) * width + j] + 1;
            let left = d[i * width + (j - 1)] + 1;
            d[i * width + j] = diag.min(up).min(left);
        }
    }

    // Earliest end column with the minimal distance
    let last_row = &d[m * width..(m + 1) * width];
    let mut end = 0;
    for j in 1..=n {
        if last_row[j] < last_row[end] {
            end = j;
        }
    }
    let distance = last_row[end];

    // Walk back, preferring diagonal moves so matched characters are kept
    let mut matched = vec![false; n];
    let (mut i, mut j) = (m, end);
    while i > 0 {
        let here = d[i * width + j];
        if j > 0 {
            let cost = usize::from(pattern[i - 1] != text[j - 1]);
            if here == d[(i - 1) * width + (j - 1)] + cost {
                if cost == 0 {
                    matched[j - 1] = true;
                }
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if here == d[(i - 1) * width + j] + 1 {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    SubstringMatch {
        distance,
        start: j,
        end,
        longest_run: longest_true_run(&matched),
    }
}

fn find_exact(pattern: &[char], text: &[char]) -> Option<usize> {
    if pattern.len() > text.len() {
        return None;
    }
    text.windows(pattern.len()).position(|w| w == pattern)
}

fn longest_true_run(flags: &[bool]) -> usize {
    let mut best = 0;
    let mut current = 0;
    for &flag in flags {
        if flag {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}
