// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text normalization for search.
//!
//! Historical scans mix fullwidth and halfwidth forms, stray punctuation from
//! OCR noise, and arbitrary casing. Normalization folds all of that away:
//!
//! - "Ｔｏｋｙｏ" → "tokyo"
//! - "MEIJI-1868!" → "meiji 1868"
//! - "  明治  維新 " → "明治 維新"
//!
//! # Algorithm
//!
//! 1. NFKC (compatibility decomposition + canonical composition)
//! 2. Lowercase, then NFKC again so case mapping cannot leave a decomposed sequence
//! 3. Keep runs of letters and numbers (general categories `L*` and `N*`)
//! 4. Join the runs with single spaces
//!
//! Combining marks (`Mn`, `Mc`) are neither letters nor numbers, so they
//! separate too: "हिन्दी" becomes "ह न द", the same as the ingestion tool
//! and the browser worker produce. `char::is_alphanumeric` would keep them.
//!
//! The output contains only letters and numbers joined by single spaces,
//! which is what makes the function idempotent.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;
use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::UnicodeNormalization;

const WORD_RUN: &str = r"[\p{L}\p{N}]+";

fn word_run_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| match Regex::new(WORD_RUN) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!("unicode classes unavailable, using is_alphanumeric: {}", e);
                None
            }
        })
        .as_ref()
}

/// Steps 1 and 2: compatibility folding and case folding.
fn fold(value: &str) -> String {
    let lowered = value.nfkc().collect::<String>().to_lowercase();
    lowered.nfkc().collect()
}

/// Byte ranges of the letter/number runs in folded text.
fn word_runs(folded: &str) -> Vec<Range<usize>> {
    if let Some(re) = word_run_pattern() {
        return re.find_iter(folded).map(|m| m.range()).collect();
    }

    let mut runs = Vec::new();
    let mut start = None;
    for (i, c) in folded.char_indices() {
        match (c.is_alphanumeric(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(s..folded.len());
    }
    runs
}

/// Normalize text for matching. Empty output means "no query".
pub fn normalize(value: &str) -> String {
    let folded = fold(value);
    word_runs(&folded)
        .into_iter()
        .map(|run| &folded[run])
        .collect::<Vec<_>>()
        .join(" ")
}

/// A base character plus the combining marks that follow it, with the
/// char index of the base. NFKC never composes across these boundaries.
fn clusters(value: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut open: Option<(usize, usize)> = None;
    for (char_index, (byte_index, c)) in value.char_indices().enumerate() {
        if open.is_some() && canonical_combining_class(c) != 0 {
            continue;
        }
        if let Some((ci, bi)) = open {
            out.push((ci, &value[bi..byte_index]));
        }
        open = Some((char_index, byte_index));
    }
    if let Some((ci, bi)) = open {
        out.push((ci, &value[bi..]));
    }
    out
}

/// [`normalize`], plus the char index in `value` each output char came from.
///
/// Folding runs per cluster instead of over the whole string, so every
/// output char can be traced back. Inserted spaces point at the start of
/// the run they precede. Text with no cross-cluster compositions (nearly
/// all OCR output) normalizes to the same string [`normalize`] returns.
pub fn normalize_with_origins(value: &str) -> (String, Vec<usize>) {
    let mut folded = String::with_capacity(value.len());
    let mut byte_origin: Vec<usize> = Vec::with_capacity(value.len());
    for (origin, cluster) in clusters(value) {
        folded.push_str(&fold(cluster));
        byte_origin.resize(folded.len(), origin);
    }

    let mut out = String::with_capacity(folded.len());
    let mut origins = Vec::with_capacity(folded.len());
    for run in word_runs(&folded) {
        if !out.is_empty() {
            out.push(' ');
            origins.push(byte_origin[run.start]);
        }
        for (offset, c) in folded[run.clone()].char_indices() {
            out.push(c);
            origins.push(byte_origin[run.start + offset]);
        }
    }
    (out, origins)
}

/// Space-separated tokens of an already-normalized string.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(' ').filter(|t| !t.is_empty())
}

/// First token with at least `min_chars` characters.
pub fn first_token_with_len(normalized: &str, min_chars: usize) -> Option<&str> {
    tokens(normalized).find(|t| t.chars().count() >= min_chars)
}

/// Number of characters (not bytes).
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}
