// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy matching: typo tolerance via edit distance.
//!
//! OCR output is noisy ("Meiii" for "Meiji", "l868" for "1868"), so exact
//! substring search misses too much. Everything here answers one question:
//! how many edits does it take to find `pattern` somewhere inside `text`?

mod levenshtein;

pub use levenshtein::*;
