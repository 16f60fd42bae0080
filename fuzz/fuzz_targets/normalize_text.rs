// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for text normalization.
//!
//! OCR output is whatever the recognizer hallucinated: stray combining
//! marks, fullwidth digits, control bytes. Normalization has to turn all
//! of it into something stable.

#![no_main]

use chronicle::normalize;
use chronicle::util::{normalize_with_origins, tokens};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
    let once = normalize(input);

    // Stable under a second pass
    assert_eq!(normalize(&once), once, "normalize is not idempotent for {:?}", input);

    // Collapsed: no leading, trailing, or doubled whitespace
    assert_eq!(once.trim(), once);
    assert!(!once.contains("  "), "double space in {:?}", once);

    // Every token is non-empty
    for token in tokens(&once) {
        assert!(!token.is_empty());
    }

    // Every traced char points inside the raw text, in order
    let (traced, origins) = normalize_with_origins(input);
    assert_eq!(origins.len(), traced.chars().count());
    let raw_len = input.chars().count();
    assert!(origins.iter().all(|&o| o < raw_len));
    assert!(origins.windows(2).all(|w| w[0] <= w[1]));
});
