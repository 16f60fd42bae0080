// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for suggestion context clipping.
//!
//! Clipping slices by character offsets computed against normalized text,
//! which can be longer or shorter than the original. Every slice must stay
//! in range.

#![no_main]

use arbitrary::Arbitrary;
use chronicle::normalize;
use chronicle::session::{clip_context, ELLIPSIS};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct ClipInput {
    text: String,
    query: String,
    budget: u8,
}

fuzz_target!(|input: ClipInput| {
    let budget = input.budget as usize;
    let query = normalize(&input.query);
    let clipped = clip_context(&input.text, &query, budget);

    let text_chars = input.text.chars().count();
    if text_chars <= budget {
        assert_eq!(clipped, input.text);
        return;
    }

    // Window plus at most one ellipsis on each side
    let max = budget + 2 * ELLIPSIS.chars().count();
    assert!(
        clipped.chars().count() <= max,
        "clipped {:?} exceeds budget {}",
        clipped,
        budget
    );
});
