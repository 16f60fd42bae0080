// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Display context for a fragment.
//!
//! Ingestion gives every word its line as `context`, but hand-written
//! overrides and older corpora may not. For those we recover the line
//! geometrically: the smallest line whose box contains the word's centre.

use crate::types::{Fragment, FragmentKind};
use std::sync::Arc;

/// Text to show around `fragment` in a suggestion.
pub fn display_context<'a>(fragment: &'a Fragment, lines: &'a [Arc<Fragment>]) -> &'a str {
    if let Some(context) = fragment.context.as_deref() {
        if !context.is_empty() {
            return context;
        }
    }
    if fragment.kind == FragmentKind::Word {
        if let Some(line) = containing_line(fragment, lines) {
            return &line.text;
        }
    }
    &fragment.text
}

/// Smallest-area line whose bbox contains the centre of `fragment`'s bbox.
pub fn containing_line<'a>(fragment: &Fragment, lines: &'a [Arc<Fragment>]) -> Option<&'a Fragment> {
    let (cx, cy) = fragment.bbox.center();
    lines
        .iter()
        .filter(|line| line.bbox.contains_point(cx, cy))
        .min_by(|a, b| a.bbox.area().total_cmp(&b.bbox.area()))
        .map(|line| line.as_ref())
}
