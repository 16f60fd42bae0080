// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring and ranking for fuzzy hits.
//!
//! Lower is better everywhere in this module: a score is a distance, and 0
//! means a perfect match.

mod core;
mod ranking;

pub use self::core::*;
pub use self::ranking::*;
