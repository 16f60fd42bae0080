// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The OCR corpus: two tiers of fragments, fetched independently.
//!
//! Lines are few and load as soon as the session starts. Words are many
//! (often 5-10x the lines) and load only once someone shows intent to search.
//! Each tier is installed at most once; the merged view is always
//! `lines ++ words`, so ids never collide across tiers by construction.

mod context;
mod loader;
mod source;
mod store;

pub use context::*;
pub use loader::*;
pub use source::*;
pub use store::*;
