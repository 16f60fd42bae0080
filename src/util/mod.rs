// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! String helpers shared by ingestion, the index and the session.
//!
//! The one that matters is [`normalize`]: fragments are normalized once at
//! ingestion, queries on every keystroke, and both must land in the same
//! canonical form or nothing matches.

pub mod normalize;

pub use normalize::*;
