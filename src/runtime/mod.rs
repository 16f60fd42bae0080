// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime bindings.
//!
//! Natively the index worker is a thread (see [`crate::worker`]). In the
//! browser it is a Web Worker that loads this crate as WASM and forwards
//! `postMessage` payloads to the same [`crate::worker::WorkerState`].

#[cfg(feature = "wasm")]
pub mod wasm;
