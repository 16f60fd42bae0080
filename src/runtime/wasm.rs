// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! WebAssembly bindings for the index worker.
//!
//! The Web Worker script is a few lines of glue:
//!
//! ```js
//! import init, { ChronicleWorker } from "./chronicle.js";
//! await init();
//! const worker = new ChronicleWorker();
//! self.onmessage = (event) => {
//!     const reply = worker.handleMessage(event.data);
//!     if (reply !== undefined) self.postMessage(reply);
//! };
//! ```
//!
//! Messages and replies use exactly the JSON shapes of the native protocol,
//! so the page-side controller cannot tell which runtime it is talking to.
//! The WASM build is single-threaded; `parallel` stays off for it.

use crate::config::SearchOptions;
use crate::util::normalize;
use crate::worker::{WorkerMessage, WorkerState};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

/// Browser-side index worker.
#[wasm_bindgen]
pub struct ChronicleWorker {
    state: WorkerState,
}

#[wasm_bindgen]
impl ChronicleWorker {
    /// Create a worker. `options` is an optional `SearchOptions` object
    /// (camelCase keys); missing keys keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<ChronicleWorker, JsValue> {
        let options: SearchOptions = if options.is_undefined() || options.is_null() {
            SearchOptions::default()
        } else {
            from_value(options)?
        };
        Ok(Self {
            state: WorkerState::new(options),
        })
    }

    /// Handle one protocol message. Returns the reply for `query`
    /// messages and `undefined` for `init`.
    #[wasm_bindgen(js_name = handleMessage)]
    pub fn handle_message(&mut self, message: JsValue) -> Result<JsValue, JsValue> {
        let message: WorkerMessage = from_value(message)?;
        match self.state.handle(message) {
            Some(reply) => Ok(to_value(&reply)?),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Fragments in the current index.
    #[wasm_bindgen(getter)]
    pub fn indexed(&self) -> usize {
        self.state.indexed()
    }
}

/// The normalizer, exposed so the page can mirror queries into the URL.
#[wasm_bindgen(js_name = normalizeText)]
pub fn normalize_text(value: &str) -> String {
    normalize(value)
}
