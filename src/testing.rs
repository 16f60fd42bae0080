// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use crate::corpus::CorpusSource;
use crate::error::FetchError;
use crate::types::{BBox, Fragment, FragmentKind};
use crate::util::normalize;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Create a fragment with derived `norm` and a placeholder bbox.
///
/// This is the canonical implementation used across all tests.
pub fn make_fragment(id: &str, text: &str, kind: FragmentKind) -> Fragment {
    Fragment {
        id: id.to_string(),
        text: text.to_string(),
        norm: normalize(text),
        context: Some(text.to_string()),
        bbox: BBox::new(10.0, 10.0, 100.0, 20.0),
        conf: 0.9,
        kind,
    }
}

/// Create a line fragment.
pub fn make_line(id: &str, text: &str) -> Fragment {
    make_fragment(id, text, FragmentKind::Line)
}

/// Create a word fragment.
pub fn make_word(id: &str, text: &str) -> Fragment {
    make_fragment(id, text, FragmentKind::Word)
}

/// Write `fragments` as JSON at `endpoint` under `root` (e.g. `/ocr/lines.json`).
pub fn write_corpus_file(root: &Path, endpoint: &str, fragments: &[Fragment]) -> io::Result<()> {
    let path = root.join(endpoint.trim_start_matches('/'));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(fragments)?;
    fs::write(path, json)
}

enum Canned {
    Fragments(Vec<Fragment>),
    Status(u16),
}

/// In-memory [`CorpusSource`] with canned responses and fetch counters.
///
/// Unknown endpoints answer [`FetchError::Unavailable`], like a 404.
#[derive(Default)]
pub struct StaticSource {
    responses: HashMap<String, Canned>,
    delays: HashMap<String, Duration>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `fragments` at `endpoint`.
    pub fn with(mut self, endpoint: &str, fragments: Vec<Fragment>) -> Self {
        self.responses
            .insert(endpoint.to_string(), Canned::Fragments(fragments));
        self
    }

    /// Answer `endpoint` with an HTTP error status.
    pub fn failing(mut self, endpoint: &str, status: u16) -> Self {
        self.responses
            .insert(endpoint.to_string(), Canned::Status(status));
        self
    }

    /// Sleep before answering `endpoint`.
    pub fn delayed(mut self, endpoint: &str, delay: Duration) -> Self {
        self.delays.insert(endpoint.to_string(), delay);
        self
    }

    /// How many times `endpoint` was fetched.
    pub fn fetch_count(&self, endpoint: &str) -> usize {
        self.fetches.lock().get(endpoint).copied().unwrap_or(0)
    }
}

impl CorpusSource for StaticSource {
    fn fetch(&self, endpoint: &str) -> Result<Vec<Fragment>, FetchError> {
        *self.fetches.lock().entry(endpoint.to_string()).or_default() += 1;
        if let Some(delay) = self.delays.get(endpoint) {
            std::thread::sleep(*delay);
        }
        match self.responses.get(endpoint) {
            Some(Canned::Fragments(fragments)) => Ok(fragments.clone()),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status: *status,
            }),
            None => Err(FetchError::Unavailable(endpoint.to_string())),
        }
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}
