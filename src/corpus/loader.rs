// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Background tier loading with legacy fallback.
//!
//! Each tier request becomes one short-lived thread that fetches, decodes and
//! reports back a [`TierLoad`] event over a channel. The session drains those
//! events on its own thread, so installing a tier never races with reading it.
//!
//! # Legacy fallback
//!
//! Deployments that predate the tier split only serve `/ocr/entries.json`.
//! When the line endpoint is unavailable we fetch that instead, keep its
//! lines, and park its words in a shared cache. The word tier, once
//! requested, is then served from that cache without a second download:
//!
//! ```text
//! request(Line) ──► lines.json ──404──► entries.json ──► lines ──► event
//!                                                   └──► words ──► cache
//! request(Word) ──► cache hit? ──yes──► event
//!                        └──no──► words.json ──404──► entries.json ──► words ──► event
//! ```

use super::source::CorpusSource;
use crate::config::Endpoints;
use crate::error::FetchError;
use crate::types::{Fragment, FragmentKind, Tier};
use parking_lot::RwLock;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of one tier request.
#[derive(Debug)]
pub enum TierLoad {
    Loaded {
        tier: Tier,
        fragments: Vec<Fragment>,
        /// Served from the legacy combined endpoint.
        legacy: bool,
    },
    Failed {
        tier: Tier,
        error: FetchError,
    },
}

impl TierLoad {
    pub fn tier(&self) -> Tier {
        match self {
            TierLoad::Loaded { tier, .. } | TierLoad::Failed { tier, .. } => *tier,
        }
    }
}

/// Split a combined payload into `(lines, words)`.
pub fn partition_by_kind(fragments: Vec<Fragment>) -> (Vec<Fragment>, Vec<Fragment>) {
    fragments
        .into_iter()
        .partition(|f| f.kind == FragmentKind::Line)
}

type LegacyWords = Arc<RwLock<Option<Vec<Fragment>>>>;

/// Issues tier fetches (each at most once) and collects their outcomes.
pub struct TierLoader {
    source: Arc<dyn CorpusSource>,
    endpoints: Endpoints,
    legacy_words: LegacyWords,
    requested: [bool; 2],
    in_flight: usize,
    tx: Sender<TierLoad>,
    rx: Receiver<TierLoad>,
}

impl TierLoader {
    pub fn new(source: Arc<dyn CorpusSource>, endpoints: Endpoints) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            endpoints,
            legacy_words: Arc::new(RwLock::new(None)),
            requested: [false; 2],
            in_flight: 0,
            tx,
            rx,
        }
    }

    fn slot(tier: Tier) -> usize {
        match tier {
            FragmentKind::Line => 0,
            FragmentKind::Word => 1,
        }
    }

    pub fn is_requested(&self, tier: Tier) -> bool {
        self.requested[Self::slot(tier)]
    }

    /// Loads started but not yet drained.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn source(&self) -> &dyn CorpusSource {
        self.source.as_ref()
    }

    /// Start loading `tier` in the background. Returns `false` if it was
    /// already requested; every later request is a no-op.
    pub fn request(&mut self, tier: Tier) -> bool {
        let slot = Self::slot(tier);
        if self.requested[slot] {
            return false;
        }
        self.requested[slot] = true;
        self.in_flight += 1;

        let job = LoadJob {
            source: Arc::clone(&self.source),
            endpoints: self.endpoints.clone(),
            legacy_words: Arc::clone(&self.legacy_words),
            tier,
        };
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("chronicle-load-{tier}"))
            .spawn(move || {
                // Receiver gone means the session was torn down
                let _ = tx.send(job.run());
            });
        if let Err(e) = spawned {
            let _ = self.tx.send(TierLoad::Failed {
                tier,
                error: FetchError::Io(e),
            });
        }
        true
    }

    /// Next finished load, without blocking.
    pub fn try_next(&mut self) -> Option<TierLoad> {
        let event = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(event)
    }

    /// Next finished load, waiting up to `timeout`.
    pub fn next_timeout(&mut self, timeout: Duration) -> Option<TierLoad> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(event)
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

struct LoadJob {
    source: Arc<dyn CorpusSource>,
    endpoints: Endpoints,
    legacy_words: LegacyWords,
    tier: Tier,
}

impl LoadJob {
    fn run(self) -> TierLoad {
        let tier = self.tier;
        let result = match tier {
            FragmentKind::Line => self.load_lines(),
            FragmentKind::Word => self.load_words(),
        };
        match result {
            Ok((fragments, legacy)) => {
                info!(%tier, count = fragments.len(), legacy, "tier loaded");
                TierLoad::Loaded {
                    tier,
                    fragments,
                    legacy,
                }
            }
            Err(error) => TierLoad::Failed { tier, error },
        }
    }

    fn load_lines(&self) -> Result<(Vec<Fragment>, bool), FetchError> {
        match self.source.fetch(&self.endpoints.lines) {
            Ok(lines) => Ok((lines, false)),
            Err(e) if e.is_unavailable() => {
                warn!(endpoint = %self.endpoints.lines, "tiered endpoint unavailable, using legacy corpus");
                let (lines, words) = partition_by_kind(self.source.fetch(&self.endpoints.legacy)?);
                *self.legacy_words.write() = Some(words);
                Ok((lines, true))
            }
            Err(e) => Err(e),
        }
    }

    fn load_words(&self) -> Result<(Vec<Fragment>, bool), FetchError> {
        if let Some(words) = self.legacy_words.read().clone() {
            return Ok((words, true));
        }
        match self.source.fetch(&self.endpoints.words) {
            Ok(words) => Ok((words, false)),
            Err(e) if e.is_unavailable() => {
                let (_, words) = partition_by_kind(self.source.fetch(&self.endpoints.legacy)?);
                Ok((words, true))
            }
            Err(e) => Err(e),
        }
    }
}
