// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The index worker: an actor that owns the fuzzy index.
//!
//! Building and searching can take long enough to stall input handling, so
//! neither happens on the interactive thread. The worker owns its index
//! outright. Nobody else can read or lock it; the only way in is a message.
//!
//! # Protocol
//!
//! ```text
//! {"type":"init","entries":[...]}                          -> (no reply)
//! {"type":"query","requestId":7,"query":"meiji","limit":50} -> {"requestId":7,"ids":[...]}
//! ```
//!
//! Messages are handled strictly in arrival order. Replies carry the request
//! id they answer; deciding whether a reply is still wanted is the caller's
//! job (see [`crate::session`]). The worker never cancels anything.
//!
//! The same [`WorkerState`] drives both the native thread here and the
//! browser Web Worker in [`crate::runtime`].

use crate::config::SearchOptions;
use crate::index::FuzzyIndex;
use crate::types::Fragment;
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, trace};

/// Name of the native worker thread.
pub const WORKER_THREAD_NAME: &str = "chronicle-index";

/// Controller → worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkerMessage {
    /// Replace the index with one built over `entries`. No reply.
    Init { entries: Vec<Fragment> },
    /// Search and reply with at most `limit` ids.
    Query {
        #[serde(rename = "requestId")]
        request_id: u64,
        query: String,
        limit: usize,
    },
}

/// Worker → controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryReply {
    pub request_id: u64,
    pub ids: Vec<String>,
}

/// Everything the worker knows: the search options and the current index.
#[derive(Debug)]
pub struct WorkerState {
    options: SearchOptions,
    index: Option<FuzzyIndex>,
}

impl WorkerState {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            index: None,
        }
    }

    /// Number of indexed fragments (0 before the first `init`).
    pub fn indexed(&self) -> usize {
        self.index.as_ref().map_or(0, FuzzyIndex::len)
    }

    /// Handle one message. Only queries produce a reply.
    pub fn handle(&mut self, message: WorkerMessage) -> Option<QueryReply> {
        match message {
            WorkerMessage::Init { entries } => {
                // Build completely, then swap
                let rebuilt = FuzzyIndex::build(&entries, self.options.clone());
                debug!(entries = rebuilt.len(), "index rebuilt");
                self.index = Some(rebuilt);
                None
            }
            WorkerMessage::Query {
                request_id,
                query,
                limit,
            } => {
                let ids = match &self.index {
                    Some(index) => index.search(&query, limit),
                    None => Vec::new(),
                };
                trace!(request_id, hits = ids.len(), "query answered");
                Some(QueryReply { request_id, ids })
            }
        }
    }
}

/// Controller side of the worker channels.
#[derive(Debug)]
pub struct WorkerLink {
    pub tx: Sender<WorkerMessage>,
    pub rx: Receiver<QueryReply>,
}

/// Worker side of the worker channels.
///
/// [`IndexWorker`] runs one of these on a thread. Tests hold one directly to
/// play the worker by hand, answering in whatever order they like.
#[derive(Debug)]
pub struct WorkerEnd {
    pub rx: Receiver<WorkerMessage>,
    pub tx: Sender<QueryReply>,
}

/// A connected pair of channel ends.
pub fn channel() -> (WorkerLink, WorkerEnd) {
    let (msg_tx, msg_rx) = mpsc::channel();
    let (reply_tx, reply_rx) = mpsc::channel();
    (
        WorkerLink {
            tx: msg_tx,
            rx: reply_rx,
        },
        WorkerEnd {
            rx: msg_rx,
            tx: reply_tx,
        },
    )
}

impl WorkerEnd {
    /// Serve messages until the controller hangs up.
    pub fn serve(self, mut state: WorkerState) {
        while let Ok(message) = self.rx.recv() {
            if let Some(reply) = state.handle(message) {
                if self.tx.send(reply).is_err() {
                    break;
                }
            }
        }
        debug!("index worker stopped");
    }
}

/// Handle to the native worker thread.
#[derive(Debug)]
pub struct IndexWorker {
    handle: JoinHandle<()>,
}

impl IndexWorker {
    /// Start the worker thread. Returns the handle and the controller's link.
    pub fn spawn(options: SearchOptions) -> io::Result<(Self, WorkerLink)> {
        let (link, end) = channel();
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || end.serve(WorkerState::new(options)))?;
        Ok((Self { handle }, link))
    }

    /// Wait for the thread to exit. The link must already be dropped.
    pub fn join(self) {
        if self.handle.join().is_err() {
            tracing::warn!("index worker panicked");
        }
    }
}
