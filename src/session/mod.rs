// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search session controller.
//!
//! This is where everything meets. The session owns the query, the corpus
//! tiers, the link to the index worker, the viewport coordinator and the deep
//! link, and turns user input into messages and camera moves.
//!
//! # Threading
//!
//! The session itself is single-threaded: every method runs to completion and
//! nothing it owns is shared. Slow work happens elsewhere and comes back as
//! events:
//!
//! ```text
//!   TierLoader threads ──TierLoad──┐
//!                                  ▼
//!   host ──input──► SearchSession ──WorkerMessage──► index worker
//!                        ▲                               │
//!                        └──────────QueryReply───────────┘
//! ```
//!
//! The host calls [`pump`](SearchSession::pump) whenever it is idle (or
//! [`settle`](SearchSession::settle) when it is happy to block).
//!
//! # Latest wins
//!
//! Every query carries a fresh, increasing request id. A reply is applied only
//! if its id is the latest one issued; anything else is dropped on arrival.
//! Queries are never cancelled, and replies may arrive in any order. The
//! visible results still always belong to the most recent query.

mod input;
mod snippet;

pub use input::*;
pub use snippet::*;

use crate::config::{ChronicleConfig, SessionOptions};
use crate::corpus::{display_context, Corpus, CorpusSource, TierLoad, TierLoader};
use crate::deeplink::DeepLink;
use crate::hint::{FlagStore, HintBanner};
use crate::types::{Fragment, FragmentKind, Tier};
use crate::util::normalize;
use crate::viewport::{ViewportCoordinator, Viewer};
use crate::worker::{IndexWorker, QueryReply, WorkerLink, WorkerMessage};
use std::io;
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// Message shown when the line tier cannot be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "OCR index could not be loaded.";

/// How long [`SearchSession::settle`] waits on one channel before re-checking.
const SETTLE_POLL: Duration = Duration::from_millis(10);

/// Search panel visibility and input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    OpenUnfocused,
    OpenFocused,
}

impl PanelState {
    pub fn is_open(self) -> bool {
        self != PanelState::Closed
    }
}

/// One row of the suggestion dropdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub id: String,
    pub dom_id: String,
    pub text: String,
    pub context: String,
    pub confidence: u32,
    pub kind: FragmentKind,
    pub active: bool,
}

/// Interactive search over one scan.
pub struct SearchSession<V: Viewer> {
    options: SessionOptions,
    link: WorkerLink,
    worker: Option<IndexWorker>,
    loader: TierLoader,
    corpus: Corpus,
    viewport: ViewportCoordinator<V>,
    deeplink: DeepLink,
    hint: Option<HintBanner>,

    panel: PanelState,
    query: String,
    normalized: String,
    next_request_id: u64,
    latest_request_id: u64,
    awaiting_reply: bool,
    matches: Vec<Arc<Fragment>>,
    active_index: usize,
    selected: Option<String>,
    error: Option<String>,
}

impl<V: Viewer> SearchSession<V> {
    /// Mount a session with its own index worker thread.
    pub fn new(
        config: &ChronicleConfig,
        source: Arc<dyn CorpusSource>,
        viewer: V,
        page_url: Url,
    ) -> io::Result<Self> {
        let (worker, link) = IndexWorker::spawn(config.search.clone())?;
        let mut session = Self::with_link(config, source, viewer, page_url, link);
        session.worker = Some(worker);
        Ok(session)
    }

    /// Mount a session talking to an existing worker link.
    ///
    /// The line tier starts loading immediately.
    pub fn with_link(
        config: &ChronicleConfig,
        source: Arc<dyn CorpusSource>,
        viewer: V,
        page_url: Url,
        link: WorkerLink,
    ) -> Self {
        let options = config.session.clone();
        let viewport = ViewportCoordinator::new(viewer, options.highlight_ttl(), options.smooth_fit);
        let mut session = Self {
            loader: TierLoader::new(source, config.endpoints.clone()),
            options,
            link,
            worker: None,
            corpus: Corpus::new(),
            viewport,
            deeplink: DeepLink::new(page_url),
            hint: None,
            panel: PanelState::Closed,
            query: String::new(),
            normalized: String::new(),
            next_request_id: 0,
            latest_request_id: 0,
            awaiting_reply: false,
            matches: Vec::new(),
            active_index: 0,
            selected: None,
            error: None,
        };
        session.loader.request(Tier::Line);
        session
    }

    /// Show the keyboard hint unless it was dismissed before.
    pub fn attach_hint(&mut self, store: Box<dyn FlagStore + Send>, config: &ChronicleConfig) {
        self.hint = Some(HintBanner::mount(store, &config.hint));
    }

    // =========================================================================
    // STATE
    // =========================================================================

    pub fn panel(&self) -> PanelState {
        self.panel
    }

    /// Raw input text.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn normalized_query(&self) -> &str {
        &self.normalized
    }

    /// Every match for the current query, best first.
    pub fn matches(&self) -> &[Arc<Fragment>] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// The capped slice shown in the dropdown.
    pub fn visible_matches(&self) -> &[Arc<Fragment>] {
        let n = self.matches.len().min(self.options.max_suggestions);
        &self.matches[..n]
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Active index clamped into the visible list.
    pub fn active_suggestion_index(&self) -> usize {
        let visible = self.visible_matches().len();
        if visible == 0 {
            0
        } else {
            self.active_index.min(visible - 1)
        }
    }

    /// The committed fragment, if any.
    pub fn selected(&self) -> Option<&Arc<Fragment>> {
        self.selected.as_deref().and_then(|id| self.corpus.get(id))
    }

    /// Persistent load error, set at most once.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn viewport(&self) -> &ViewportCoordinator<V> {
        &self.viewport
    }

    pub fn viewer(&self) -> &V {
        self.viewport.viewer()
    }

    /// Page URL with the current `q`.
    pub fn url(&self) -> &Url {
        self.deeplink.url()
    }

    pub fn hint(&self) -> Option<&HintBanner> {
        self.hint.as_ref()
    }

    pub fn dismiss_hint(&mut self) {
        if let Some(hint) = self.hint.as_mut() {
            hint.dismiss();
        }
    }

    pub fn latest_request_id(&self) -> u64 {
        self.latest_request_id
    }

    /// No reply outstanding and no tier load in flight.
    pub fn is_settled(&self) -> bool {
        !self.awaiting_reply && self.loader.in_flight() == 0
    }

    /// Whether the dropdown is showing.
    pub fn suggestions_visible(&self) -> bool {
        self.panel == PanelState::OpenFocused && !self.query.is_empty()
    }

    /// Dropdown rows, with the clamped active row marked.
    pub fn suggestions(&self) -> Vec<Suggestion> {
        let active = self.active_suggestion_index();
        let lines = self.corpus.lines();
        self.visible_matches()
            .iter()
            .enumerate()
            .map(|(i, fragment)| Suggestion {
                id: fragment.id.clone(),
                dom_id: suggestion_dom_id(&fragment.id),
                text: fragment.text.clone(),
                context: clip_context(
                    display_context(fragment, lines),
                    &self.normalized,
                    self.options.snippet_budget,
                ),
                confidence: fragment.confidence_percent(),
                kind: fragment.kind,
                active: i == active,
            })
            .collect()
    }

    /// Element id of the active suggestion, while the dropdown is showing.
    pub fn active_descendant(&self) -> Option<String> {
        if !self.suggestions_visible() {
            return None;
        }
        self.visible_matches()
            .get(self.active_suggestion_index())
            .map(|f| suggestion_dom_id(&f.id))
    }

    // =========================================================================
    // QUERY
    // =========================================================================

    /// The input text changed.
    pub fn set_query(&mut self, raw: &str) {
        self.query = raw.to_string();
        let normalized = normalize(raw);
        if normalized == self.normalized {
            return;
        }

        self.normalized = normalized;
        self.active_index = 0;
        self.deeplink.write_query(&self.normalized);
        if self.normalized.chars().count() >= self.options.lazy_tier_min_chars {
            self.request_word_tier();
        }
        self.issue_query();
    }

    fn issue_query(&mut self) {
        self.next_request_id += 1;
        self.latest_request_id = self.next_request_id;

        if self.normalized.is_empty() {
            // Nothing to ask; earlier replies are now stale by id
            self.matches.clear();
            self.awaiting_reply = false;
            return;
        }

        let limit = self.options.match_limit.unwrap_or(self.corpus.len());
        let message = WorkerMessage::Query {
            request_id: self.latest_request_id,
            query: self.normalized.clone(),
            limit,
        };
        if self.link.tx.send(message).is_err() {
            warn!("index worker is gone, query not sent");
            self.awaiting_reply = false;
            return;
        }
        debug!(request_id = self.latest_request_id, query = %self.normalized, "query issued");
        self.awaiting_reply = true;
    }

    fn apply_reply(&mut self, reply: QueryReply) {
        if reply.request_id != self.latest_request_id {
            debug!(
                request_id = reply.request_id,
                latest = self.latest_request_id,
                "stale reply discarded"
            );
            return;
        }

        self.awaiting_reply = false;
        self.matches = reply
            .ids
            .iter()
            .filter_map(|id| self.corpus.get(id).cloned())
            .collect();
        if self.active_index >= self.matches.len() {
            self.active_index = self.matches.len().saturating_sub(1);
        }
        self.try_autocommit();
    }

    // =========================================================================
    // CORPUS
    // =========================================================================

    fn request_word_tier(&mut self) {
        if self.loader.request(Tier::Word) {
            debug!("word tier requested");
        }
    }

    fn apply_load(&mut self, event: TierLoad) {
        match event {
            TierLoad::Loaded { tier, fragments, .. } => {
                if !self.corpus.install(tier, fragments) {
                    return;
                }
                info!(%tier, total = self.corpus.len(), "tier installed");
                self.reindex();
                if tier == Tier::Line {
                    if let Some(seed) = self.deeplink.take_seed() {
                        info!(query = %seed, "seeding query from page URL");
                        self.set_query(&seed);
                    }
                }
            }
            TierLoad::Failed {
                tier: Tier::Line,
                error,
            } => {
                warn!(%error, "line tier failed to load");
                if self.error.is_none() {
                    self.error = Some(LOAD_ERROR_MESSAGE.to_string());
                }
            }
            TierLoad::Failed {
                tier: Tier::Word,
                error,
            } => {
                warn!(%error, "word tier failed to load, continuing without it");
                self.corpus.install(Tier::Word, Vec::new());
            }
        }
    }

    /// Ship the merged corpus to the worker and re-ask the current query.
    fn reindex(&mut self) {
        let entries = self.corpus.snapshot();
        if self.link.tx.send(WorkerMessage::Init { entries }).is_err() {
            warn!("index worker is gone, corpus not sent");
            return;
        }
        if !self.normalized.is_empty() {
            self.issue_query();
        }
    }

    // =========================================================================
    // EVENT LOOP
    // =========================================================================

    /// Apply every finished load and reply without blocking.
    /// Returns the number of events applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let mut progressed = false;
            while let Some(event) = self.loader.try_next() {
                self.apply_load(event);
                applied += 1;
                progressed = true;
            }
            match self.link.rx.try_recv() {
                Ok(reply) => {
                    self.apply_reply(reply);
                    applied += 1;
                    progressed = true;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    if self.awaiting_reply {
                        warn!("index worker disconnected");
                        self.awaiting_reply = false;
                    }
                }
            }
            if !progressed {
                return applied;
            }
        }
    }

    /// Block until settled or `timeout` passes. Returns whether it settled.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.pump();
            if self.is_settled() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let wait = SETTLE_POLL.min(deadline - now);
            if self.awaiting_reply {
                match self.link.rx.recv_timeout(wait) {
                    Ok(reply) => self.apply_reply(reply),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => self.awaiting_reply = false,
                }
            } else if let Some(event) = self.loader.next_timeout(wait) {
                self.apply_load(event);
            }
        }
    }

    /// Fire due timers.
    pub fn tick(&mut self, now: Instant) {
        self.viewport.tick(now);
        if let Some(hint) = self.hint.as_mut() {
            hint.tick(now);
        }
    }

    /// The viewer finished opening its imagery.
    pub fn viewer_ready(&mut self) {
        self.viewport.mark_ready();
        self.try_autocommit();
    }

    /// Unmount: remove the highlight, cancel timers, stop the worker.
    /// Returns the viewer.
    pub fn teardown(self) -> V {
        let SearchSession {
            link,
            worker,
            mut viewport,
            mut hint,
            ..
        } = self;
        viewport.clear();
        if let Some(hint) = hint.as_mut() {
            hint.teardown();
        }
        drop(link);
        if let Some(worker) = worker {
            worker.join();
        }
        viewport.into_viewer()
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    /// Commit match `index`: select it and frame it in the viewer.
    fn jump_to(&mut self, index: usize) -> bool {
        let Some(fragment) = self.matches.get(index).cloned() else {
            return false;
        };
        self.active_index = index;
        self.selected = Some(fragment.id.clone());
        self.viewport.focus(&fragment.bbox);
        true
    }

    fn try_autocommit(&mut self) {
        if self
            .deeplink
            .take_commit(!self.matches.is_empty(), self.viewport.is_ready())
        {
            debug!("auto-committing first deep-link match");
            self.jump_to(0);
        }
    }
}

impl<V: Viewer + std::fmt::Debug> std::fmt::Debug for SearchSession<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("panel", &self.panel)
            .field("query", &self.query)
            .field("latest_request_id", &self.latest_request_id)
            .field("matches", &self.matches.len())
            .field("active_index", &self.active_index)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}
