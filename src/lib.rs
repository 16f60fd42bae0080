// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy OCR search for a deep-zoom timeline scan.
//!
//! Type a few letters, get a ranked list of places on a very large image
//! where something like them was printed, pick one and the viewer flies
//! there and draws a box around it. The OCR is noisy, so matching is
//! approximate: a bounded edit distance over normalized text, scored the
//! way the browser viewer scores it.
//!
//! # Architecture
//!
//! ```text
//!  tesseract TSV ──► ingest ──► lines.json / words.json / entries.json
//!                                         │
//!                                         ▼
//!  ┌──────────────┐  TierLoad   ┌───────────────┐  Init/Query  ┌─────────────┐
//!  │ corpus       │────────────►│ session        │─────────────►│ worker      │
//!  │ (TierLoader, │             │ (SearchSession)│◄─────────────│ (FuzzyIndex)│
//!  │  Corpus)     │             └───────────────┘  QueryReply  └─────────────┘
//!  └──────────────┘               │     │     │
//!                          viewport  deeplink  hint
//! ```
//!
//! | Module     | Role                                                      |
//! |------------|-----------------------------------------------------------|
//! | `types`    | `Fragment`, `BBox`, `FragmentKind` (the wire format)      |
//! | `util`     | Query/fragment normalization                              |
//! | `fuzzy`    | Bounded substring edit distance with match runs           |
//! | `scoring`  | Field scores, weighted combination, ranking order         |
//! | `index`    | `FuzzyIndex` over a fragment snapshot                     |
//! | `worker`   | Index actor thread and its message protocol               |
//! | `corpus`   | Corpus sources, tiered lazy loading, merged store         |
//! | `session`  | Query lifecycle, keyboard/pointer rules, suggestions      |
//! | `viewport` | Fitting the camera and drawing the highlight overlay      |
//! | `deeplink` | `?q=` seeding and URL rewriting                           |
//! | `hint`     | First-visit keyboard hint with persistent dismissal       |
//! | `ingest`   | Offline TSV to corpus JSON                                |
//!
//! # Usage
//!
//! ```ignore
//! use chronicle::{open_source, ChronicleConfig, HeadlessViewer, SearchSession};
//!
//! let config = ChronicleConfig::default();
//! let source = open_source("public")?;
//! let page = url::Url::parse("https://timeline.example/?q=meiji")?;
//! let mut session = SearchSession::new(&config, source, HeadlessViewer::new(4000.0, 1200.0), page)?;
//! session.viewer_ready();
//! session.settle(std::time::Duration::from_secs(5));
//! for s in session.suggestions() {
//!     println!("{} ({}%)", s.text, s.confidence);
//! }
//! ```

pub mod config;
pub mod corpus;
pub mod deeplink;
pub mod error;
pub mod fuzzy;
pub mod hint;
pub mod index;
pub mod ingest;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod types;
pub mod util;
pub mod viewport;
pub mod worker;

pub mod testing;

pub use config::{ChronicleConfig, Endpoints, HintOptions, SearchOptions, SessionOptions};
pub use corpus::{open_source, Corpus, CorpusSource, DirSource, TierLoad, TierLoader};
pub use deeplink::DeepLink;
pub use error::{ConfigError, FetchError, IngestError, StoreError};
pub use hint::{FlagStore, HintBanner, JsonFileStore, MemoryFlagStore};
pub use index::FuzzyIndex;
pub use ingest::{run_ingest, IngestOptions, IngestSummary};
pub use session::{
    Key, KeyOutcome, KeyTarget, PanelState, SearchSession, Suggestion, LOAD_ERROR_MESSAGE,
};
pub use types::{BBox, Fragment, FragmentKind, Tier};
pub use util::normalize;
pub use viewport::{HeadlessViewer, Viewer, ViewportCoordinator, ViewportRect};
pub use worker::{IndexWorker, QueryReply, WorkerMessage};
