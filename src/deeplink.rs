// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Deep links: the search query lives in the page URL as `?q=`.
//!
//! Two directions:
//! - **Out**: every query change rewrites `q` in place to the normalized
//!   query (or drops it when empty). Other parameters and the fragment are
//!   left alone. No navigation, no history entry; the host just reads
//!   [`DeepLink::url`] back.
//! - **In**: the `q` present at load time seeds the session once the corpus
//!   is there, and the first non-empty result set for it is auto-committed.
//!   Both halves are one-shot.

use url::Url;

/// Query-string parameter carrying the search.
pub const QUERY_PARAM: &str = "q";

#[derive(Debug, Clone)]
pub struct DeepLink {
    url: Url,
    initial: Option<String>,
    seeded: bool,
    pending_commit: bool,
}

impl DeepLink {
    /// Track `url`, remembering the `q` it was loaded with.
    pub fn new(url: Url) -> Self {
        let initial = read_query(&url).filter(|q| !q.is_empty());
        Self {
            url,
            initial,
            seeded: false,
            pending_commit: false,
        }
    }

    /// Current page URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Current value of `q`, if present.
    pub fn query(&self) -> Option<String> {
        read_query(&self.url)
    }

    /// The load-time query, handed out exactly once. Taking it arms the
    /// auto-commit.
    pub fn take_seed(&mut self) -> Option<String> {
        if self.seeded {
            return None;
        }
        self.seeded = true;
        let seed = self.initial.clone()?;
        self.pending_commit = true;
        Some(seed)
    }

    pub fn is_commit_pending(&self) -> bool {
        self.pending_commit
    }

    /// Whether the seeded query's first match should be committed now.
    /// Returns `true` at most once.
    pub fn take_commit(&mut self, has_matches: bool, viewer_ready: bool) -> bool {
        if self.pending_commit && has_matches && viewer_ready {
            self.pending_commit = false;
            return true;
        }
        false
    }

    /// Rewrite `q` to `normalized`, or remove it when empty.
    pub fn write_query(&mut self, normalized: &str) {
        let kept: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(key, _)| key != QUERY_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        if kept.is_empty() && normalized.is_empty() {
            self.url.set_query(None);
            return;
        }

        let mut pairs = self.url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        if !normalized.is_empty() {
            pairs.append_pair(QUERY_PARAM, normalized);
        }
    }
}

fn read_query(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
}
