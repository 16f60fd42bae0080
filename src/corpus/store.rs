// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Set-once tier storage with a merged, id-addressable view.

use crate::types::{Fragment, FragmentKind, Tier};
use std::collections::HashMap;
use std::sync::Arc;

/// Loaded tiers plus the merged entry list the index is built from.
#[derive(Debug, Default)]
pub struct Corpus {
    lines: Option<Vec<Arc<Fragment>>>,
    words: Option<Vec<Arc<Fragment>>>,
    entries: Vec<Arc<Fragment>>,
    by_id: HashMap<String, Arc<Fragment>>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a tier. Returns `false` (and changes nothing) if it is
    /// already installed, so repeated loads can never duplicate fragments.
    pub fn install(&mut self, tier: Tier, fragments: Vec<Fragment>) -> bool {
        let slot = match tier {
            FragmentKind::Line => &mut self.lines,
            FragmentKind::Word => &mut self.words,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(fragments.into_iter().map(Arc::new).collect());
        self.rebuild_view();
        true
    }

    fn rebuild_view(&mut self) {
        self.entries = self
            .lines
            .iter()
            .chain(self.words.iter())
            .flatten()
            .cloned()
            .collect();

        self.by_id.clear();
        for fragment in &self.entries {
            // First occurrence wins; ids are unique by construction
            self.by_id
                .entry(fragment.id.clone())
                .or_insert_with(|| Arc::clone(fragment));
        }
    }

    pub fn is_loaded(&self, tier: Tier) -> bool {
        self.tier(tier).is_some()
    }

    /// Fragments of one tier, if installed.
    pub fn tier(&self, tier: Tier) -> Option<&[Arc<Fragment>]> {
        match tier {
            FragmentKind::Line => self.lines.as_deref(),
            FragmentKind::Word => self.words.as_deref(),
        }
    }

    /// Installed line fragments (empty before the line tier arrives).
    pub fn lines(&self) -> &[Arc<Fragment>] {
        self.lines.as_deref().unwrap_or(&[])
    }

    /// `lines ++ words`, in install-independent order.
    pub fn entries(&self) -> &[Arc<Fragment>] {
        &self.entries
    }

    /// Owned copies of every entry, for shipping to the index worker.
    pub fn snapshot(&self) -> Vec<Fragment> {
        self.entries.iter().map(|f| Fragment::clone(f)).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Fragment>> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids that appear more than once in the merged view, sorted.
    ///
    /// Always empty for well-formed inputs; used by `chronicle inspect`.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for fragment in &self.entries {
            *counts.entry(fragment.id.as_str()).or_default() += 1;
        }
        let mut dupes: Vec<String> = counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| id.to_string())
            .collect();
        dupes.sort();
        dupes
    }
}
