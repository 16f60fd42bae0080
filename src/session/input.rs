// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Keyboard and pointer rules.
//!
//! | Key          | Where                 | Effect                                  |
//! |--------------|-----------------------|-----------------------------------------|
//! | `/`          | not in a text field   | open the panel, focus the input         |
//! | `Escape`     | anywhere              | close the panel, blur the input         |
//! | `ArrowDown`  | search input          | next suggestion (wraps within visible)  |
//! | `ArrowUp`    | search input          | previous suggestion (wraps)             |
//! | `Enter`      | search input          | commit active suggestion, blur          |
//! | `n` / `p`    | not in a text field   | next/previous match (wraps within all)  |
//!
//! Arrow keys cycle through the dropdown only, so they wrap at the visible
//! count. `n`/`p` page through every match the index returned.

use super::{PanelState, SearchSession};
use crate::viewport::Viewer;

/// A key press, reduced to what the session cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    ArrowDown,
    ArrowUp,
    Enter,
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Option<Key> {
        match key {
            "Escape" => Some(Key::Escape),
            "ArrowDown" => Some(Key::ArrowDown),
            "ArrowUp" => Some(Key::ArrowUp),
            "Enter" => Some(Key::Enter),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

/// Where keyboard focus was when the key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    SearchInput,
    /// Any other input, textarea or contenteditable.
    OtherTextField,
    Page,
}

impl KeyTarget {
    pub fn is_typing(self) -> bool {
        matches!(self, KeyTarget::SearchInput | KeyTarget::OtherTextField)
    }
}

/// Whether the host should suppress the key's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
}

impl<V: Viewer> SearchSession<V> {
    /// Apply one key press.
    pub fn handle_key(&mut self, key: Key, target: KeyTarget) -> KeyOutcome {
        match key {
            Key::Escape => {
                self.close();
                KeyOutcome::Ignored
            }
            Key::Char('/') if !target.is_typing() => {
                self.open();
                KeyOutcome::Handled
            }
            Key::Char('n') if !target.is_typing() => self.cycle_match(true),
            Key::Char('p') if !target.is_typing() => self.cycle_match(false),
            Key::ArrowDown if target == KeyTarget::SearchInput => self.cycle_suggestion(true),
            Key::ArrowUp if target == KeyTarget::SearchInput => self.cycle_suggestion(false),
            Key::Enter if target == KeyTarget::SearchInput => self.commit_active(),
            _ => KeyOutcome::Ignored,
        }
    }

    fn cycle_suggestion(&mut self, forward: bool) -> KeyOutcome {
        let visible = self.visible_matches().len();
        if visible == 0 {
            return KeyOutcome::Ignored;
        }
        let base = self.active_suggestion_index();
        self.active_index = if forward {
            (base + 1) % visible
        } else {
            (base + visible - 1) % visible
        };
        KeyOutcome::Handled
    }

    fn cycle_match(&mut self, forward: bool) -> KeyOutcome {
        let total = self.matches.len();
        if total == 0 {
            return KeyOutcome::Ignored;
        }
        let current = self.active_index % total;
        let next = if forward {
            (current + 1) % total
        } else {
            (current + total - 1) % total
        };
        self.jump_to(next);
        KeyOutcome::Handled
    }

    fn commit_active(&mut self) -> KeyOutcome {
        if self.matches.is_empty() {
            return KeyOutcome::Ignored;
        }
        let index = self.active_suggestion_index();
        self.jump_to(index);
        self.blur_input();
        KeyOutcome::Handled
    }

    // =========================================================================
    // PANEL
    // =========================================================================

    /// Open the panel and focus the input. Starts the word tier.
    pub fn open(&mut self) {
        self.panel = PanelState::OpenFocused;
        self.request_word_tier();
    }

    /// Close the panel and drop input focus.
    pub fn close(&mut self) {
        self.panel = PanelState::Closed;
    }

    /// The search button: close when open, open when closed.
    pub fn toggle(&mut self) {
        if self.panel.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// The input gained focus (click, tab).
    pub fn focus_input(&mut self) {
        self.open();
    }

    /// The input lost focus; the panel stays open.
    pub fn blur_input(&mut self) {
        if self.panel == PanelState::OpenFocused {
            self.panel = PanelState::OpenUnfocused;
        }
    }

    /// A pointer went down somewhere on the page.
    pub fn pointer_down(&mut self, inside_search: bool) {
        if !inside_search {
            self.close();
        }
    }

    /// The pointer is over visible suggestion `index`.
    pub fn hover_suggestion(&mut self, index: usize) {
        if index < self.visible_matches().len() {
            self.active_index = index;
        }
    }

    /// Visible suggestion `index` was clicked.
    pub fn click_suggestion(&mut self, index: usize) {
        if index < self.visible_matches().len() {
            self.jump_to(index);
        }
    }
}
