// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Suggestion text helpers: context windows and element ids.

use crate::util::{first_token_with_len, normalize_with_origins};

/// Ellipsis marker for clipped snippets.
pub const ELLIPSIS: &str = "...";

/// Shortest query token worth centring a snippet on.
const MIN_ANCHOR_CHARS: usize = 2;

/// Clip `text` to `budget` characters around the first useful query token.
///
/// Text that fits is returned as-is. Otherwise the first token of
/// `normalized_query` with at least two characters is located in the
/// normalized text and mapped back to its position in `text`. A
/// `budget`-wide window is centred there, with [`ELLIPSIS`] on each clipped
/// side. No token, or a token that does not
/// occur, falls back to a prefix plus a trailing ellipsis.
///
/// All lengths are in characters, never bytes.
pub fn clip_context(text: &str, normalized_query: &str, budget: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= budget {
        return text.to_string();
    }

    let prefix_clip = || {
        let head: String = chars[..budget].iter().collect();
        format!("{}{ELLIPSIS}", head.trim_end())
    };

    let Some(token) = first_token_with_len(normalized_query, MIN_ANCHOR_CHARS) else {
        return prefix_clip();
    };
    // The token is found in normalized text; the window is cut from the raw
    // text, so map the hit back through the per-char origins
    let (normalized, origins) = normalize_with_origins(text);
    let Some(index) = find_chars(&normalized, token).and_then(|i| origins.get(i).copied()) else {
        return prefix_clip();
    };

    let token_len = token.chars().count();
    let start = index
        .saturating_sub(budget.saturating_sub(token_len) / 2)
        .min(chars.len());
    let end = chars.len().min(start + budget);

    let window: String = chars[start..end].iter().collect();
    let prefix = if start > 0 { ELLIPSIS } else { "" };
    let suffix = if end < chars.len() { ELLIPSIS } else { "" };
    format!("{prefix}{}{suffix}", window.trim())
}

/// Character offset of the first occurrence of `needle` in `haystack`.
fn find_chars(haystack: &str, needle: &str) -> Option<usize> {
    let byte = haystack.find(needle)?;
    Some(haystack[..byte].chars().count())
}

/// Element id for a suggestion: `suggestion-` plus the fragment id with
/// every character outside `[A-Za-z0-9_-]` replaced by `-`.
pub fn suggestion_dom_id(id: &str) -> String {
    let safe: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("suggestion-{safe}")
}
