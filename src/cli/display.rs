// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the chronicle CLI.
//!
//! Report output is colored by [`Tone`] (what the text means), and each
//! tone maps to OneDark on dark terminals or One Light on light ones. The
//! background comes from `CHRONICLE_THEME`, then `COLORFGBG`, else dark.
//! `NO_COLOR` and non-TTY stdout turn every helper here into plain text so
//! the output pipes cleanly into `grep`.
//!
//! OCR text is full of CJK and accented characters, so every width and
//! truncation helper counts chars, never bytes.

use chronicle::FragmentKind;
use std::sync::OnceLock;

/// Width between the `│` borders.
pub const BOX_WIDTH: usize = 80;

// ═══════════════════════════════════════════════════════════════════════════
// BACKGROUND
// ═══════════════════════════════════════════════════════════════════════════

/// Terminal background. Picks the palette; never affects layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Dark,
    Light,
}

impl Background {
    /// `CHRONICLE_THEME=light|dark`.
    fn from_override(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" | "l" => Some(Self::Light),
            "dark" | "d" => Some(Self::Dark),
            _ => None,
        }
    }

    /// `COLORFGBG` as set by rxvt and friends: `fg;bg` or `fg;default;bg`.
    /// The last field is an ANSI color index; 7 and 9-15 are light.
    fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        Some(match bg {
            7 | 9..=15 => Self::Light,
            _ => Self::Dark,
        })
    }

    fn detect() -> Self {
        std::env::var("CHRONICLE_THEME")
            .ok()
            .and_then(|v| Self::from_override(&v))
            .or_else(|| {
                std::env::var("COLORFGBG")
                    .ok()
                    .and_then(|v| Self::from_colorfgbg(&v))
            })
            .unwrap_or(Self::Dark)
    }
}

static BACKGROUND: OnceLock<Background> = OnceLock::new();

pub fn background() -> Background {
    *BACKGROUND.get_or_init(Background::detect)
}

// ═══════════════════════════════════════════════════════════════════════════
// TONES
// ═══════════════════════════════════════════════════════════════════════════

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

/// What a piece of report output means. Each tone has one color per
/// background (OneDark on dark terminals, One Light on light ones).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Box borders and rules.
    Frame,
    /// Section titles, the active marker, matched text.
    Heading,
    /// Line fragments.
    Line,
    /// Word fragments.
    Word,
    /// Confidence 90% and up.
    Strong,
    Good,
    Fair,
    Poor,
    /// Field labels and secondary context.
    Muted,
}

impl Tone {
    fn rgb(self, background: Background) -> (u8, u8, u8) {
        use Background::{Dark, Light};
        match (self, background) {
            (Tone::Frame | Tone::Muted, Dark) => (92, 99, 112),
            (Tone::Frame | Tone::Muted, Light) => (160, 161, 167),
            (Tone::Heading, Dark) => (86, 182, 194),
            (Tone::Heading, Light) => (1, 132, 188),
            (Tone::Line, Dark) => (97, 175, 239),
            (Tone::Line, Light) => (64, 120, 242),
            (Tone::Word, Dark) => (198, 120, 221),
            (Tone::Word, Light) => (166, 38, 164),
            (Tone::Strong, Dark) => (166, 226, 46),
            (Tone::Strong, Light) => (68, 140, 39),
            (Tone::Good, Dark) => (152, 195, 121),
            (Tone::Good, Light) => (80, 161, 79),
            (Tone::Fair, Dark) => (229, 192, 123),
            (Tone::Fair, Light) => (193, 132, 1),
            (Tone::Poor, Dark) => (224, 108, 117),
            (Tone::Poor, Light) => (228, 86, 73),
        }
    }

    /// 24-bit foreground escape for this tone on `background`.
    fn escape_on(self, background: Background) -> String {
        let (r, g, b) = self.rgb(background);
        format!("\x1b[38;2;{};{};{}m", r, g, b)
    }

    fn escape(self) -> String {
        self.escape_on(background())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CORE UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// `text` in `tone` plus modifiers, or plain `text` when colors are off.
pub fn paint(tone: Tone, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), tone.escape(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Border escape, or nothing when colors are off.
fn frame() -> (String, &'static str) {
    if use_colors() {
        (Tone::Frame.escape(), RESET)
    } else {
        (String::new(), "")
    }
}

/// Display width in chars, ignoring ANSI escapes.
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

pub fn pad_left(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", " ".repeat(width - visible), s)
    }
}

pub fn pad_right(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visible))
    }
}

/// Cut plain text to `max_chars`, ending in `...` when something was dropped.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

/// │ content          │
pub fn row(content: &str) {
    let (on, off) = frame();
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    println!("{on}│{off}{content}{}{on}│{off}", " ".repeat(pad));
}

/// │ label        value │ with the label column aligned.
pub fn field(label: &str, value: &str) {
    let label = paint(Tone::Muted, &[], &pad_right(label, 18));
    row(&format!(" {}{}", label, value));
}

fn section_rule(left: char, right: char, label: &str) {
    let (on, off) = frame();
    let title = format!("─ {} ", paint(Tone::Heading, &[BOLD], label));
    let rest = "─".repeat(BOX_WIDTH.saturating_sub(visible_len(&title)));
    println!("{on}{left}{off}{title}{on}{rest}{right}{off}");
}

/// ┌─ LABEL ──────────┐
pub fn section_top(label: &str) {
    section_rule('┌', '┐', label);
}

/// ├─ LABEL ──────────┤
pub fn section_mid(label: &str) {
    section_rule('├', '┤', label);
}

/// └──────────────────┘
pub fn section_bot() {
    let (on, off) = frame();
    println!("{on}└{}┘{off}", "─".repeat(BOX_WIDTH));
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// `[line]` / `[word]`, colored per kind.
pub fn kind_label(kind: FragmentKind) -> String {
    let tone = match kind {
        FragmentKind::Line => Tone::Line,
        FragmentKind::Word => Tone::Word,
    };
    paint(tone, &[], &format!("[{}]", kind))
}

/// Tone for an OCR confidence percentage.
fn confidence_tone(percent: u32) -> Tone {
    match percent {
        90.. => Tone::Strong,
        70..=89 => Tone::Good,
        40..=69 => Tone::Fair,
        _ => Tone::Poor,
    }
}

/// OCR confidence as a right-aligned percentage.
pub fn confidence_badge(percent: u32) -> String {
    paint(confidence_tone(percent), &[], &format!("{:>3}%", percent))
}

/// Loaded / missing marker for a corpus tier.
pub fn tier_status(loaded: bool) -> String {
    if loaded {
        paint(Tone::Good, &[BOLD], "loaded")
    } else {
        paint(Tone::Poor, &[BOLD], "missing")
    }
}

/// Elapsed milliseconds; anything past a quarter second reads as slow.
pub fn timing_ms(value: f64) -> String {
    let tone = if value < 50.0 {
        Tone::Good
    } else if value < 250.0 {
        Tone::Fair
    } else {
        Tone::Poor
    };
    paint(tone, &[], &format!("{:.1} ms", value))
}

/// Marker for the active suggestion row.
pub fn active_marker(active: bool) -> String {
    if active {
        paint(Tone::Heading, &[BOLD], "▸")
    } else {
        " ".to_string()
    }
}
