// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Core data types: fragments, bounding boxes, tiers.
//!
//! A [`Fragment`] is the unit everything else revolves around. It is one piece
//! of OCR text (a whole line, or a single word) pinned to a rectangle in the
//! source image. The JSON shape is shared with the offline ingestion tool and
//! the browser worker, so serde attributes here are a wire contract:
//!
//! ```json
//! { "id": "word-1:2:1:3-4", "text": "Meiji", "norm": "meiji",
//!   "context": "Meiji Restoration 1868", "bbox": [120, 480, 64, 22],
//!   "conf": 0.93, "kind": "word" }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned rectangle in source-image pixel space.
///
/// Serialized as a `[x, y, width, height]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Centre point `(cx, cy)`.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Inclusive point containment (edges count as inside).
    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BBox) -> BBox {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        BBox::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Non-negative origin and strictly positive extent.
    pub fn is_well_formed(&self) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.width > 0.0 && self.height > 0.0
    }
}

impl From<[f64; 4]> for BBox {
    fn from([x, y, width, height]: [f64; 4]) -> Self {
        BBox::new(x, y, width, height)
    }
}

impl From<BBox> for [f64; 4] {
    fn from(b: BBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

/// Fragment granularity. Doubles as the corpus tier a fragment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentKind {
    /// One per OCR text line. Small tier, loaded eagerly.
    Line,
    /// One per token that survives the length filter. Large tier, loaded lazily.
    Word,
}

/// Corpus tiers are exactly the fragment kinds.
pub type Tier = FragmentKind;

impl FragmentKind {
    pub const ALL: [FragmentKind; 2] = [FragmentKind::Line, FragmentKind::Word];

    pub fn as_str(&self) -> &'static str {
        match self {
            FragmentKind::Line => "line",
            FragmentKind::Word => "word",
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One spatially-anchored OCR text unit.
///
/// `norm` is computed once at ingestion time with [`crate::normalize`] and
/// never recomputed at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub id: String,
    pub text: String,
    pub norm: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub bbox: BBox,
    pub conf: f64,
    pub kind: FragmentKind,
}

impl Fragment {
    /// Confidence as a whole percentage, the way suggestions display it.
    pub fn confidence_percent(&self) -> u32 {
        (self.conf.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}
