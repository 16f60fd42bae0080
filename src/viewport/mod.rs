// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Viewport coordination: turning a selected fragment into a camera move.
//!
//! The deep-zoom viewer itself (tiles, animation, constraints) lives outside
//! this crate behind the [`Viewer`] trait. What lives here is the policy:
//!
//! - focus is dropped, not queued, until the viewer reports ready
//! - there is at most one highlight overlay, ever; every focus removes the
//!   previous one before adding the next
//! - an optional TTL clears the highlight on its own
//!
//! [`HeadlessViewer`] implements the trait with OpenSeadragon's coordinate
//! convention (image width maps to 1.0) and records what it was asked to do,
//! which is all the CLI and the tests need.

use crate::types::BBox;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Rectangle in the viewer's normalized viewport space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Handle to an overlay the viewer has drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayId(pub u64);

/// The image viewer collaborator.
pub trait Viewer {
    /// Map an image-pixel rectangle into viewport space.
    fn image_to_viewport(&self, bbox: &BBox) -> ViewportRect;

    /// Pan/zoom so `rect` is in view, within the viewer's own constraints.
    fn fit_bounds(&mut self, rect: ViewportRect, immediately: bool);

    fn add_overlay(&mut self, rect: ViewportRect) -> OverlayId;

    /// Remove an overlay. Unknown ids are ignored.
    fn remove_overlay(&mut self, id: OverlayId);
}

/// The single live highlight.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub overlay: OverlayId,
    pub bbox: BBox,
    pub rect: ViewportRect,
    pub expires_at: Option<Instant>,
}

/// Owns the highlight and applies focus policy on top of a [`Viewer`].
#[derive(Debug)]
pub struct ViewportCoordinator<V: Viewer> {
    viewer: V,
    ready: bool,
    highlight: Option<Highlight>,
    ttl: Option<Duration>,
    smooth: bool,
}

impl<V: Viewer> ViewportCoordinator<V> {
    pub fn new(viewer: V, ttl: Option<Duration>, smooth: bool) -> Self {
        Self {
            viewer,
            ready: false,
            highlight: None,
            ttl,
            smooth,
        }
    }

    /// The viewer finished loading its imagery.
    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Frame `bbox` and highlight it. Returns `false` when dropped because
    /// the viewer is not ready yet.
    pub fn focus(&mut self, bbox: &BBox) -> bool {
        if !self.ready {
            debug!("focus dropped, viewer not ready");
            return false;
        }

        self.clear();
        let rect = self.viewer.image_to_viewport(bbox);
        self.viewer.fit_bounds(rect, !self.smooth);
        let overlay = self.viewer.add_overlay(rect);
        self.highlight = Some(Highlight {
            overlay,
            bbox: *bbox,
            rect,
            expires_at: self.ttl.map(|ttl| Instant::now() + ttl),
        });
        true
    }

    /// Remove the highlight, if any. Safe to call repeatedly.
    pub fn clear(&mut self) {
        if let Some(highlight) = self.highlight.take() {
            self.viewer.remove_overlay(highlight.overlay);
        }
    }

    /// Expire the highlight if its TTL has passed.
    pub fn tick(&mut self, now: Instant) {
        let expired = self
            .highlight
            .as_ref()
            .and_then(|h| h.expires_at)
            .is_some_and(|deadline| now >= deadline);
        if expired {
            self.clear();
        }
    }

    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    pub fn into_viewer(self) -> V {
        self.viewer
    }
}

/// A viewer with no pixels: OpenSeadragon geometry plus a call log.
#[derive(Debug, Clone, Default)]
pub struct HeadlessViewer {
    image_width: f64,
    image_height: f64,
    overlays: BTreeMap<OverlayId, ViewportRect>,
    next_overlay: u64,
    fits: Vec<(ViewportRect, bool)>,
}

impl HeadlessViewer {
    pub fn new(image_width: f64, image_height: f64) -> Self {
        Self {
            image_width,
            image_height,
            ..Self::default()
        }
    }

    /// Image height in viewport units (width is always 1).
    pub fn aspect_height(&self) -> f64 {
        if self.image_width > 0.0 {
            self.image_height / self.image_width
        } else {
            0.0
        }
    }

    pub fn overlays(&self) -> impl Iterator<Item = (&OverlayId, &ViewportRect)> {
        self.overlays.iter()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Every fit request so far, as `(rect, immediately)`.
    pub fn fits(&self) -> &[(ViewportRect, bool)] {
        &self.fits
    }

    pub fn last_fit(&self) -> Option<&(ViewportRect, bool)> {
        self.fits.last()
    }
}

impl Viewer for HeadlessViewer {
    fn image_to_viewport(&self, bbox: &BBox) -> ViewportRect {
        if self.image_width <= 0.0 {
            return ViewportRect {
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
            };
        }
        let w = self.image_width;
        ViewportRect {
            x: bbox.x / w,
            y: bbox.y / w,
            width: bbox.width / w,
            height: bbox.height / w,
        }
    }

    fn fit_bounds(&mut self, rect: ViewportRect, immediately: bool) {
        self.fits.push((rect, immediately));
    }

    fn add_overlay(&mut self, rect: ViewportRect) -> OverlayId {
        self.next_overlay += 1;
        let id = OverlayId(self.next_overlay);
        self.overlays.insert(id, rect);
        id
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        self.overlays.remove(&id);
    }
}
