//! Load errors, timers, hint and teardown.

use crate::common::*;
use chronicle::testing::StaticSource;
use chronicle::{
    ChronicleConfig, HeadlessViewer, JsonFileStore, SearchSession, Tier, LOAD_ERROR_MESSAGE,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
fn test_line_tier_failure_sets_error_once() {
    let source = StaticSource::new().failing(LINES, 503);
    let mut session = live_session(source, page(None));
    assert!(session.settle(WAIT));
    assert_eq!(session.error(), Some(LOAD_ERROR_MESSAGE));
    assert!(!session.corpus().is_loaded(Tier::Line));

    // Still usable, just empty
    session.set_query("meiji");
    assert!(session.settle(WAIT));
    assert!(session.matches().is_empty());
    assert_eq!(session.error(), Some(LOAD_ERROR_MESSAGE));
    session.teardown();
}

#[test]
fn test_missing_corpus_everywhere_is_an_error() {
    let mut session = live_session(StaticSource::new(), page(Some("meiji")));
    assert!(session.settle(WAIT));
    assert_eq!(session.error(), Some(LOAD_ERROR_MESSAGE));
    // The seed never fires without a line tier
    assert_eq!(session.query(), "");
    session.teardown();
}

#[test]
fn test_teardown_removes_highlight_and_stops_worker() {
    let mut session = live_session(timeline_source(), page(Some("edo")));
    session.viewer_ready();
    assert!(session.settle(WAIT));
    assert_eq!(session.viewer().overlay_count(), 1);

    let viewer = session.teardown();
    assert_eq!(viewer.overlay_count(), 0);
    assert_eq!(viewer.fits().len(), 1);
}

#[test]
fn test_highlight_expires_after_ttl() {
    let mut config = ChronicleConfig::default();
    config.session.highlight_ttl_ms = Some(2000);
    let mut session = SearchSession::new(
        &config,
        Arc::new(timeline_source()),
        HeadlessViewer::new(4000.0, 2000.0),
        page(Some("edo")),
    )
    .unwrap();
    session.viewer_ready();
    assert!(session.settle(WAIT));
    assert!(session.viewport().highlight().is_some());

    session.tick(Instant::now());
    assert!(session.viewport().highlight().is_some());
    session.tick(Instant::now() + Duration::from_secs(3));
    assert!(session.viewport().highlight().is_none());
    assert_eq!(session.viewer().overlay_count(), 0);
    // The selection survives the highlight
    assert!(session.selected().is_some());
    session.teardown();
}

#[test]
fn test_smooth_fit_by_default_immediate_when_configured() {
    let mut session = live_session(timeline_source(), page(Some("edo")));
    session.viewer_ready();
    assert!(session.settle(WAIT));
    assert_eq!(session.viewer().last_fit().map(|(_, now)| *now), Some(false));
    session.teardown();

    let mut config = ChronicleConfig::default();
    config.session.smooth_fit = false;
    let mut session = SearchSession::new(
        &config,
        Arc::new(timeline_source()),
        HeadlessViewer::new(4000.0, 2000.0),
        page(Some("edo")),
    )
    .unwrap();
    session.viewer_ready();
    assert!(session.settle(WAIT));
    assert_eq!(session.viewer().last_fit().map(|(_, now)| *now), Some(true));
    session.teardown();
}

#[test]
fn test_focus_maps_bbox_into_viewport_space() {
    let mut session = live_session(timeline_source(), page(Some("edo castle")));
    session.viewer_ready();
    assert!(session.settle(WAIT));

    // line-2 sits at (100, 160) 800x40 on a 4000px-wide scan
    let rect = session.viewport().highlight().unwrap().rect;
    assert!((rect.x - 0.025).abs() < 1e-9);
    assert!((rect.y - 0.04).abs() < 1e-9);
    assert!((rect.width - 0.2).abs() < 1e-9);
    assert!((rect.height - 0.01).abs() < 1e-9);
    session.teardown();
}

#[test]
fn test_hint_dismissal_survives_remount() {
    let dir = tempfile::tempdir().unwrap();
    let flags = dir.path().join("flags.json");
    let config = ChronicleConfig::default();

    let mut session = live_session(timeline_source(), page(None));
    session.attach_hint(Box::new(JsonFileStore::new(&flags)), &config);
    assert!(session.hint().unwrap().is_visible());
    session.dismiss_hint();
    assert!(!session.hint().unwrap().is_visible());
    session.teardown();

    let mut session = live_session(timeline_source(), page(None));
    session.attach_hint(Box::new(JsonFileStore::new(&flags)), &config);
    assert!(!session.hint().unwrap().is_visible());
    session.teardown();
}

#[test]
fn test_hint_hides_on_tick_after_timeout() {
    let mut session = live_session(timeline_source(), page(None));
    session.attach_hint(
        Box::new(chronicle::MemoryFlagStore::new()),
        &ChronicleConfig::default(),
    );
    session.tick(Instant::now() + Duration::from_secs(9));
    assert!(!session.hint().unwrap().is_visible());
    session.teardown();
}
