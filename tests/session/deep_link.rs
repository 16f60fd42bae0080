//! `?q=` seeding, one-shot auto-commit and URL rewriting.

use crate::common::*;
use chronicle::testing::StaticSource;
use chronicle::Tier;

#[test]
fn test_seeded_query_commits_first_match_once() {
    let mut session = live_session(timeline_source(), page(Some("Meiji")));
    session.viewer_ready();
    assert!(session.settle(WAIT));

    assert_eq!(session.normalized_query(), "meiji");
    assert_eq!(session.url().as_str(), "https://timeline.example/?q=meiji");
    let selected = session.selected().expect("seeded match committed");
    assert!(selected.norm.contains("meiji"));
    assert_eq!(session.viewer().overlay_count(), 1);
    // The word tier re-ran the query; that must not commit again
    assert!(session.corpus().is_loaded(Tier::Word));
    assert_eq!(session.viewer().fits().len(), 1);
    session.teardown();
}

#[test]
fn test_commit_waits_for_viewer() {
    let mut session = live_session(timeline_source(), page(Some("edo castle")));
    assert!(session.settle(WAIT));
    assert!(!session.matches().is_empty());
    assert!(session.selected().is_none());
    assert!(session.viewer().fits().is_empty());

    session.viewer_ready();
    assert_eq!(session.selected().map(|f| f.id.as_str()), Some("line-2"));
    assert_eq!(session.viewer().fits().len(), 1);

    session.viewer_ready();
    assert_eq!(session.viewer().fits().len(), 1);
    session.teardown();
}

#[test]
fn test_seed_waits_for_line_tier() {
    let source = StaticSource::new()
        .with(LINES, timeline_lines())
        .delayed(LINES, std::time::Duration::from_millis(50));
    let (mut session, _end) = manual_session(source, page(Some("edo")));
    assert_eq!(session.query(), "");
    wait_for_tier(&mut session, Tier::Line);
    assert_eq!(session.query(), "edo");
}

#[test]
fn test_no_query_param_means_no_seed() {
    let mut session = live_session(timeline_source(), page(None));
    session.viewer_ready();
    assert!(session.settle(WAIT));
    assert_eq!(session.query(), "");
    assert!(session.selected().is_none());
    assert_eq!(session.url().as_str(), "https://timeline.example/");
    session.teardown();
}

#[test]
fn test_url_tracks_normalized_query_and_keeps_other_params() {
    let url = url::Url::parse("https://timeline.example/scan?year=1868#top").unwrap();
    let (mut session, _end) = manual_session(timeline_source(), url);

    session.set_query("  Edo   CASTLE! ");
    assert_eq!(
        session.url().as_str(),
        "https://timeline.example/scan?year=1868&q=edo+castle#top"
    );
    session.set_query("");
    assert_eq!(session.url().as_str(), "https://timeline.example/scan?year=1868#top");
}

#[test]
fn test_rewritten_url_seeds_an_identical_session() {
    let (mut first, _end) = manual_session(timeline_source(), page(None));
    first.set_query("Tokugawa Shogunate");
    let shared = first.url().clone();

    let mut second = live_session(timeline_source(), shared);
    assert!(second.settle(WAIT));
    assert_eq!(second.normalized_query(), first.normalized_query());
    assert_eq!(second.matches()[0].id, "line-4");
    second.teardown();
}
