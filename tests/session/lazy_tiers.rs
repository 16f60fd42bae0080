//! The word tier loads on first search intent, exactly once.

use crate::common::*;
use chronicle::testing::StaticSource;
use chronicle::Tier;
use std::sync::Arc;

#[test]
fn test_word_tier_waits_for_intent() {
    let source = Arc::new(timeline_source());
    let (mut session, _end) = manual_session(Arc::clone(&source), page(None));
    wait_for_tier(&mut session, Tier::Line);
    drain(&mut session);
    assert_eq!(source.fetch_count(WORDS), 0);

    // One character is not enough to count as intent
    session.set_query("m");
    drain(&mut session);
    assert_eq!(source.fetch_count(WORDS), 0);
    assert!(!session.corpus().is_loaded(Tier::Word));

    session.set_query("me");
    wait_for_tier(&mut session, Tier::Word);
    assert_eq!(source.fetch_count(WORDS), 1);
}

#[test]
fn test_opening_the_panel_counts_as_intent() {
    let source = Arc::new(timeline_source());
    let (mut session, _end) = manual_session(Arc::clone(&source), page(None));
    session.open();
    wait_for_tier(&mut session, Tier::Word);
    assert_eq!(source.fetch_count(WORDS), 1);
}

#[test]
fn test_repeated_triggers_fetch_and_install_once() {
    let source = Arc::new(timeline_source());
    let mut session = live_session(Arc::clone(&source), page(None));
    session.open();
    session.toggle();
    session.toggle();
    session.focus_input();
    session.set_query("meiji");
    session.set_query("meiji restoration");
    assert!(session.settle(WAIT));

    assert_eq!(source.fetch_count(LINES), 1);
    assert_eq!(source.fetch_count(WORDS), 1);
    let corpus = session.corpus();
    assert_eq!(corpus.len(), timeline_lines().len() + timeline_words().len());
    assert!(corpus.duplicate_ids().is_empty());

    // Results carry each fragment at most once
    let mut ids = match_ids(&session);
    let before = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), before);
    session.teardown();
}

#[test]
fn test_legacy_corpus_is_fetched_once_for_both_tiers() {
    let mut entries = timeline_lines();
    entries.extend(timeline_words());
    let source = Arc::new(StaticSource::new().with(LEGACY, entries));
    let mut session = live_session(Arc::clone(&source), page(None));
    wait_for_tier(&mut session, Tier::Line);
    assert_eq!(session.corpus().len(), timeline_lines().len());

    session.set_query("meiji");
    assert!(session.settle(WAIT));
    assert_eq!(session.corpus().len(), 8);
    assert_eq!(source.fetch_count(LEGACY), 1);
    assert_eq!(source.fetch_count(WORDS), 0);
    assert!(match_ids(&session).contains(&"word-1".to_string()));
    session.teardown();
}

#[test]
fn test_word_tier_failure_degrades_to_lines() {
    let source = StaticSource::new()
        .with(LINES, timeline_lines())
        .failing(WORDS, 500);
    let mut session = live_session(source, page(None));
    session.set_query("meiji");
    assert!(session.settle(WAIT));

    assert_eq!(session.error(), None);
    assert!(session.corpus().is_loaded(Tier::Word));
    let mut ids = match_ids(&session);
    ids.sort();
    assert_eq!(ids, ["line-1", "line-3"]);
    session.teardown();
}

#[test]
fn test_query_typed_before_load_is_answered_after() {
    let source = timeline_source().delayed(LINES, std::time::Duration::from_millis(30));
    let mut session = live_session(source, page(None));
    session.set_query("edo castle");
    assert!(session.settle(WAIT));
    assert_eq!(match_ids(&session), ["line-2"]);
    session.teardown();
}
