//! `n`/`p` page through every match; arrow keys wrap inside the dropdown.

use crate::common::*;
use chronicle::testing::StaticSource;
use chronicle::{Key, KeyOutcome, KeyTarget, PanelState, Tier};

/// Session showing `count` harbor matches, viewer ready.
fn with_matches(count: usize) -> Session {
    let lines = harbor_lines(count);
    let ids: Vec<String> = lines.iter().map(|f| f.id.clone()).collect();
    let (mut session, end) = manual_session(StaticSource::new().with(LINES, lines), page(None));
    session.viewer_ready();
    session.open();
    wait_for_tier(&mut session, Tier::Line);
    wait_for_tier(&mut session, Tier::Word);

    session.set_query("harbor");
    let (id, _) = next_query(&end);
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    reply(&end, id, &refs);
    drain(&mut session);
    assert_eq!(session.match_count(), count);
    session
}

fn press(session: &mut Session, c: char) -> KeyOutcome {
    session.handle_key(Key::Char(c), KeyTarget::Page)
}

fn selected_id(session: &Session) -> Option<String> {
    session.selected().map(|f| f.id.clone())
}

#[test]
fn test_next_wraps_from_last_to_first() {
    let mut session = with_matches(5);
    for _ in 0..4 {
        assert_eq!(press(&mut session, 'n'), KeyOutcome::Handled);
    }
    assert_eq!(session.active_index(), 4);
    assert_eq!(selected_id(&session).as_deref(), Some("harbor-4"));

    press(&mut session, 'n');
    assert_eq!(session.active_index(), 0);
    assert_eq!(selected_id(&session).as_deref(), Some("harbor-0"));
}

#[test]
fn test_previous_wraps_from_first_to_last() {
    let mut session = with_matches(5);
    assert_eq!(session.active_index(), 0);
    press(&mut session, 'p');
    assert_eq!(session.active_index(), 4);
    assert_eq!(selected_id(&session).as_deref(), Some("harbor-4"));
}

#[test]
fn test_each_jump_replaces_the_highlight() {
    let mut session = with_matches(3);
    press(&mut session, 'n');
    press(&mut session, 'n');
    assert_eq!(session.viewer().overlay_count(), 1);
    assert_eq!(session.viewer().fits().len(), 2);
    let highlight = session.viewport().highlight().unwrap();
    assert_eq!(highlight.bbox, session.matches()[2].bbox);
}

#[test]
fn test_cycling_with_no_matches_is_ignored() {
    let (mut session, _end) = manual_session(timeline_source(), page(None));
    assert_eq!(press(&mut session, 'n'), KeyOutcome::Ignored);
    assert_eq!(press(&mut session, 'p'), KeyOutcome::Ignored);
    assert!(session.selected().is_none());
}

#[test]
fn test_match_cycling_covers_matches_beyond_the_dropdown() {
    let mut session = with_matches(12);
    assert_eq!(session.visible_matches().len(), 10);
    for _ in 0..10 {
        press(&mut session, 'n');
    }
    assert_eq!(session.active_index(), 10);
    assert_eq!(selected_id(&session).as_deref(), Some("harbor-10"));
    // The dropdown highlight clamps to its last row
    assert_eq!(session.active_suggestion_index(), 9);
}

#[test]
fn test_arrow_keys_wrap_within_visible_suggestions() {
    let mut session = with_matches(12);
    let down = |s: &mut Session| s.handle_key(Key::ArrowDown, KeyTarget::SearchInput);

    for _ in 0..9 {
        down(&mut session);
    }
    assert_eq!(session.active_suggestion_index(), 9);
    down(&mut session);
    assert_eq!(session.active_suggestion_index(), 0);

    session.handle_key(Key::ArrowUp, KeyTarget::SearchInput);
    assert_eq!(session.active_suggestion_index(), 9);
    // Arrows only move the marker
    assert!(session.selected().is_none());
}

#[test]
fn test_arrow_down_from_clamped_index_wraps_to_first() {
    let mut session = with_matches(12);
    for _ in 0..11 {
        press(&mut session, 'n');
    }
    assert_eq!(session.active_index(), 11);
    session.handle_key(Key::ArrowDown, KeyTarget::SearchInput);
    assert_eq!(session.active_index(), 0);
}

#[test]
fn test_enter_commits_active_suggestion_and_blurs() {
    let mut session = with_matches(5);
    session.handle_key(Key::ArrowDown, KeyTarget::SearchInput);
    session.handle_key(Key::ArrowDown, KeyTarget::SearchInput);

    let outcome = session.handle_key(Key::Enter, KeyTarget::SearchInput);
    assert_eq!(outcome, KeyOutcome::Handled);
    assert_eq!(selected_id(&session).as_deref(), Some("harbor-2"));
    assert_eq!(session.panel(), PanelState::OpenUnfocused);
    assert!(!session.suggestions_visible());
}

#[test]
fn test_hover_marks_and_click_commits() {
    let mut session = with_matches(5);
    session.hover_suggestion(3);
    assert_eq!(session.active_suggestion_index(), 3);
    assert!(session.selected().is_none());
    assert_eq!(
        session.active_descendant(),
        Some(session.suggestions()[3].dom_id.clone())
    );

    session.click_suggestion(1);
    assert_eq!(selected_id(&session).as_deref(), Some("harbor-1"));
    assert_eq!(session.active_index(), 1);

    // Out of range does nothing
    session.hover_suggestion(40);
    session.click_suggestion(40);
    assert_eq!(session.active_index(), 1);
}

#[test]
fn test_new_query_resets_active_index() {
    let mut session = with_matches(5);
    press(&mut session, 'n');
    press(&mut session, 'n');
    session.set_query("harbor view");
    assert_eq!(session.active_index(), 0);
}
