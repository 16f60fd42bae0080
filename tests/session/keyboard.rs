//! Global shortcuts and pointer rules.

use crate::common::*;
use chronicle::{Key, KeyOutcome, KeyTarget, PanelState};

fn session() -> Session {
    manual_session(timeline_source(), page(None)).0
}

#[test]
fn test_slash_opens_only_when_not_typing() {
    let mut s = session();
    assert_eq!(s.handle_key(Key::Char('/'), KeyTarget::OtherTextField), KeyOutcome::Ignored);
    assert_eq!(s.panel(), PanelState::Closed);

    assert_eq!(s.handle_key(Key::Char('/'), KeyTarget::Page), KeyOutcome::Handled);
    assert_eq!(s.panel(), PanelState::OpenFocused);

    // Typing a slash into the search box is just text
    assert_eq!(s.handle_key(Key::Char('/'), KeyTarget::SearchInput), KeyOutcome::Ignored);
}

#[test]
fn test_escape_closes_from_anywhere_without_claiming_the_key() {
    for target in [KeyTarget::SearchInput, KeyTarget::OtherTextField, KeyTarget::Page] {
        let mut s = session();
        s.open();
        assert_eq!(s.handle_key(Key::Escape, target), KeyOutcome::Ignored);
        assert_eq!(s.panel(), PanelState::Closed);
    }
}

#[test]
fn test_match_keys_are_text_while_typing() {
    let mut s = session();
    assert_eq!(s.handle_key(Key::Char('n'), KeyTarget::SearchInput), KeyOutcome::Ignored);
    assert_eq!(s.handle_key(Key::Char('p'), KeyTarget::OtherTextField), KeyOutcome::Ignored);
}

#[test]
fn test_arrows_and_enter_only_act_in_the_search_input() {
    let mut s = session();
    assert_eq!(s.handle_key(Key::ArrowDown, KeyTarget::Page), KeyOutcome::Ignored);
    assert_eq!(s.handle_key(Key::Enter, KeyTarget::Page), KeyOutcome::Ignored);
    // No matches yet, so nothing to move or commit
    assert_eq!(s.handle_key(Key::ArrowDown, KeyTarget::SearchInput), KeyOutcome::Ignored);
    assert_eq!(s.handle_key(Key::Enter, KeyTarget::SearchInput), KeyOutcome::Ignored);
}

#[test]
fn test_toggle_button() {
    let mut s = session();
    s.toggle();
    assert_eq!(s.panel(), PanelState::OpenFocused);
    s.blur_input();
    assert_eq!(s.panel(), PanelState::OpenUnfocused);
    s.toggle();
    assert_eq!(s.panel(), PanelState::Closed);
}

#[test]
fn test_pointer_outside_closes_inside_keeps() {
    let mut s = session();
    s.open();
    s.pointer_down(true);
    assert_eq!(s.panel(), PanelState::OpenFocused);
    s.pointer_down(false);
    assert_eq!(s.panel(), PanelState::Closed);
}

#[test]
fn test_focusing_input_opens_panel() {
    let mut s = session();
    s.focus_input();
    assert_eq!(s.panel(), PanelState::OpenFocused);
    // Blur while closed stays closed
    s.close();
    s.blur_input();
    assert_eq!(s.panel(), PanelState::Closed);
}

#[test]
fn test_suggestions_hidden_without_query_or_focus() {
    let mut s = session();
    s.open();
    assert!(!s.suggestions_visible());
    s.set_query("meiji");
    assert!(s.suggestions_visible());
    s.blur_input();
    assert!(!s.suggestions_visible());
    assert_eq!(s.active_descendant(), None);
}

#[test]
fn test_dom_key_names() {
    assert_eq!(Key::from_dom("Escape"), Some(Key::Escape));
    assert_eq!(Key::from_dom("Enter"), Some(Key::Enter));
    assert_eq!(Key::from_dom("p"), Some(Key::Char('p')));
    assert_eq!(Key::from_dom("PageDown"), None);
}
