//! End-to-end widget tests driven through key events.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mentio_types::{CandidateSet, SuggestionItem, TagAttributes};
use mentio_tui::{SelectOutcome, TagInputConfig, TagInputState};
use serde_json::json;

fn fruit_items(query: &str) -> anyhow::Result<CandidateSet> {
    let all = ["Apple", "Banana", "Cherry"];
    let query = query.to_lowercase();
    Ok(CandidateSet::Flat(
        all.iter()
            .filter(|label| label.to_lowercase().contains(&query))
            .map(|label| SuggestionItem::new(label.to_lowercase(), *label))
            .collect(),
    ))
}

fn widget() -> TagInputState {
    TagInputState::new(TagInputConfig::default()).with_items(fruit_items)
}

fn press(state: &mut TagInputState, code: KeyCode) -> bool {
    state.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_str(state: &mut TagInputState, text: &str) {
    for c in text.chars() {
        press(state, KeyCode::Char(c));
    }
}

fn ctrl(state: &mut TagInputState, c: char) -> bool {
    state.handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

fn tag_values(state: &TagInputState) -> Vec<String> {
    state
        .get_tags()
        .into_iter()
        .map(|tag| tag.attrs.value)
        .collect()
}

#[test]
fn trigger_opens_session_and_keystrokes_refine_the_query() {
    let mut state = widget();
    assert!(!state.is_session_open());

    type_str(&mut state, "@");
    assert!(state.is_session_open());
    assert_eq!(state.session_query(), Some(""));
    assert_eq!(state.list.candidates().selectable().len(), 3);

    type_str(&mut state, "an");
    assert_eq!(state.session_query(), Some("an"));
    // "an" matches Banana only.
    assert_eq!(state.list.candidates().selectable().len(), 1);
}

#[test]
fn trigger_mid_word_does_not_open() {
    let mut state = widget();
    type_str(&mut state, "mail@");
    assert!(!state.is_session_open());

    // After a space the prefix rule is satisfied.
    type_str(&mut state, " @");
    assert!(state.is_session_open());
}

#[test]
fn whitespace_in_query_closes_the_session() {
    let mut state = widget();
    type_str(&mut state, "@ap");
    assert!(state.is_session_open());
    type_str(&mut state, " ");
    assert!(!state.is_session_open());
}

#[test]
fn enter_commits_the_highlighted_item_as_a_tag() {
    let mut state = widget();
    type_str(&mut state, "hi @ap");
    assert!(state.is_session_open());

    assert!(press(&mut state, KeyCode::Enter));
    assert!(!state.is_session_open());
    assert_eq!(tag_values(&state), vec!["apple"]);

    // The trigger and query were replaced by the atom.
    let content = state.get_content();
    let para = &content["content"][0]["content"];
    assert_eq!(para[0], json!({ "type": "text", "text": "hi " }));
    assert_eq!(para[1]["type"], json!("tag"));
    assert_eq!(para[1]["attrs"]["value"], json!("apple"));
}

#[test]
fn committing_is_a_single_undo_step() {
    let mut state = widget();
    type_str(&mut state, "@ap");
    press(&mut state, KeyCode::Enter);
    assert_eq!(tag_values(&state).len(), 1);

    // One undo removes the whole trigger-to-tag replacement.
    ctrl(&mut state, 'z');
    assert!(tag_values(&state).is_empty());
    let content = state.get_content();
    assert_eq!(
        content["content"][0]["content"][0]["text"],
        json!("@ap")
    );

    ctrl(&mut state, 'y');
    assert_eq!(tag_values(&state).len(), 1);
}

#[test]
fn escape_closes_the_session_without_inserting() {
    let mut state = widget();
    type_str(&mut state, "@ap");
    assert!(press(&mut state, KeyCode::Esc));
    assert!(!state.is_session_open());
    assert!(tag_values(&state).is_empty());
    // The typed text is untouched.
    assert_eq!(
        state.get_content()["content"][0]["content"][0]["text"],
        json!("@ap")
    );
}

#[test]
fn losing_focus_closes_the_session_without_inserting() {
    let mut state = widget();
    state.handle_focus_gained();
    type_str(&mut state, "@ap");
    assert!(state.is_session_open());

    state.handle_focus_lost();
    assert!(!state.is_session_open());
    assert!(tag_values(&state).is_empty());
    assert!(!state.editor().is_focused());
}

#[test]
fn caret_movement_out_of_the_range_closes_the_session() {
    let mut state = widget();
    type_str(&mut state, "@ap");
    assert!(state.is_session_open());
    press(&mut state, KeyCode::Left);
    press(&mut state, KeyCode::Left);
    press(&mut state, KeyCode::Left);
    press(&mut state, KeyCode::Left);
    assert!(!state.is_session_open());
}

#[test]
fn on_change_fires_on_document_changes_only() {
    let count = Rc::new(RefCell::new(0usize));
    let seen = Rc::clone(&count);
    let mut state = widget().on_change(move |_| *seen.borrow_mut() += 1);

    type_str(&mut state, "ab");
    assert_eq!(*count.borrow(), 2);

    // Pure caret movement is not a content change.
    press(&mut state, KeyCode::Left);
    press(&mut state, KeyCode::Right);
    assert_eq!(*count.borrow(), 2);

    press(&mut state, KeyCode::Backspace);
    assert_eq!(*count.borrow(), 3);
}

#[test]
fn backspace_removes_a_whole_tag_atom() {
    let mut state = widget();
    type_str(&mut state, "@ap");
    press(&mut state, KeyCode::Enter);
    assert_eq!(tag_values(&state).len(), 1);

    press(&mut state, KeyCode::Backspace);
    assert!(tag_values(&state).is_empty());
}

#[test]
fn remove_tag_deletes_by_scan_index_and_ignores_out_of_range() {
    let mut state = widget();
    type_str(&mut state, "@ap");
    press(&mut state, KeyCode::Enter);
    type_str(&mut state, " @ba");
    press(&mut state, KeyCode::Enter);
    assert_eq!(tag_values(&state), vec!["apple", "banana"]);

    state.remove_tag(5);
    assert_eq!(tag_values(&state), vec!["apple", "banana"]);

    state.remove_tag(0);
    assert_eq!(tag_values(&state), vec!["banana"]);
}

#[test]
fn replace_tag_swaps_attributes_in_place() {
    let mut state = widget();
    type_str(&mut state, "@ap");
    press(&mut state, KeyCode::Enter);
    let before = state.get_tags();

    state.replace_tag(0, TagAttributes::new("cherry", "Cherry"));
    let after = state.get_tags();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].pos, before[0].pos);
    assert_eq!(after[0].attrs.value, "cherry");

    // Out of range leaves the document alone.
    state.replace_tag(9, TagAttributes::new("x", "x"));
    assert_eq!(tag_values(&state), vec!["cherry"]);
}

#[test]
fn readonly_blocks_editing_and_closes_the_session() {
    let mut state = widget();
    type_str(&mut state, "@ap");
    assert!(state.is_session_open());

    state.set_readonly(true);
    assert!(!state.is_session_open());
    assert!(state.is_readonly());

    let before = state.get_content();
    assert!(!press(&mut state, KeyCode::Char('x')));
    assert_eq!(state.get_content(), before);

    state.set_readonly(false);
    type_str(&mut state, "x");
    assert_ne!(state.get_content(), before);
}

#[test]
fn failing_item_query_leaves_the_session_open_with_no_candidates() {
    let mut state =
        TagInputState::new(TagInputConfig::default()).with_items(|_| Err(anyhow!("backend down")));
    type_str(&mut state, "@");
    assert!(state.is_session_open());
    assert!(state.list.is_empty());
}

#[test]
fn select_hook_can_suppress_the_default_insert() {
    let picked = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&picked);
    let mut state = widget().on_suggestion_select(move |item| {
        sink.borrow_mut().push(item.value.clone());
        SelectOutcome::Handled
    });

    type_str(&mut state, "@ap");
    press(&mut state, KeyCode::Enter);
    assert_eq!(*picked.borrow(), vec!["apple".to_string()]);
    assert!(!state.is_session_open());
    // Handled means no tag was inserted and the text is untouched.
    assert!(tag_values(&state).is_empty());
    assert_eq!(
        state.get_content()["content"][0]["content"][0]["text"],
        json!("@ap")
    );
}

#[test]
fn set_content_round_trips_and_rejects_bad_schemas() {
    let mut state = widget();
    let doc = json!({
        "type": "doc",
        "content": [{
            "type": "paragraph",
            "content": [
                { "type": "text", "text": "pick " },
                { "type": "tag", "attrs": { "value": "apple", "label": "Apple" } },
            ],
        }],
    });
    state.set_content(doc.clone()).expect("valid document");
    assert_eq!(tag_values(&state), vec!["apple"]);
    assert_eq!(state.get_content(), doc);

    let before = state.get_content();
    let err = state.set_content(json!({ "type": "paragraph" }));
    assert!(err.is_err());
    assert_eq!(state.get_content(), before);
}

#[test]
fn config_overrides_popup_strings() {
    let state = TagInputState::new(TagInputConfig {
        empty_text: "nothing here".to_string(),
        heading_prefix: "* ".to_string(),
        ..TagInputConfig::default()
    });
    assert_eq!(state.empty_text(), "nothing here");
    assert_eq!(state.heading_prefix(), "* ");
}

#[test]
fn add_tag_at_caret_inserts_an_atom() {
    let mut state = widget();
    type_str(&mut state, "ok ");
    let caret = state.editor().caret();
    state.add_tag(
        mentio_types::Range::caret(caret),
        TagAttributes::new("cherry", "Cherry"),
    );
    assert_eq!(tag_values(&state), vec!["cherry"]);
}
