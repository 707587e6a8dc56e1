//! Highlight tracking and keyboard navigation for the suggestion popup.
//!
//! The presenter owns which entry is highlighted and how Up/Down/Enter move
//! or commit it. Navigation order is the flattened list of non-disabled
//! entries in display order; group headings and disabled entries are never
//! highlighted. Every candidate-set change resets the highlight to the first
//! eligible entry, and "no eligible entry" is a valid state that clears it.

use crossterm::event::{KeyCode, KeyEvent};
use mentio_types::{CandidateSet, SuggestionItem};

use crate::common::ScrollMetrics;

/// Highlight movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// One rendered popup row.
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayRow<'a> {
    /// A group heading; never selectable.
    Heading(&'a str),
    /// A candidate entry, selectable unless disabled.
    Item(&'a SuggestionItem),
}

/// Outcome of routing a key event to the presenter.
#[derive(Clone, Debug, PartialEq)]
pub enum PresenterAction {
    /// The key is not part of the presenter contract; let it pass through.
    NotHandled,
    /// The key was consumed (highlight moved or nothing to do).
    Consumed,
    /// Enter committed the highlighted entry.
    Commit(SuggestionItem),
}

/// State for the suggestion popup list.
#[derive(Debug, Default)]
pub struct SuggestionListState {
    candidates: CandidateSet,
    /// Identity (`value`) of the highlighted entry
    highlighted: Option<String>,
    /// Scroll bookkeeping for the popup viewport
    pub scroll: ScrollMetrics,
}

impl SuggestionListState {
    // ===== Selectors =====

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The highlighted entry, if any.
    pub fn highlighted(&self) -> Option<&SuggestionItem> {
        let value = self.highlighted.as_deref()?;
        self.candidates.find(value)
    }

    /// Popup rows in display order: headings interleaved for grouped sets.
    pub fn display_rows(&self) -> Vec<DisplayRow<'_>> {
        let mut rows = Vec::new();
        match &self.candidates {
            CandidateSet::Flat(items) => rows.extend(items.iter().map(DisplayRow::Item)),
            CandidateSet::Grouped(groups) => {
                for group in groups {
                    rows.push(DisplayRow::Heading(&group.group));
                    rows.extend(group.items.iter().map(DisplayRow::Item));
                }
            }
        }
        rows
    }

    /// Display-row index of the highlighted entry.
    pub fn highlighted_row(&self) -> Option<usize> {
        let value = self.highlighted.as_deref()?;
        self.display_rows().iter().position(
            |row| matches!(row, DisplayRow::Item(item) if item.value == value),
        )
    }

    // ===== Reducers =====

    /// Replaces the candidate set, resetting the highlight to the first
    /// non-disabled entry in display order.
    ///
    /// A set switching between flat and grouped shape is handled like any
    /// other change: new rows, fresh highlight.
    pub fn set_candidates(&mut self, candidates: CandidateSet) {
        self.highlighted = candidates.first_selectable().map(|item| item.value.clone());
        self.candidates = candidates;
        self.scroll.reset();
    }

    /// Clears rows and highlight.
    pub fn clear(&mut self) {
        self.set_candidates(CandidateSet::default());
    }

    /// Moves the highlight by one selectable entry with wraparound.
    ///
    /// No-op when nothing is selectable. Never lands on a disabled entry or
    /// a group heading.
    pub fn move_highlight(&mut self, direction: Direction) {
        let selectable = self.candidates.selectable();
        if selectable.is_empty() {
            return;
        }
        let len = selectable.len() as isize;
        let current = self
            .highlighted
            .as_deref()
            .and_then(|value| selectable.iter().position(|item| item.value == value))
            .unwrap_or(0) as isize;
        let delta = match direction {
            Direction::Previous => -1,
            Direction::Next => 1,
        };
        let next = (current + delta).rem_euclid(len) as usize;
        self.highlighted = Some(selectable[next].value.clone());
    }

    /// Returns the highlighted entry for commit; `None` when nothing is
    /// highlighted.
    pub fn commit_highlighted(&self) -> Option<SuggestionItem> {
        self.highlighted().cloned()
    }

    /// Maps a clicked display row to its entry, bypassing the highlight.
    /// Disabled entries and headings yield `None`.
    pub fn click_select(&self, row: usize) -> Option<SuggestionItem> {
        match self.display_rows().get(row)? {
            DisplayRow::Item(item) if !item.disabled => Some((*item).clone()),
            _ => None,
        }
    }

    /// Routes a key event per the popup keyboard contract: Up/Down move the
    /// highlight, Enter commits, everything else passes through.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> PresenterAction {
        match key.code {
            KeyCode::Up => {
                self.move_highlight(Direction::Previous);
                PresenterAction::Consumed
            }
            KeyCode::Down => {
                self.move_highlight(Direction::Next);
                PresenterAction::Consumed
            }
            KeyCode::Enter => match self.commit_highlighted() {
                Some(item) => PresenterAction::Commit(item),
                None => PresenterAction::Consumed,
            },
            _ => PresenterAction::NotHandled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use mentio_types::GroupedItems;

    fn item(value: &str) -> SuggestionItem {
        SuggestionItem::new(value, value.to_uppercase())
    }

    fn grouped_fixture() -> CandidateSet {
        CandidateSet::Grouped(vec![
            GroupedItems::new("水果", vec![item("apple"), item("banana"), item("orange")]),
            GroupedItems::new("蔬菜", vec![item("carrot"), item("broccoli"), item("tomato")]),
        ])
    }

    fn highlighted_value(state: &SuggestionListState) -> Option<&str> {
        state.highlighted().map(|i| i.value.as_str())
    }

    #[test]
    fn defaults_to_first_selectable_entry() {
        let mut state = SuggestionListState::default();
        state.set_candidates(CandidateSet::Flat(vec![item("a").disabled(), item("b")]));
        assert_eq!(highlighted_value(&state), Some("b"));
    }

    #[test]
    fn all_disabled_clears_highlight() {
        let mut state = SuggestionListState::default();
        state.set_candidates(CandidateSet::Flat(vec![item("a").disabled()]));
        assert_eq!(state.highlighted(), None);
        state.move_highlight(Direction::Next);
        assert_eq!(state.highlighted(), None);
        assert_eq!(state.commit_highlighted(), None);
    }

    #[test]
    fn next_visits_grouped_entries_in_display_order_and_wraps() {
        let mut state = SuggestionListState::default();
        state.set_candidates(grouped_fixture());
        assert_eq!(highlighted_value(&state), Some("apple"));

        let expected = ["banana", "orange", "carrot", "broccoli", "tomato", "apple"];
        for value in expected {
            state.move_highlight(Direction::Next);
            assert_eq!(highlighted_value(&state), Some(value));
        }
    }

    #[test]
    fn full_cycle_returns_to_start() {
        let mut state = SuggestionListState::default();
        state.set_candidates(grouped_fixture());
        for _ in 0..6 {
            state.move_highlight(Direction::Next);
        }
        assert_eq!(highlighted_value(&state), Some("apple"));
    }

    #[test]
    fn previous_and_next_are_mutual_inverses() {
        let mut state = SuggestionListState::default();
        state.set_candidates(grouped_fixture());
        state.move_highlight(Direction::Next);
        let at = highlighted_value(&state).map(str::to_owned);
        state.move_highlight(Direction::Next);
        state.move_highlight(Direction::Previous);
        assert_eq!(highlighted_value(&state).map(str::to_owned), at);
        state.move_highlight(Direction::Previous);
        state.move_highlight(Direction::Next);
        assert_eq!(highlighted_value(&state).map(str::to_owned), at);
    }

    #[test]
    fn previous_wraps_to_last_selectable() {
        let mut state = SuggestionListState::default();
        state.set_candidates(grouped_fixture());
        state.move_highlight(Direction::Previous);
        assert_eq!(highlighted_value(&state), Some("tomato"));
    }

    #[test]
    fn disabled_entries_are_skipped_in_navigation() {
        let mut state = SuggestionListState::default();
        state.set_candidates(CandidateSet::Flat(vec![
            item("a"),
            item("b").disabled(),
            item("c"),
        ]));
        state.move_highlight(Direction::Next);
        assert_eq!(highlighted_value(&state), Some("c"));
    }

    #[test]
    fn empty_set_has_no_rows_and_navigation_is_noop() {
        let mut state = SuggestionListState::default();
        state.set_candidates(CandidateSet::default());
        assert!(state.display_rows().is_empty());
        state.move_highlight(Direction::Next);
        assert_eq!(state.highlighted(), None);
    }

    #[test]
    fn click_select_ignores_disabled_and_headings() {
        let mut state = SuggestionListState::default();
        state.set_candidates(grouped_fixture());
        // Row 0 is the 水果 heading, row 1 is apple.
        assert_eq!(state.click_select(0), None);
        assert_eq!(state.click_select(1).map(|i| i.value), Some("apple".into()));

        let mut flat = SuggestionListState::default();
        flat.set_candidates(CandidateSet::Flat(vec![item("a").disabled()]));
        assert_eq!(flat.click_select(0), None);
    }

    #[test]
    fn key_contract_consumes_navigation_and_commits_on_enter() {
        let mut state = SuggestionListState::default();
        state.set_candidates(CandidateSet::Flat(vec![item("a"), item("b")]));

        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(state.handle_key_event(down), PresenterAction::Consumed);
        assert_eq!(highlighted_value(&state), Some("b"));

        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        match state.handle_key_event(enter) {
            PresenterAction::Commit(item) => assert_eq!(item.value, "b"),
            other => panic!("expected commit, got {other:?}"),
        }

        let escape = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(state.handle_key_event(escape), PresenterAction::NotHandled);
    }

    #[test]
    fn shape_change_mid_session_resets_highlight() {
        let mut state = SuggestionListState::default();
        state.set_candidates(CandidateSet::Flat(vec![item("a"), item("b")]));
        state.move_highlight(Direction::Next);
        state.set_candidates(grouped_fixture());
        assert_eq!(highlighted_value(&state), Some("apple"));
    }

    #[test]
    fn highlighted_row_accounts_for_headings() {
        let mut state = SuggestionListState::default();
        state.set_candidates(grouped_fixture());
        for _ in 0..3 {
            state.move_highlight(Direction::Next);
        }
        // carrot sits below two headings and three fruit rows.
        assert_eq!(highlighted_value(&state), Some("carrot"));
        assert_eq!(state.highlighted_row(), Some(5));
    }
}
