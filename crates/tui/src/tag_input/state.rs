//! Tag input widget state.
//!
//! Owns the editor instance, the suggestion session, the popup list state,
//! and the caller-supplied hooks, and exposes the widget's public operations
//! over tag nodes. Geometry recorded by the renderer (tag hitboxes, popup
//! area, trigger anchor) lives here too so mouse events can be resolved
//! between frames.
//!
//! Index-based operations (`remove_tag`, `replace_tag`) re-scan the document
//! on every call: indices are positions in a fresh document-order scan and
//! become stale the moment any other mutation runs. Out-of-range indices are
//! silent no-ops by contract.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use mentio_engine::{Content, Editor, EngineError, Transaction};
use mentio_types::{CandidateSet, Range, SuggestionItem, TagAttributes};
use ratatui::layout::{Position, Rect};
use serde_json::Value;

use crate::suggestion::{
    DEFAULT_EMPTY_TEXT, DEFAULT_HEADING_PREFIX, PresenterAction, SessionChange,
    SuggestionListState, SuggestionSession, TriggerConfig, TriggerController,
};

/// What a suggestion-select hook decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Proceed with the default behavior: insert the tag at the session
    /// range.
    Continue,
    /// The hook handled the selection itself; skip the default insert.
    Handled,
}

/// A tag node projected out of the document.
///
/// `pos` is valid only against the document state at scan time.
#[derive(Clone, Debug, PartialEq)]
pub struct TagRef {
    /// Document position of the node
    pub pos: usize,
    /// Node size in positions; tags are atoms of size 1
    pub node_size: usize,
    /// The node's attribute payload
    pub attrs: TagAttributes,
}

/// Screen rectangle of a rendered tag chip, recorded each frame.
#[derive(Clone, Copy, Debug)]
pub struct TagHitbox {
    /// Document position of the node at render time
    pub pos: usize,
    /// Whole chip area
    pub area: Rect,
    /// Remove-affordance cell; `None` in readonly mode
    pub close: Option<Rect>,
}

/// Constructor configuration for the widget.
#[derive(Clone, Debug)]
pub struct TagInputConfig {
    /// Placeholder shown while the document is empty
    pub placeholder: Option<String>,
    /// Character that opens a suggestion session
    pub trigger: char,
    /// Prefix rule for the trigger; `None` allows any prefix
    pub allowed_prefixes: Option<Vec<char>>,
    /// Start in readonly mode
    pub readonly: bool,
    /// Fallback message for an empty candidate set
    pub empty_text: String,
    /// String rendered before each group heading in the popup
    pub heading_prefix: String,
}

impl Default for TagInputConfig {
    fn default() -> Self {
        Self {
            placeholder: None,
            trigger: '@',
            allowed_prefixes: Some(vec![' ']),
            readonly: false,
            empty_text: DEFAULT_EMPTY_TEXT.to_string(),
            heading_prefix: DEFAULT_HEADING_PREFIX.to_string(),
        }
    }
}

type ItemsFn = Box<dyn FnMut(&str) -> anyhow::Result<CandidateSet>>;
type ChangeFn = Box<dyn FnMut(Value)>;
type TagClickFn = Box<dyn FnMut(usize, &TagAttributes)>;
type SelectFn = Box<dyn FnMut(&SuggestionItem) -> SelectOutcome>;

/// State for one tag input widget, owning one editor instance.
pub struct TagInputState {
    editor: Editor,
    controller: TriggerController,
    /// Popup list state, shared with the renderer
    pub list: SuggestionListState,
    items_fn: Option<ItemsFn>,
    on_change: Option<ChangeFn>,
    on_tag_click: Option<TagClickFn>,
    on_suggestion_select: Option<SelectFn>,
    placeholder: String,
    empty_text: String,
    heading_prefix: String,
    readonly: bool,
    // Geometry recorded by the renderer for mouse resolution.
    pub(crate) editor_area: Rect,
    pub(crate) popup_inner: Option<Rect>,
    pub(crate) anchor: Option<Rect>,
    pub(crate) hitboxes: Vec<TagHitbox>,
}

impl std::fmt::Debug for TagInputState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagInputState")
            .field("readonly", &self.readonly)
            .field("session", self.controller.session())
            .finish_non_exhaustive()
    }
}

impl TagInputState {
    pub fn new(config: TagInputConfig) -> Self {
        let mut editor = Editor::new();
        editor.set_editable(!config.readonly);
        let placeholder = config
            .placeholder
            .unwrap_or_else(|| format!("Type text, press {} to pick a tag…", config.trigger));
        Self {
            editor,
            controller: TriggerController::new(TriggerConfig {
                trigger: config.trigger,
                allowed_prefixes: config.allowed_prefixes,
            }),
            list: SuggestionListState::default(),
            items_fn: None,
            on_change: None,
            on_tag_click: None,
            on_suggestion_select: None,
            placeholder,
            empty_text: config.empty_text,
            heading_prefix: config.heading_prefix,
            readonly: config.readonly,
            editor_area: Rect::default(),
            popup_inner: None,
            anchor: None,
            hitboxes: Vec::new(),
        }
    }

    /// Sets the item-query function invoked on every keystroke inside an
    /// open session. Errors are logged and treated as "no candidates".
    pub fn with_items(mut self, f: impl FnMut(&str) -> anyhow::Result<CandidateSet> + 'static) -> Self {
        self.items_fn = Some(Box::new(f));
        self
    }

    /// Called with the serialized document after every content change.
    pub fn on_change(mut self, f: impl FnMut(Value) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Called when a tag chip is clicked (never for its remove affordance).
    pub fn on_tag_click(mut self, f: impl FnMut(usize, &TagAttributes) + 'static) -> Self {
        self.on_tag_click = Some(Box::new(f));
        self
    }

    /// Intercepts suggestion commits; returning [`SelectOutcome::Handled`]
    /// suppresses the default tag insert.
    pub fn on_suggestion_select(
        mut self,
        f: impl FnMut(&SuggestionItem) -> SelectOutcome + 'static,
    ) -> Self {
        self.on_suggestion_select = Some(Box::new(f));
        self
    }

    // ===== Selectors =====

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn empty_text(&self) -> &str {
        &self.empty_text
    }

    pub fn heading_prefix(&self) -> &str {
        &self.heading_prefix
    }

    /// Whether a suggestion session (and therefore the popup) is open.
    pub fn is_session_open(&self) -> bool {
        self.controller.is_open()
    }

    /// The open session's replace-range.
    pub fn session_range(&self) -> Option<Range> {
        self.controller.range()
    }

    /// The open session's query text.
    pub fn session_query(&self) -> Option<&str> {
        match self.controller.session() {
            SuggestionSession::Open { query, .. } => Some(query),
            SuggestionSession::Closed => None,
        }
    }

    // ===== Public widget operations =====

    /// The full document as its persisted JSON tree. Pure read.
    pub fn get_content(&self) -> Value {
        self.editor.get_json()
    }

    /// Replaces the whole document.
    ///
    /// Schema validation is the engine's; on rejection the document is
    /// unchanged and the error is returned after being logged.
    pub fn set_content(&mut self, content: Value) -> Result<(), EngineError> {
        match self.editor.set_content(content) {
            Ok(tx) => {
                self.close_session();
                self.notify_change(tx);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "set_content rejected");
                Err(err)
            }
        }
    }

    /// Inserts a tag atom at `range`, replacing any text inside it, as one
    /// undoable step. Refocuses the editor.
    pub fn add_tag(&mut self, range: Range, attrs: TagAttributes) {
        let tx = self
            .editor
            .chain()
            .focus()
            .insert_content_at(range, Content::Tag(attrs))
            .run();
        self.notify_change(tx);
    }

    /// Deletes the tag at `index` in a fresh document-order scan; silent
    /// no-op when out of bounds.
    pub fn remove_tag(&mut self, index: usize) {
        let tags = self.get_tags();
        let Some(tag) = tags.get(index) else {
            return;
        };
        let tx = self
            .editor
            .chain()
            .focus()
            .delete_range(Range::new(tag.pos, tag.pos + tag.node_size))
            .run();
        self.notify_change(tx);
    }

    /// Replaces the tag at `index` with a new tag carrying `attrs`,
    /// preserving its position; silent no-op when out of bounds.
    pub fn replace_tag(&mut self, index: usize, attrs: TagAttributes) {
        let tags = self.get_tags();
        let Some(tag) = tags.get(index) else {
            return;
        };
        let range = Range::new(tag.pos, tag.pos + tag.node_size);
        let tx = self
            .editor
            .chain()
            .focus()
            .insert_content_at(range, Content::Tag(attrs))
            .run();
        self.notify_change(tx);
    }

    /// Every tag node in document order, from a fresh scan. O(document) per
    /// call; positions are valid only until the next mutation.
    pub fn get_tags(&self) -> Vec<TagRef> {
        self.editor
            .doc()
            .tags()
            .into_iter()
            .map(|(pos, attrs)| TagRef {
                pos,
                node_size: 1,
                attrs: attrs.clone(),
            })
            .collect()
    }

    /// Toggles readonly mode: the editor stops accepting edits and tag
    /// chips lose their click/remove affordances.
    pub fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
        self.editor.set_editable(!readonly);
        if readonly {
            self.close_session();
        }
    }

    // ===== Event handling =====

    /// Routes a key event. Returns whether the event was consumed.
    ///
    /// While the popup is open, Up/Down/Enter belong to the presenter and
    /// Escape closes the session; everything else reaches the editor and
    /// the session is re-evaluated afterwards.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if self.is_session_open() {
            match self.list.handle_key_event(key) {
                PresenterAction::Consumed => return true,
                PresenterAction::Commit(item) => {
                    self.commit_suggestion(item);
                    return true;
                }
                PresenterAction::NotHandled => {}
            }
            if key.code == KeyCode::Esc {
                self.close_session();
                return true;
            }
        }
        if self.readonly {
            return false;
        }

        let tx = match key.code {
            KeyCode::Char('z') if key.modifiers.contains(KeyModifiers::CONTROL) => self.editor.undo(),
            KeyCode::Char('y') if key.modifiers.contains(KeyModifiers::CONTROL) => self.editor.redo(),
            KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
                self.editor.insert_char(c)
            }
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Enter => self.editor.split_paragraph(),
            KeyCode::Left => {
                self.editor.move_left();
                Transaction::default()
            }
            KeyCode::Right => {
                self.editor.move_right();
                Transaction::default()
            }
            _ => return false,
        };
        self.refresh_session();
        self.notify_change(tx);
        true
    }

    /// Routes a left-button mouse press: popup rows first, then tag chips.
    /// Returns whether the event was consumed.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> bool {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return false;
        }
        let point = Position::new(mouse.column, mouse.row);

        if self.is_session_open()
            && let Some(inner) = self.popup_inner
            && inner.contains(point)
        {
            let row = (mouse.row - inner.y) as usize + self.list.scroll.offset() as usize;
            if let Some(item) = self.list.click_select(row) {
                self.commit_suggestion(item);
            }
            return true;
        }

        if self.readonly {
            return false;
        }
        for hitbox in self.hitboxes.clone() {
            if let Some(close) = hitbox.close
                && close.contains(point)
            {
                // Remove affordance: delete exactly this node's span. Must
                // never fire the tag-click notification.
                let tx = self
                    .editor
                    .chain()
                    .focus()
                    .delete_range(Range::new(hitbox.pos, hitbox.pos + 1))
                    .run();
                self.notify_change(tx);
                return true;
            }
            if hitbox.area.contains(point) {
                let tags = self.get_tags();
                if let Some(index) = tags.iter().position(|tag| tag.pos == hitbox.pos)
                    && let Some(hook) = self.on_tag_click.as_mut()
                {
                    hook(index, &tags[index].attrs);
                }
                return true;
            }
        }
        false
    }

    /// The editor lost focus: close any open session without committing and
    /// release the controller's tracking state.
    pub fn handle_focus_lost(&mut self) {
        self.editor.blur();
        self.close_session();
    }

    pub fn handle_focus_gained(&mut self) {
        self.editor.focus();
    }

    // ===== Internals =====

    /// Re-evaluates the trigger session and refreshes candidates on open or
    /// update.
    fn refresh_session(&mut self) {
        match self.controller.observe(self.editor.doc(), self.editor.caret()) {
            SessionChange::Opened | SessionChange::Updated => {
                let query = self.session_query().unwrap_or_default().to_string();
                let candidates = self.fetch_items(&query);
                self.list.set_candidates(candidates);
            }
            SessionChange::Exited => self.list.clear(),
            SessionChange::Unchanged => {}
        }
    }

    fn fetch_items(&mut self, query: &str) -> CandidateSet {
        let Some(items_fn) = self.items_fn.as_mut() else {
            return CandidateSet::default();
        };
        match items_fn(query) {
            Ok(set) => set,
            Err(err) => {
                tracing::warn!(error = %err, query, "item query failed; treating as no candidates");
                CandidateSet::default()
            }
        }
    }

    /// Commits a selected item: the select hook may take over; otherwise the
    /// item becomes a tag at the session's replace-range. Either way the
    /// session ends.
    fn commit_suggestion(&mut self, item: SuggestionItem) {
        let outcome = match self.on_suggestion_select.as_mut() {
            Some(hook) => hook(&item),
            None => SelectOutcome::Continue,
        };
        let range = self.controller.range();
        self.close_session();
        if outcome == SelectOutcome::Continue
            && let Some(range) = range
        {
            self.add_tag(range, TagAttributes::from(item));
        }
    }

    fn close_session(&mut self) {
        self.controller.exit();
        self.list.clear();
    }

    fn notify_change(&mut self, tx: Transaction) {
        if tx.doc_changed
            && let Some(hook) = self.on_change.as_mut()
        {
            hook(self.editor.get_json());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn left_click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: crossterm::event::KeyModifiers::NONE,
        }
    }

    /// A state holding one committed tag with hand-planted render geometry,
    /// standing in for a frame the renderer would have drawn.
    fn state_with_chip() -> TagInputState {
        let mut state = TagInputState::new(TagInputConfig::default());
        state.add_tag(Range::caret(1), TagAttributes::new("apple", "Apple"));
        let pos = state.get_tags()[0].pos;
        state.hitboxes = vec![TagHitbox {
            pos,
            area: Rect::new(2, 1, 9, 1),
            close: Some(Rect::new(9, 1, 1, 1)),
        }];
        state
    }

    #[test]
    fn close_cell_click_deletes_without_firing_tag_click() {
        let clicks = Rc::new(RefCell::new(0usize));
        let seen = Rc::clone(&clicks);
        let mut state = state_with_chip().on_tag_click(move |_, _| *seen.borrow_mut() += 1);

        assert!(state.handle_mouse_event(left_click(9, 1)));
        assert!(state.get_tags().is_empty());
        assert_eq!(*clicks.borrow(), 0);
    }

    #[test]
    fn chip_click_fires_tag_click_with_scan_index() {
        let clicked = Rc::new(RefCell::new(None));
        let seen = Rc::clone(&clicked);
        let mut state = state_with_chip()
            .on_tag_click(move |index, attrs| *seen.borrow_mut() = Some((index, attrs.value.clone())));

        assert!(state.handle_mouse_event(left_click(4, 1)));
        assert_eq!(*clicked.borrow(), Some((0, "apple".to_string())));
        assert_eq!(state.get_tags().len(), 1);
    }

    #[test]
    fn readonly_ignores_chip_and_close_clicks() {
        let mut state = state_with_chip();
        state.set_readonly(true);
        assert!(!state.handle_mouse_event(left_click(9, 1)));
        assert!(!state.handle_mouse_event(left_click(4, 1)));
        assert_eq!(state.get_tags().len(), 1);
    }

    #[test]
    fn popup_row_click_commits_that_entry() {
        let mut state = TagInputState::new(TagInputConfig::default()).with_items(|_| {
            Ok(CandidateSet::Flat(vec![
                SuggestionItem::new("apple", "Apple"),
                SuggestionItem::new("banana", "Banana"),
            ]))
        });
        state.handle_key_event(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('@'),
            crossterm::event::KeyModifiers::NONE,
        ));
        assert!(state.is_session_open());
        state.popup_inner = Some(Rect::new(10, 5, 20, 4));

        // Second row of the popup.
        assert!(state.handle_mouse_event(left_click(12, 6)));
        assert!(!state.is_session_open());
        let tags = state.get_tags();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].attrs.value, "banana");
    }

    #[test]
    fn clicks_outside_any_geometry_are_not_consumed() {
        let mut state = state_with_chip();
        assert!(!state.handle_mouse_event(left_click(40, 10)));
        assert_eq!(state.get_tags().len(), 1);
    }
}
