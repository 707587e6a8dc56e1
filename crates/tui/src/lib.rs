//! Terminal tag input widget for ratatui.
//!
//! A bordered text field where typing a trigger character opens a suggestion
//! popup; committing a candidate replaces the trigger and query with an
//! atomic inline tag chip. Built around [`mentio_engine::Editor`] for the
//! document model and history, with callback hooks for content changes, chip
//! clicks, and selection interception.

pub mod common;
pub mod suggestion;
pub mod tag_input;
pub mod theme;

pub use suggestion::{
    DEFAULT_EMPTY_TEXT, DEFAULT_HEADING_PREFIX, Direction, PresenterAction, SessionChange,
    SuggestionList, SuggestionListState, SuggestionSession, TriggerConfig, TriggerController,
};
pub use tag_input::{
    POPUP_MAX_ROWS, SelectOutcome, TagHitbox, TagInput, TagInputConfig, TagInputState, TagRef,
};
