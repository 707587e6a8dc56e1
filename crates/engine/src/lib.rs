//! # Mentio document engine
//!
//! A minimal inline rich-content engine backing the tag-input widget: a
//! paragraph/text/tag document tree with token-based positions, a
//! chain/transaction command API, snapshot undo history, and a persisted
//! JSON form. Tag nodes are atomic: node size 1, never entered or split by
//! the caret, selectable only as a whole for deletion or replacement.
//!
//! The widget crate consumes only this public surface, so a different engine
//! honoring the same contract (focus, insert-content-at-range, delete-range,
//! set/get JSON content, editable flag, undo history) could replace it.

mod doc;
mod editor;
mod error;
mod history;

pub use doc::{Doc, Inline, Paragraph};
pub use editor::{Chain, Content, Editor, Transaction};
pub use error::EngineError;
