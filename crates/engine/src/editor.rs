//! The editor: a document, a caret, and a transactional command API.
//!
//! Mutations run through either the convenience keystroke methods
//! (`insert_char`, `backspace`, `split_paragraph`) or the [`Chain`] builder,
//! which queues commands and applies them as one transaction — and therefore
//! one undo step. Every mutating call reports whether the document actually
//! changed so callers can distinguish content edits from caret movement.

use mentio_types::{Range, TagAttributes};
use serde_json::Value;

use crate::doc::{Doc, Unit};
use crate::error::EngineError;
use crate::history::{History, StepKind};

/// Content insertable at a range.
#[derive(Clone, Debug)]
pub enum Content {
    Text(String),
    Tag(TagAttributes),
}

impl Content {
    fn units(&self) -> Vec<Unit> {
        match self {
            Self::Text(text) => text.chars().map(Unit::Char).collect(),
            Self::Tag(attrs) => vec![Unit::Tag(attrs.clone())],
        }
    }
}

/// Summary of an applied transaction.
#[derive(Clone, Copy, Debug, Default)]
pub struct Transaction {
    /// Whether document content changed (caret-only updates stay false).
    pub doc_changed: bool,
}

#[derive(Clone, Debug)]
enum Command {
    Focus,
    InsertContentAt { range: Range, content: Content },
    DeleteRange(Range),
    SetContent(Doc),
}

/// Queued commands applied as a single transaction by [`Chain::run`].
#[must_use = "a chain does nothing until run() is called"]
pub struct Chain<'a> {
    editor: &'a mut Editor,
    commands: Vec<Command>,
}

impl Chain<'_> {
    /// Marks the editor focused when the chain runs.
    pub fn focus(mut self) -> Self {
        self.commands.push(Command::Focus);
        self
    }

    /// Replaces `range` with `content`, leaving the caret after it.
    pub fn insert_content_at(mut self, range: Range, content: Content) -> Self {
        self.commands.push(Command::InsertContentAt { range, content });
        self
    }

    /// Inserts plain text at `pos`.
    pub fn insert_text(mut self, pos: usize, text: impl Into<String>) -> Self {
        self.commands.push(Command::InsertContentAt {
            range: Range::caret(pos),
            content: Content::Text(text.into()),
        });
        self
    }

    /// Deletes `range`, leaving the caret at its start.
    pub fn delete_range(mut self, range: Range) -> Self {
        self.commands.push(Command::DeleteRange(range));
        self
    }

    /// Replaces the whole document.
    pub fn set_content(mut self, doc: Doc) -> Self {
        self.commands.push(Command::SetContent(doc));
        self
    }

    /// Applies all queued commands as one transaction and one undo step.
    pub fn run(self) -> Transaction {
        let mut doc = self.editor.doc.clone();
        let mut caret = self.editor.caret;
        let mut focused = self.editor.focused;
        for command in &self.commands {
            match command {
                Command::Focus => focused = true,
                Command::InsertContentAt { range, content } => {
                    caret = doc.splice(*range, content.units());
                }
                Command::DeleteRange(range) => {
                    caret = doc.splice(*range, Vec::new());
                }
                Command::SetContent(new_doc) => {
                    doc = new_doc.clone();
                    caret = doc.max_caret();
                }
            }
        }
        let doc_changed = doc != self.editor.doc;
        if doc_changed {
            self.editor
                .history
                .record(&self.editor.doc, self.editor.caret, StepKind::Edit);
            tracing::debug!(commands = self.commands.len(), "applied transaction");
            self.editor.doc = doc;
        }
        self.editor.caret = self.editor.doc.clamp_caret(caret);
        self.editor.focused = focused;
        Transaction { doc_changed }
    }
}

/// A single-owner editing surface over one document.
#[derive(Clone, Debug)]
pub struct Editor {
    doc: Doc,
    caret: usize,
    editable: bool,
    focused: bool,
    history: History,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        let doc = Doc::default();
        let caret = doc.min_caret();
        Self {
            doc,
            caret,
            editable: true,
            focused: false,
            history: History::default(),
        }
    }

    // ----- Selectors -----

    pub fn doc(&self) -> &Doc {
        &self.doc
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    /// Document snapshot as the persisted JSON tree. Pure read.
    pub fn get_json(&self) -> Value {
        self.doc.to_json()
    }

    // ----- Commands -----

    /// Starts a command chain; all queued commands apply as one undo step.
    pub fn chain(&mut self) -> Chain<'_> {
        Chain {
            editor: self,
            commands: Vec::new(),
        }
    }

    /// Replaces the whole document from its JSON form.
    ///
    /// Schema validation happens before anything mutates: on error the
    /// document is left untouched.
    pub fn set_content(&mut self, value: Value) -> Result<Transaction, EngineError> {
        let doc = Doc::from_json(value)?;
        Ok(self.chain().set_content(doc).run())
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Moves the caret without touching content.
    pub fn set_caret(&mut self, pos: usize) {
        self.caret = self.doc.clamp_caret(pos);
        self.history.break_typing_run();
    }

    pub fn move_left(&mut self) {
        self.caret = self.doc.prev_caret(self.caret);
        self.history.break_typing_run();
    }

    pub fn move_right(&mut self) {
        self.caret = self.doc.next_caret(self.caret);
        self.history.break_typing_run();
    }

    /// Inserts a typed character at the caret.
    ///
    /// Consecutive calls coalesce into one undo entry until the typing run is
    /// broken by caret movement or another edit.
    pub fn insert_char(&mut self, c: char) -> Transaction {
        if !self.editable {
            return Transaction::default();
        }
        self.history.record(&self.doc, self.caret, StepKind::Typing);
        self.caret = self.doc.splice(Range::caret(self.caret), vec![Unit::Char(c)]);
        Transaction { doc_changed: true }
    }

    /// Deletes the unit before the caret: one character, or one whole tag
    /// atom. At a paragraph start, joins with the previous paragraph.
    pub fn backspace(&mut self) -> Transaction {
        if !self.editable {
            return Transaction::default();
        }
        let (para, offset) = self.doc.resolve(self.caret);
        if offset > 0 {
            self.history.record(&self.doc, self.caret, StepKind::Edit);
            self.caret = self.doc.splice(Range::new(self.caret - 1, self.caret), Vec::new());
            Transaction { doc_changed: true }
        } else if para > 0 {
            self.history.record(&self.doc, self.caret, StepKind::Edit);
            self.caret = self.doc.join_with_previous(para);
            Transaction { doc_changed: true }
        } else {
            Transaction::default()
        }
    }

    /// Splits the current paragraph at the caret.
    pub fn split_paragraph(&mut self) -> Transaction {
        if !self.editable {
            return Transaction::default();
        }
        self.history.record(&self.doc, self.caret, StepKind::Edit);
        self.caret = self.doc.split_paragraph(self.caret);
        Transaction { doc_changed: true }
    }

    pub fn undo(&mut self) -> Transaction {
        let changed = self.history.undo(&mut self.doc, &mut self.caret);
        Transaction { doc_changed: changed }
    }

    pub fn redo(&mut self) -> Transaction {
        let changed = self.history.redo(&mut self.doc, &mut self.caret);
        Transaction { doc_changed: changed }
    }
}
