//! Snapshot-based undo/redo history.
//!
//! Every document-changing transaction pushes one undo entry; consecutive
//! single-character typing transactions coalesce into one entry so an undo
//! removes a typing run, not one character. Documents here are input-field
//! sized, so whole-doc snapshots are cheaper than step inversion would be to
//! maintain.

use crate::doc::Doc;

/// How a transaction should be grouped in history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepKind {
    /// A single typed character; coalesces with a preceding `Typing` step.
    Typing,
    /// Anything else; always its own undo entry.
    Edit,
}

/// A restorable point in time.
#[derive(Clone, Debug)]
struct Snapshot {
    doc: Doc,
    caret: usize,
}

/// Bounded undo/redo stacks.
#[derive(Clone, Debug)]
pub struct History {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    last_kind: Option<StepKind>,
    depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}

impl History {
    pub fn new(depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            last_kind: None,
            depth,
        }
    }

    /// Records the pre-transaction state. Called before a doc-changing
    /// transaction applies; clears the redo stack.
    pub fn record(&mut self, doc: &Doc, caret: usize, kind: StepKind) {
        self.redo.clear();
        let coalesce = kind == StepKind::Typing && self.last_kind == Some(StepKind::Typing);
        if !coalesce {
            self.undo.push(Snapshot {
                doc: doc.clone(),
                caret,
            });
            if self.undo.len() > self.depth {
                self.undo.remove(0);
            }
        }
        self.last_kind = Some(kind);
    }

    /// Restores the previous state, exchanging it with the current one.
    pub fn undo(&mut self, doc: &mut Doc, caret: &mut usize) -> bool {
        let Some(snapshot) = self.undo.pop() else {
            return false;
        };
        self.redo.push(Snapshot {
            doc: std::mem::replace(doc, snapshot.doc),
            caret: std::mem::replace(caret, snapshot.caret),
        });
        self.last_kind = None;
        true
    }

    /// Re-applies the most recently undone state.
    pub fn redo(&mut self, doc: &mut Doc, caret: &mut usize) -> bool {
        let Some(snapshot) = self.redo.pop() else {
            return false;
        };
        self.undo.push(Snapshot {
            doc: std::mem::replace(doc, snapshot.doc),
            caret: std::mem::replace(caret, snapshot.caret),
        });
        self.last_kind = None;
        true
    }

    /// Ends the current typing run so the next character starts a new entry.
    pub fn break_typing_run(&mut self) {
        self.last_kind = None;
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_steps_coalesce_into_one_entry() {
        let mut history = History::default();
        let mut doc = Doc::default();
        let mut caret = 1usize;

        history.record(&doc, caret, StepKind::Typing);
        history.record(&doc, caret, StepKind::Typing);
        history.record(&doc, caret, StepKind::Typing);
        assert!(history.undo(&mut doc, &mut caret));
        assert!(!history.can_undo());
    }

    #[test]
    fn edit_steps_do_not_coalesce() {
        let mut history = History::default();
        let doc = Doc::default();

        history.record(&doc, 1, StepKind::Typing);
        history.record(&doc, 1, StepKind::Edit);
        history.record(&doc, 1, StepKind::Typing);
        let mut current = Doc::default();
        let mut caret = 1usize;
        assert!(history.undo(&mut current, &mut caret));
        assert!(history.undo(&mut current, &mut caret));
        assert!(history.undo(&mut current, &mut caret));
        assert!(!history.undo(&mut current, &mut caret));
    }

    #[test]
    fn undo_then_redo_round_trips() {
        let mut history = History::default();
        let mut doc = Doc::default();
        let mut caret = 1usize;

        history.record(&doc, caret, StepKind::Edit);
        // Simulate the transaction mutating the doc.
        let mutated = {
            let mut d = Doc::default();
            d.splice(mentio_types::Range::caret(1), vec![crate::doc::Unit::Char('x')]);
            d
        };
        doc = mutated.clone();
        caret = 2;

        assert!(history.undo(&mut doc, &mut caret));
        assert!(history.can_redo());
        assert!(history.redo(&mut doc, &mut caret));
        assert_eq!(doc, mutated);
    }
}
