//! Suggestion session state machine.
//!
//! Watches the text around the caret for the trigger character and tracks
//! the open session's replace-range and query. The machine knows nothing
//! about rendering or candidate fetching: it reads the document and caret
//! and reports transitions, so it could be retargeted to a different engine
//! exposing the same text-run view.
//!
//! States and transitions:
//! - `Closed` --trigger typed--> `Open { range, query }`
//! - `Open` --keystroke--> `Open` (range and query recomputed)
//! - `Open` --caret leaves range / whitespace in query / trigger gone /
//!   escape / focus loss / commit--> `Closed`

use mentio_engine::Doc;
use mentio_types::Range;

/// Trigger configuration for one widget instance.
#[derive(Clone, Debug)]
pub struct TriggerConfig {
    /// Character that opens a session, e.g. `@` or `#`
    pub trigger: char,
    /// Characters allowed immediately before the trigger; the paragraph
    /// start always qualifies. `None` allows any prefix.
    pub allowed_prefixes: Option<Vec<char>>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            trigger: '@',
            allowed_prefixes: Some(vec![' ']),
        }
    }
}

/// The session the controller is tracking.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SuggestionSession {
    #[default]
    Closed,
    Open {
        /// Span of the trigger character plus query text, to be replaced on
        /// commit
        range: Range,
        /// Text typed since the trigger
        query: String,
    },
}

/// Transition reported by one observation.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionChange {
    /// A session just opened at the reported range.
    Opened,
    /// The open session's range or query changed.
    Updated,
    /// The open session closed without committing.
    Exited,
    /// Nothing to report.
    Unchanged,
}

/// Watches the document for trigger activity and owns the session state.
#[derive(Debug, Default)]
pub struct TriggerController {
    config: TriggerConfig,
    session: SuggestionSession,
}

impl TriggerController {
    pub fn new(config: TriggerConfig) -> Self {
        Self {
            config,
            session: SuggestionSession::Closed,
        }
    }

    pub fn session(&self) -> &SuggestionSession {
        &self.session
    }

    pub fn is_open(&self) -> bool {
        matches!(self.session, SuggestionSession::Open { .. })
    }

    /// The open session's replace-range.
    pub fn range(&self) -> Option<Range> {
        match &self.session {
            SuggestionSession::Open { range, .. } => Some(*range),
            SuggestionSession::Closed => None,
        }
    }

    /// Re-evaluates the session against the document and caret.
    ///
    /// Called after every keystroke and caret movement. Finds the nearest
    /// trigger character in the plain-text run ending at the caret, checks
    /// its prefix rule, and opens or updates the session accordingly; any
    /// miss closes it.
    pub fn observe(&mut self, doc: &Doc, caret: usize) -> SessionChange {
        match self.scan(doc, caret) {
            Some((range, query)) => {
                let was_open = self.is_open();
                let next = SuggestionSession::Open { range, query };
                if self.session == next {
                    return SessionChange::Unchanged;
                }
                self.session = next;
                if was_open {
                    SessionChange::Updated
                } else {
                    tracing::debug!(from = range.from, to = range.to, "suggestion session opened");
                    SessionChange::Opened
                }
            }
            None => self.exit(),
        }
    }

    /// Closes the session unconditionally, releasing all tracking state.
    /// Used for escape, focus loss, and commit.
    pub fn exit(&mut self) -> SessionChange {
        if self.is_open() {
            self.session = SuggestionSession::Closed;
            tracing::debug!("suggestion session closed");
            SessionChange::Exited
        } else {
            SessionChange::Unchanged
        }
    }

    /// Locates the trigger for the text run ending at `caret`.
    fn scan(&self, doc: &Doc, caret: usize) -> Option<(Range, String)> {
        let (run_start, text) = doc.text_run_before(caret);
        let chars: Vec<char> = text.chars().collect();
        let trigger_index = chars.iter().rposition(|&c| c == self.config.trigger)?;
        if !self.prefix_allowed(doc, run_start, &chars, trigger_index) {
            return None;
        }
        let query: String = chars[trigger_index + 1..].iter().collect();
        if query.chars().any(char::is_whitespace) {
            return None;
        }
        let from = run_start + trigger_index;
        Some((Range::new(from, caret), query))
    }

    /// Prefix rule: the trigger must follow the paragraph start or one of
    /// the allowed prefix characters. A preceding tag atom is not a valid
    /// prefix unless any prefix is allowed.
    fn prefix_allowed(&self, doc: &Doc, run_start: usize, chars: &[char], trigger_index: usize) -> bool {
        let Some(allowed) = &self.config.allowed_prefixes else {
            return true;
        };
        match trigger_index.checked_sub(1) {
            Some(prev) => allowed.contains(&chars[prev]),
            None => doc.at_paragraph_start(run_start),
        }
    }
}
