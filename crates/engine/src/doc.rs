//! Inline document tree and position arithmetic.
//!
//! A document is an ordered list of paragraphs; a paragraph is an ordered
//! list of inline nodes, either text runs or atomic tag nodes. Positions use
//! a token scheme: entering or leaving a paragraph costs one
//! position each, every character costs one, and a tag atom costs exactly
//! one. Tags therefore have node size 1 and the caret can never land inside
//! one.
//!
//! All range arguments are clamped to document bounds; a deletion that spans
//! a paragraph boundary joins the surrounding paragraphs.

use mentio_types::{Range, TagAttributes};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineError;

/// An inline node: a text run or an atomic tag.
#[derive(Clone, Debug, PartialEq)]
pub enum Inline {
    Text(String),
    Tag(TagAttributes),
}

impl Inline {
    /// Size in positions: one per character, one per tag atom.
    pub fn size(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            Self::Tag(_) => 1,
        }
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, Self::Tag(_))
    }
}

/// The editing unit used by range surgery: one character or one whole atom.
///
/// Converting a paragraph to units and back keeps splice logic trivial at the
/// cost of a copy, which is fine for input-field sized documents.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Unit {
    Char(char),
    Tag(TagAttributes),
}

/// A block of inline content.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Paragraph {
    inlines: Vec<Inline>,
}

impl Paragraph {
    pub fn inlines(&self) -> &[Inline] {
        &self.inlines
    }

    /// Size of the content between the open and close tokens.
    pub fn content_size(&self) -> usize {
        self.inlines.iter().map(Inline::size).sum()
    }

    fn units(&self) -> Vec<Unit> {
        let mut units = Vec::with_capacity(self.content_size());
        for inline in &self.inlines {
            match inline {
                Inline::Text(text) => units.extend(text.chars().map(Unit::Char)),
                Inline::Tag(attrs) => units.push(Unit::Tag(attrs.clone())),
            }
        }
        units
    }

    /// Rebuilds a paragraph from units, merging adjacent character runs.
    fn from_units(units: Vec<Unit>) -> Self {
        let mut inlines: Vec<Inline> = Vec::new();
        for unit in units {
            match unit {
                Unit::Char(c) => {
                    if let Some(Inline::Text(run)) = inlines.last_mut() {
                        run.push(c);
                    } else {
                        inlines.push(Inline::Text(c.to_string()));
                    }
                }
                Unit::Tag(attrs) => inlines.push(Inline::Tag(attrs)),
            }
        }
        Self { inlines }
    }
}

/// The document tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Doc {
    paragraphs: Vec<Paragraph>,
}

impl Default for Doc {
    /// An empty document is a single empty paragraph.
    fn default() -> Self {
        Self {
            paragraphs: vec![Paragraph::default()],
        }
    }
}

impl Doc {
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Total size in positions, paragraph open/close tokens included.
    pub fn size(&self) -> usize {
        self.paragraphs.iter().map(|p| p.content_size() + 2).sum()
    }

    /// True for the pristine single-empty-paragraph document.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.len() == 1 && self.paragraphs[0].inlines.is_empty()
    }

    /// Position of the open token of paragraph `index`.
    fn para_start(&self, index: usize) -> usize {
        self.paragraphs[..index].iter().map(|p| p.content_size() + 2).sum()
    }

    /// Resolves a position to `(paragraph index, content offset)`.
    ///
    /// Positions that land on a paragraph open token clamp to offset 0 of
    /// that paragraph; positions on a close token clamp to the end of its
    /// content. Positions past the end resolve into the last paragraph.
    pub(crate) fn resolve(&self, pos: usize) -> (usize, usize) {
        let mut start = 0usize;
        for (index, para) in self.paragraphs.iter().enumerate() {
            let content = para.content_size();
            if pos <= start {
                return (index, 0);
            }
            if pos <= start + 1 + content {
                return (index, pos - start - 1);
            }
            start += content + 2;
        }
        let last = self.paragraphs.len() - 1;
        (last, self.paragraphs[last].content_size())
    }

    /// Nearest valid caret position for `pos`.
    pub fn clamp_caret(&self, pos: usize) -> usize {
        let (para, offset) = self.resolve(pos);
        self.para_start(para) + 1 + offset
    }

    /// First valid caret position.
    pub fn min_caret(&self) -> usize {
        1
    }

    /// Last valid caret position.
    pub fn max_caret(&self) -> usize {
        let last = self.paragraphs.len() - 1;
        self.para_start(last) + 1 + self.paragraphs[last].content_size()
    }

    /// Caret one step to the left, crossing paragraph boundaries.
    pub fn prev_caret(&self, pos: usize) -> usize {
        let (para, offset) = self.resolve(pos);
        if offset > 0 {
            self.para_start(para) + offset
        } else if para > 0 {
            self.para_start(para - 1) + 1 + self.paragraphs[para - 1].content_size()
        } else {
            self.min_caret()
        }
    }

    /// Caret one step to the right, crossing paragraph boundaries.
    pub fn next_caret(&self, pos: usize) -> usize {
        let (para, offset) = self.resolve(pos);
        let content = self.paragraphs[para].content_size();
        if offset < content {
            self.para_start(para) + 1 + offset + 1
        } else if para + 1 < self.paragraphs.len() {
            self.para_start(para + 1) + 1
        } else {
            self.max_caret()
        }
    }

    /// Replaces `range` with `insert`, returning the caret position just
    /// after the inserted content.
    ///
    /// Bounds are clamped; a cross-paragraph range joins the first and last
    /// paragraph it touches.
    pub(crate) fn splice(&mut self, range: Range, insert: Vec<Unit>) -> usize {
        let from = range.from.min(range.to);
        let to = range.from.max(range.to);
        let (pa, xa) = self.resolve(from);
        let (pb, xb) = self.resolve(to);
        let inserted = insert.len();

        if pa == pb {
            let mut units = self.paragraphs[pa].units();
            let xb = xb.min(units.len());
            let xa = xa.min(xb);
            units.splice(xa..xb, insert);
            self.paragraphs[pa] = Paragraph::from_units(units);
            return self.para_start(pa) + 1 + xa + inserted;
        }

        let mut units = self.paragraphs[pa].units();
        units.truncate(xa);
        let xa = units.len();
        units.extend(insert);
        let tail = self.paragraphs[pb].units();
        units.extend(tail.into_iter().skip(xb));
        self.paragraphs[pa] = Paragraph::from_units(units);
        self.paragraphs.drain(pa + 1..=pb);
        self.para_start(pa) + 1 + xa + inserted
    }

    /// Splits the paragraph under `pos`, returning the caret at the start of
    /// the new paragraph.
    pub(crate) fn split_paragraph(&mut self, pos: usize) -> usize {
        let (para, offset) = self.resolve(pos);
        let units = self.paragraphs[para].units();
        let (head, tail) = units.split_at(offset.min(units.len()));
        self.paragraphs[para] = Paragraph::from_units(head.to_vec());
        self.paragraphs.insert(para + 1, Paragraph::from_units(tail.to_vec()));
        self.para_start(para + 1) + 1
    }

    /// Joins the paragraph at `para` into the previous one, returning the
    /// caret at the join point.
    pub(crate) fn join_with_previous(&mut self, para: usize) -> usize {
        debug_assert!(para > 0);
        let caret = self.para_start(para - 1) + 1 + self.paragraphs[para - 1].content_size();
        let tail = self.paragraphs.remove(para);
        let mut units = self.paragraphs[para - 1].units();
        units.extend(tail.units());
        self.paragraphs[para - 1] = Paragraph::from_units(units);
        caret
    }

    /// Visits every inline node in document order with its position.
    pub fn walk<'a>(&'a self, mut f: impl FnMut(usize, usize, &'a Inline)) {
        let mut start = 0usize;
        for (index, para) in self.paragraphs.iter().enumerate() {
            let mut pos = start + 1;
            for inline in &para.inlines {
                f(index, pos, inline);
                pos += inline.size();
            }
            start += para.content_size() + 2;
        }
    }

    /// Every tag node in document order with its position.
    ///
    /// Recomputed by a full scan on every call; positions are invalidated by
    /// any subsequent mutation.
    pub fn tags(&self) -> Vec<(usize, &TagAttributes)> {
        let mut tags = Vec::new();
        self.walk(|_, pos, inline| {
            if let Inline::Tag(attrs) = inline {
                tags.push((pos, attrs));
            }
        });
        tags
    }

    /// The run of plain text immediately before `caret` within its
    /// paragraph, stopping at a tag atom or the paragraph start.
    ///
    /// Returns the position of the run's first character and the text. This
    /// is the window the suggestion trigger scanner inspects.
    pub fn text_run_before(&self, caret: usize) -> (usize, String) {
        let (para, offset) = self.resolve(caret);
        let units = self.paragraphs[para].units();
        let mut chars: Vec<char> = Vec::new();
        for unit in units[..offset.min(units.len())].iter().rev() {
            match unit {
                Unit::Char(c) => chars.push(*c),
                Unit::Tag(_) => break,
            }
        }
        chars.reverse();
        let start = self.para_start(para) + 1 + offset - chars.len();
        (start, chars.into_iter().collect())
    }

    /// Whether `pos` sits at the very start of its paragraph's content.
    pub fn at_paragraph_start(&self, pos: usize) -> bool {
        self.resolve(pos).1 == 0
    }

    /// Plain text inside `range`; tag atoms contribute nothing.
    pub fn text_in(&self, range: Range) -> String {
        let mut out = String::new();
        self.walk(|_, pos, inline| {
            if let Inline::Text(text) = inline {
                for (i, c) in text.chars().enumerate() {
                    let p = pos + i;
                    if p >= range.from && p < range.to {
                        out.push(c);
                    }
                }
            }
        });
        out
    }

    // ----- JSON (de)serialization -----

    /// Serializes to the persisted JSON tree.
    pub fn to_json(&self) -> Value {
        let content: Vec<NodeJson> = self
            .paragraphs
            .iter()
            .map(|para| NodeJson::Paragraph {
                content: para
                    .inlines
                    .iter()
                    .map(|inline| match inline {
                        Inline::Text(text) => NodeJson::Text { text: text.clone() },
                        Inline::Tag(attrs) => NodeJson::Tag { attrs: attrs.clone() },
                    })
                    .collect(),
            })
            .collect();
        serde_json::to_value(NodeJson::Doc { content }).unwrap_or(Value::Null)
    }

    /// Parses a persisted JSON tree, validating the schema.
    pub fn from_json(value: Value) -> Result<Self, EngineError> {
        let node: NodeJson =
            serde_json::from_value(value).map_err(|err| EngineError::Schema(err.to_string()))?;
        let NodeJson::Doc { content } = node else {
            return Err(EngineError::Schema("root node must be a doc".into()));
        };
        let mut paragraphs = Vec::new();
        for child in content {
            let NodeJson::Paragraph { content } = child else {
                return Err(EngineError::Schema("doc children must be paragraphs".into()));
            };
            let mut inlines: Vec<Inline> = Vec::new();
            for node in content {
                let inline = match node {
                    NodeJson::Text { text } => Inline::Text(text),
                    NodeJson::Tag { attrs } => Inline::Tag(attrs),
                    _ => {
                        return Err(EngineError::Schema(
                            "paragraph children must be text or tag nodes".into(),
                        ));
                    }
                };
                // Merge adjacent text runs so positions stay canonical.
                if let (Inline::Text(text), Some(Inline::Text(run))) = (&inline, inlines.last_mut()) {
                    run.push_str(text);
                } else {
                    inlines.push(inline);
                }
            }
            paragraphs.push(Paragraph { inlines });
        }
        if paragraphs.is_empty() {
            paragraphs.push(Paragraph::default());
        }
        Ok(Self { paragraphs })
    }
}

/// Wire shape of the persisted document tree.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum NodeJson {
    Doc {
        #[serde(default)]
        content: Vec<NodeJson>,
    },
    Paragraph {
        #[serde(default)]
        content: Vec<NodeJson>,
    },
    Text {
        text: String,
    },
    Tag {
        attrs: TagAttributes,
    },
}
