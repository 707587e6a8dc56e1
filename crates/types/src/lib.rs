//! Shared data model for the mentio tag-input widget.
//!
//! These are plain data types passed between the embedding application, the
//! suggestion presenter, and the document engine: suggestion entries (flat or
//! grouped), the attribute payload carried by committed tag nodes, and the
//! document range type used by insert/replace operations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single selectable entry in the suggestion popup.
///
/// Identity is `value`, which must be unique within one candidate set and is
/// persisted onto the inserted tag node. Unknown JSON fields round-trip
/// through `extra` unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestionItem {
    /// Stable identity, persisted onto the committed tag node
    pub value: String,
    /// Display text; falls back to `value` when empty
    #[serde(default)]
    pub label: String,
    /// Disabled entries render but can never be highlighted or selected
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    /// Optional group membership, persisted onto the committed tag node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Opaque pass-through metadata, preserved in insertion order
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl SuggestionItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
            group: None,
            extra: IndexMap::new(),
        }
    }

    /// Marks the entry as disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Display text for list rows and tag chips.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() { &self.value } else { &self.label }
    }
}

/// A named section of suggestion entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupedItems {
    /// Section heading shown above the entries
    pub group: String,
    /// Entries in display order
    pub items: Vec<SuggestionItem>,
}

impl GroupedItems {
    pub fn new(group: impl Into<String>, items: Vec<SuggestionItem>) -> Self {
        Self {
            group: group.into(),
            items,
        }
    }
}

/// The current set of selectable suggestion entries.
///
/// A set is either entirely flat or entirely grouped, never mixed. The
/// untagged deserialization classifies by element shape: objects carrying
/// `group` + `items` produce a grouped set, anything else a flat one. A mixed
/// JSON array fails both arms and is rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandidateSet {
    /// Sectioned entries with headings
    Grouped(Vec<GroupedItems>),
    /// A plain ordered list of entries
    Flat(Vec<SuggestionItem>),
}

impl Default for CandidateSet {
    fn default() -> Self {
        Self::Flat(Vec::new())
    }
}

impl CandidateSet {
    /// Whether the set renders no rows at all (headings included).
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Flat(items) => items.is_empty(),
            Self::Grouped(groups) => groups.is_empty(),
        }
    }

    /// Flattened entries in display order, headings excluded.
    pub fn iter(&self) -> impl Iterator<Item = &SuggestionItem> {
        let (flat, grouped) = match self {
            Self::Flat(items) => (Some(items.iter()), None),
            Self::Grouped(groups) => (None, Some(groups.iter().flat_map(|g| g.items.iter()))),
        };
        flat.into_iter().flatten().chain(grouped.into_iter().flatten())
    }

    /// Flattened non-disabled entries in display order.
    ///
    /// This is the navigation order for highlight movement: group headings
    /// never appear, disabled entries are skipped.
    pub fn selectable(&self) -> Vec<&SuggestionItem> {
        self.iter().filter(|item| !item.disabled).collect()
    }

    /// The first non-disabled entry in display order, if any.
    pub fn first_selectable(&self) -> Option<&SuggestionItem> {
        self.iter().find(|item| !item.disabled)
    }

    /// Looks an entry up by identity.
    pub fn find(&self, value: &str) -> Option<&SuggestionItem> {
        self.iter().find(|item| item.value == value)
    }
}

/// Attribute payload stored on a committed tag node.
///
/// Serialized to and from the persisted document JSON unchanged, extras
/// included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagAttributes {
    pub value: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl TagAttributes {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            group: None,
            extra: IndexMap::new(),
        }
    }

    /// Display text for the rendered chip.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() { &self.value } else { &self.label }
    }
}

impl From<SuggestionItem> for TagAttributes {
    fn from(item: SuggestionItem) -> Self {
        Self {
            value: item.value,
            label: item.label,
            group: item.group,
            extra: item.extra,
        }
    }
}

/// A half-open span of document positions, `from` inclusive, `to` exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub from: usize,
    pub to: usize,
}

impl Range {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// A zero-width range at `pos`.
    pub fn caret(pos: usize) -> Self {
        Self { from: pos, to: pos }
    }

    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }

    /// Whether `pos` falls inside the span, both bounds inclusive.
    ///
    /// Used by the trigger controller to decide if the caret is still within
    /// the tracked trigger-plus-query text.
    pub fn contains(&self, pos: usize) -> bool {
        self.from <= pos && pos <= self.to
    }
}
