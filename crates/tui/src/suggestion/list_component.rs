//! Popup renderer for the suggestion list.
//!
//! Renders the candidate rows (group headings interleaved for grouped sets),
//! applies the highlight, and keeps the highlighted row inside the popup
//! viewport with minimal scrolling. An empty candidate set renders the
//! fallback message instead of rows.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::suggestion::state::{DisplayRow, SuggestionListState};
use crate::theme;

/// Fallback message when the candidate set is empty.
pub const DEFAULT_EMPTY_TEXT: &str = "no matches";

/// Decoration rendered before each group heading.
pub const DEFAULT_HEADING_PREFIX: &str = "▸ ";

/// Suggestion popup component.
#[derive(Debug)]
pub struct SuggestionList {
    /// Message rendered when there are no candidates
    pub empty_text: String,
    /// String rendered before each group heading
    pub heading_prefix: String,
}

impl Default for SuggestionList {
    fn default() -> Self {
        Self {
            empty_text: DEFAULT_EMPTY_TEXT.to_string(),
            heading_prefix: DEFAULT_HEADING_PREFIX.to_string(),
        }
    }
}

impl SuggestionList {
    /// Width and height (borders included) the popup wants for the current
    /// rows, capped at `max_rows` visible rows.
    pub fn desired_size(&self, state: &SuggestionListState, max_rows: u16) -> (u16, u16) {
        let rows = state.display_rows();
        if rows.is_empty() {
            return (self.empty_text.width() as u16 + 4, 3);
        }
        let widest = rows
            .iter()
            .map(|row| match row {
                DisplayRow::Heading(group) => self.heading_prefix.width() + group.width(),
                DisplayRow::Item(item) => item.display_label().width() + 2,
            })
            .max()
            .unwrap_or(0) as u16;
        let height = (rows.len() as u16).min(max_rows) + 2;
        (widest + 2, height)
    }

    /// Renders the popup into `area`, border included.
    pub fn render(&self, frame: &mut Frame, area: Rect, state: &mut SuggestionListState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(true));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if state.is_empty() {
            let fallback = Paragraph::new(Line::from(Span::styled(
                self.empty_text.clone(),
                theme::disabled_style(),
            )));
            frame.render_widget(fallback, inner);
            return;
        }

        let rows = state.display_rows();
        let items: Vec<ListItem<'_>> = rows
            .iter()
            .map(|row| match row {
                DisplayRow::Heading(group) => ListItem::new(Line::from(Span::styled(
                    format!("{}{group}", self.heading_prefix),
                    theme::heading_style(),
                ))),
                DisplayRow::Item(item) => {
                    let style = if item.disabled {
                        theme::disabled_style()
                    } else {
                        theme::row_style()
                    };
                    ListItem::new(Line::from(Span::styled(
                        format!(" {}", item.display_label()),
                        style,
                    )))
                }
            })
            .collect();

        // Bring the highlighted row into view with minimal movement before
        // handing the offset to the list widget.
        state.scroll.update(rows.len() as u16, inner.height);
        if let Some(row) = state.highlighted_row() {
            state.scroll.ensure_visible(row as u16);
        }

        let list = List::new(items).highlight_style(theme::highlight_style());
        let mut list_state = ListState::default();
        list_state.select(state.highlighted_row());
        *list_state.offset_mut() = state.scroll.offset() as usize;
        frame.render_stateful_widget(list, inner, &mut list_state);
    }
}
