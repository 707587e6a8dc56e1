//! Renderer for the tag input widget.
//!
//! Draws the bordered editor field (paragraph lines with tag chips, or the
//! placeholder while empty), positions the terminal cursor at the caret, and
//! overlays the suggestion popup while a session is open. Chip and popup
//! rectangles are recorded into the state each frame so mouse presses can be
//! hit-tested later.

use mentio_engine::{Doc, Inline};
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::suggestion::SuggestionList;
use crate::tag_input::placement::{self, POPUP_MAX_ROWS};
use crate::tag_input::state::{TagHitbox, TagInputState};
use crate::theme;

/// Tag input widget component; all state lives in [`TagInputState`].
#[derive(Debug, Default)]
pub struct TagInput;

impl TagInput {
    /// Renders the widget into `area` and records hit-test geometry.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &mut TagInputState) {
        state.editor_area = area;
        state.hitboxes.clear();
        state.anchor = None;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(state.editor().is_focused()));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if state.editor().is_empty() {
            let placeholder = Paragraph::new(Line::from(Span::styled(
                state.placeholder().to_string(),
                theme::placeholder_style(),
            )));
            frame.render_widget(placeholder, inner);
        } else {
            let (lines, hitboxes) = build_lines(state.editor().doc(), inner, state.is_readonly());
            state.hitboxes = hitboxes;
            frame.render_widget(Paragraph::new(Text::from(lines)), inner);
        }

        if state.editor().is_focused() && !state.is_readonly() {
            let (x, y) = position_to_cell(state.editor().doc(), state.editor().caret(), inner, state.is_readonly());
            frame.set_cursor_position((x, y));
        }

        if state.is_session_open() {
            let anchor = state
                .session_range()
                .map(|range| {
                    let (x, y) = position_to_cell(state.editor().doc(), range.from, inner, state.is_readonly());
                    Rect::new(x, y, 1, 1)
                })
                .unwrap_or_else(|| Rect::new(inner.x, inner.y, 1, 1));
            state.anchor = Some(anchor);

            let list = SuggestionList {
                empty_text: state.empty_text().to_string(),
                heading_prefix: state.heading_prefix().to_string(),
            };
            let (width, height) = list.desired_size(&state.list, POPUP_MAX_ROWS);
            let popup = placement::popup_area(anchor, frame.area(), width, height);
            frame.render_widget(Clear, popup);
            list.render(frame, popup, &mut state.list);
            state.popup_inner = Some(Block::default().borders(Borders::ALL).inner(popup));
        } else {
            state.popup_inner = None;
        }
    }
}

/// Rendered text of a tag chip.
fn chip_text(label: &str, readonly: bool) -> String {
    if readonly {
        format!("[{label}]")
    } else {
        format!("[{label} ✕]")
    }
}

/// Builds one line per paragraph, recording a hitbox per tag chip.
fn build_lines(doc: &Doc, inner: Rect, readonly: bool) -> (Vec<Line<'static>>, Vec<TagHitbox>) {
    let mut lines = Vec::new();
    let mut hitboxes = Vec::new();
    let mut start = 0usize;

    for (row, para) in doc.paragraphs().iter().enumerate() {
        let y = inner.y.saturating_add(row.min(u16::MAX as usize) as u16);
        let mut col = 0u16;
        let mut pos = start + 1;
        let mut spans: Vec<Span<'static>> = Vec::new();

        for inline in para.inlines() {
            match inline {
                Inline::Text(text) => {
                    spans.push(Span::styled(text.clone(), theme::text_style()));
                    col = col.saturating_add(text.width().min(u16::MAX as usize) as u16);
                }
                Inline::Tag(attrs) => {
                    let chip = chip_text(attrs.display_label(), readonly);
                    let width = chip.width().min(u16::MAX as usize) as u16;
                    let chip_x = inner.x.saturating_add(col);
                    let chip_area = Rect::new(chip_x, y, width, 1).intersection(inner);
                    // Remove glyph sits just inside the closing bracket.
                    let close = (!readonly).then(|| {
                        Rect::new(chip_x.saturating_add(width.saturating_sub(2)), y, 1, 1)
                            .intersection(inner)
                    });
                    hitboxes.push(TagHitbox {
                        pos,
                        area: chip_area,
                        close,
                    });
                    spans.push(Span::styled(chip, theme::chip_style()));
                    col = col.saturating_add(width);
                }
            }
            pos += inline.size();
        }

        lines.push(Line::from(spans));
        start += para.content_size() + 2;
    }
    (lines, hitboxes)
}

/// Screen cell of a document position, chip widths included.
fn position_to_cell(doc: &Doc, pos: usize, inner: Rect, readonly: bool) -> (u16, u16) {
    let mut start = 0usize;
    for (row, para) in doc.paragraphs().iter().enumerate() {
        let content = para.content_size();
        if pos <= start + 1 + content {
            let offset = pos.saturating_sub(start + 1);
            let mut col = 0usize;
            let mut remaining = offset;
            for inline in para.inlines() {
                if remaining == 0 {
                    break;
                }
                match inline {
                    Inline::Text(text) => {
                        for c in text.chars() {
                            if remaining == 0 {
                                break;
                            }
                            col += c.width().unwrap_or(0);
                            remaining -= 1;
                        }
                    }
                    Inline::Tag(attrs) => {
                        col += chip_text(attrs.display_label(), readonly).width();
                        remaining -= 1;
                    }
                }
            }
            let x = inner
                .x
                .saturating_add(col.min(u16::MAX as usize) as u16)
                .min(inner.x + inner.width.saturating_sub(1));
            let y = inner
                .y
                .saturating_add(row.min(u16::MAX as usize) as u16)
                .min(inner.y + inner.height.saturating_sub(1));
            return (x, y);
        }
        start += content + 2;
    }
    (inner.x, inner.y)
}
