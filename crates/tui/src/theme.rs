//! Theme and styling for the tag-input widget.
//!
//! A small constant palette plus style helpers, shared by the editor line,
//! the tag chips, and the suggestion popup.

use ratatui::style::{Color, Modifier, Style};

/// Accent color for focus indicators and the highlighted suggestion row.
pub const ACCENT: Color = Color::Rgb(8, 171, 237);

/// Primary foreground color for typed text.
pub const FG: Color = Color::Rgb(224, 224, 230);

/// Muted foreground for placeholder text, group headings, and hints.
pub const FG_MUTED: Color = Color::Rgb(140, 140, 150);

/// Border color for the unfocused editor field.
pub const BORDER: Color = Color::Rgb(72, 72, 80);

/// Background for committed tag chips.
pub const BG_CHIP: Color = Color::Rgb(20, 48, 64);

/// Background for the popup's highlighted row.
pub const BG_SELECT: Color = Color::Rgb(18, 28, 38);

/// Style for regular editor text.
pub fn text_style() -> Style {
    Style::default().fg(FG)
}

/// Style for placeholder text shown in an empty editor.
pub fn placeholder_style() -> Style {
    Style::default().fg(FG_MUTED).add_modifier(Modifier::ITALIC)
}

/// Style for a committed tag chip.
pub fn chip_style() -> Style {
    Style::default().fg(ACCENT).bg(BG_CHIP)
}

/// Style for the editor border, focus-aware.
pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(BORDER)
    }
}

/// Style for the highlighted suggestion row.
pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT).bg(BG_SELECT).add_modifier(Modifier::BOLD)
}

/// Style for a selectable suggestion row.
pub fn row_style() -> Style {
    Style::default().fg(FG)
}

/// Style for disabled suggestion rows.
pub fn disabled_style() -> Style {
    Style::default().fg(FG_MUTED).add_modifier(Modifier::DIM)
}

/// Style for group heading rows.
pub fn heading_style() -> Style {
    Style::default().fg(FG_MUTED).add_modifier(Modifier::BOLD)
}
