//! Popup placement relative to the trigger anchor.
//!
//! The popup opens below the anchor cell unless its height would run past
//! the bottom of the viewport, in which case it opens above. Horizontal
//! position starts at the anchor column and is clamped to the viewport's
//! right edge. This avoids clipping at the screen's bottom edge; it is a
//! heuristic, not pixel-exact centering.

use ratatui::layout::Rect;

/// Maximum visible candidate rows before the popup scrolls.
pub const POPUP_MAX_ROWS: u16 = 6;

/// Computes the popup rectangle for a one-cell `anchor` within `viewport`.
pub fn popup_area(anchor: Rect, viewport: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(viewport.width);
    let height = height.min(viewport.height);

    let below = anchor.y + 1;
    let y = if below + height > viewport.y + viewport.height {
        anchor.y.saturating_sub(height).max(viewport.y)
    } else {
        below
    };

    let max_x = (viewport.x + viewport.width).saturating_sub(width);
    let x = anchor.x.min(max_x).max(viewport.x);

    Rect::new(x, y, width, height)
}
