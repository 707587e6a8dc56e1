//! Vertical scroll bookkeeping for the suggestion popup.
//!
//! Tracks content height, viewport height, and the current offset, and
//! brings a given row into view with minimal movement: the viewport scrolls
//! only as far as needed to uncover the row, never past it.

/// Metrics for a vertically scrollable row list, in terminal row units.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollMetrics {
    offset: u16,
    content_height: u16,
    viewport_height: u16,
}

impl ScrollMetrics {
    /// Current vertical scroll offset.
    pub const fn offset(&self) -> u16 {
        self.offset
    }

    /// Maximum valid scroll offset.
    pub fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Whether content exceeds the viewport.
    pub fn is_scrollable(&self) -> bool {
        self.content_height > self.viewport_height && self.viewport_height > 0
    }

    /// Resets offset and dimensions.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Updates both dimensions and clamps the current offset.
    pub fn update(&mut self, content_height: u16, viewport_height: u16) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Scrolls just far enough that `row` is fully visible.
    ///
    /// A row above the viewport becomes the top row; a row below it becomes
    /// the bottom row; a visible row leaves the offset untouched.
    pub fn ensure_visible(&mut self, row: u16) {
        if self.viewport_height == 0 {
            return;
        }
        if row < self.offset {
            self.offset = row;
        } else if row >= self.offset + self.viewport_height {
            self.offset = row + 1 - self.viewport_height;
        }
        self.offset = self.offset.min(self.max_offset());
    }
}

#[cfg(test)]
mod tests {
    use super::ScrollMetrics;

    #[test]
    fn ensure_visible_scrolls_minimally() {
        let mut metrics = ScrollMetrics::default();
        metrics.update(20, 5);

        // Already visible: untouched.
        metrics.ensure_visible(3);
        assert_eq!(metrics.offset(), 0);

        // One row below the viewport: scroll down by exactly one.
        metrics.ensure_visible(5);
        assert_eq!(metrics.offset(), 1);

        // Far below: row becomes the bottom row.
        metrics.ensure_visible(12);
        assert_eq!(metrics.offset(), 8);

        // Above: row becomes the top row.
        metrics.ensure_visible(2);
        assert_eq!(metrics.offset(), 2);
    }

    #[test]
    fn offset_clamps_to_content() {
        let mut metrics = ScrollMetrics::default();
        metrics.update(10, 4);
        metrics.ensure_visible(9);
        assert_eq!(metrics.offset(), 6);

        // Shrinking content pulls the offset back into range.
        metrics.update(5, 4);
        assert_eq!(metrics.offset(), 1);
    }

    #[test]
    fn short_content_never_scrolls() {
        let mut metrics = ScrollMetrics::default();
        metrics.update(3, 6);
        assert!(!metrics.is_scrollable());
        metrics.ensure_visible(2);
        assert_eq!(metrics.offset(), 0);
    }
}
