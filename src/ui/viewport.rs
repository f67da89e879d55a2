//! The window of screen lines currently on the display.

use std::ops::Range;

/// Display size plus the first screen line shown.
///
/// The last line may be scrolled up to the middle of the display, so the
/// offset stays within `total - max(1, height / 2)` rather than the last full
/// page.
///
/// # Example
///
/// ```
/// use gridedit::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 24, 100);
/// assert_eq!(vp.visible_range(), 0..24);
///
/// vp.scroll_down(10);
/// assert_eq!(vp.visible_range(), 10..34);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    width: usize,
    height: usize,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    pub const fn new(width: usize, height: usize, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    /// Index of the screen line on the top row.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// A zero-sized display is not drawn to.
    pub const fn is_renderable(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Screen lines on the display, cut short at the end of the buffer.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset.min(self.total_lines);
        let end = (self.offset + self.height).min(self.total_lines);
        start..end
    }

    pub fn visible_lines(&self) -> usize {
        self.visible_range().len()
    }

    pub const fn can_scroll_up(&self) -> bool {
        self.offset > 0
    }

    pub fn can_scroll_down(&self) -> bool {
        self.offset < self.max_offset()
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Scroll just enough that `line` is visible.
    pub fn scroll_to(&mut self, line: usize) {
        if line < self.offset {
            self.offset = line;
        } else if self.height > 0 && line >= self.offset + self.height {
            self.offset = line + 1 - self.height;
        }
        self.offset = self.offset.min(self.max_offset());
    }

    /// Take a new display size and line count after a re-render, keeping
    /// the offset in bounds.
    pub fn fit(&mut self, width: usize, height: usize, total: usize) {
        self.width = width;
        self.height = height;
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub((self.height / 2).max(1))
    }
}
