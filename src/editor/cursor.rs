use crate::markup::Point;
use crate::ui::render::{IndexEntry, Rendered, render};
use crate::ui::viewport::Viewport;

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// What the user sees: the rendered screen lines, the scroll position and
/// the cursor.
///
/// The cursor is a screen position relative to the top of the viewport. It
/// is clamped after every movement so that it always sits on a visible line
/// and at most one cell past the line's last character.
#[derive(Debug, Clone, Default)]
pub struct View {
    rendered: Rendered,
    viewport: Viewport,
    cursor: Point,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub const fn cursor(&self) -> Point {
        self.cursor
    }

    /// Move the cursor to `cursor`, clamped.
    pub fn set_cursor(&mut self, cursor: Point) {
        self.cursor = cursor;
        self.clamp_cursor();
    }

    /// Re-render `lines` for a `width` x `height` display.
    pub fn update(&mut self, lines: &[Vec<char>], width: usize, height: usize) {
        self.rendered = render(lines, width, height);
        self.viewport.fit(width, height, self.rendered.line_count());
        self.clamp_cursor();
    }

    /// Re-render `lines` at the current size.
    pub fn refresh(&mut self, lines: &[Vec<char>]) {
        self.update(lines, self.viewport.width(), self.viewport.height());
    }

    /// Cursor position counted from the first screen line rather than the
    /// top of the viewport.
    pub const fn absolute_cursor(&self) -> Point {
        Point::new(self.cursor.x, self.viewport.offset() + self.cursor.y)
    }

    fn row_width(&self, y: usize) -> usize {
        self.rendered.line_width(self.viewport.offset() + y)
    }

    /// Raw position under the cursor.
    pub fn entry_at_cursor(&self) -> Option<IndexEntry> {
        self.rendered
            .entry(self.cursor.x, self.viewport.offset() + self.cursor.y)
    }

    /// Character shown at screen position `p`: `'\n'` past the end of a
    /// line, `'\0'` past the end of the buffer.
    pub fn char_at(&self, p: Point) -> char {
        match self.rendered.line(self.viewport.offset() + p.y) {
            Some(line) => line.get(p.x).copied().unwrap_or('\n'),
            None => '\0',
        }
    }

    /// Column of the first non-whitespace character on screen row `y`.
    pub fn indentation(&self, y: usize) -> usize {
        let line = self
            .rendered
            .line(self.viewport.offset() + y)
            .unwrap_or_default();
        line.iter()
            .position(|c| !c.is_whitespace())
            .unwrap_or(line.len())
    }

    fn can_move(&self, direction: Direction) -> bool {
        let Point { x, y } = self.cursor;
        match direction {
            Direction::Up => y > 0,
            Direction::Left => x > 0,
            Direction::Down => {
                y + 1 < self.viewport.height()
                    && self.viewport.offset() + y + 1 < self.rendered.line_count()
            }
            Direction::Right => x + 1 < self.viewport.width() && x < self.row_width(y),
        }
    }

    /// Move one step. Returns `false` if the cursor could not move and the
    /// view could not scroll.
    pub fn move_cursor(&mut self, direction: Direction) -> bool {
        if !self.viewport.is_renderable() {
            return false;
        }
        let moved = match direction {
            Direction::Up => {
                if self.can_move(Direction::Up) {
                    self.cursor.y -= 1;
                    true
                } else if self.viewport.can_scroll_up() {
                    self.viewport.scroll_up(1);
                    true
                } else {
                    false
                }
            }
            Direction::Left => {
                if self.can_move(Direction::Left) {
                    self.cursor.x -= 1;
                    true
                } else if self.can_move(Direction::Up) {
                    self.cursor.y -= 1;
                    self.cursor.x = self.row_width(self.cursor.y);
                    true
                } else if self.viewport.can_scroll_up() {
                    self.viewport.scroll_up(1);
                    self.cursor.x = self.row_width(self.cursor.y);
                    self.clamp_cursor();
                    if self.can_move(Direction::Left) {
                        self.cursor.x -= 1;
                    }
                    true
                } else {
                    false
                }
            }
            Direction::Down => {
                if self.can_move(Direction::Down) {
                    self.cursor.y += 1;
                    true
                } else if self.viewport.can_scroll_down() {
                    self.viewport.scroll_down(1);
                    true
                } else {
                    false
                }
            }
            Direction::Right => {
                if self.can_move(Direction::Right) {
                    self.cursor.x += 1;
                    true
                } else if self.can_move(Direction::Down) {
                    self.cursor.y += 1;
                    self.cursor.x = 0;
                    true
                } else if self.viewport.offset() + self.cursor.y + 1 < self.rendered.line_count()
                    && self.viewport.can_scroll_down()
                {
                    self.viewport.scroll_down(1);
                    self.cursor.x = 0;
                    true
                } else {
                    false
                }
            }
        };
        self.clamp_cursor();
        moved
    }

    /// Step in `direction` until a step fails or `stop` holds.
    ///
    /// Returns `true` if the cursor moved at all.
    pub fn move_cursor_until<F>(&mut self, direction: Direction, mut stop: F) -> bool
    where
        F: FnMut(&Self) -> bool,
    {
        let mut moved = false;
        while self.move_cursor(direction) {
            moved = true;
            if stop(self) {
                break;
            }
        }
        moved
    }

    /// Jump to the next change of indentation (up/down) or of
    /// whitespace/non-whitespace (left/right).
    pub fn jump(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Up | Direction::Down => {
                let start = self.indentation(self.cursor.y);
                self.move_cursor_until(direction, |view| {
                    view.indentation(view.cursor.y) != start
                })
            }
            Direction::Left | Direction::Right => {
                let start = self.char_at(self.cursor).is_whitespace();
                self.move_cursor_until(direction, |view| {
                    view.char_at(view.cursor).is_whitespace() != start
                })
            }
        }
    }

    /// Up to one display height of single steps.
    pub fn page(&mut self, direction: Direction) {
        for _ in 0..self.viewport.height() {
            if !self.move_cursor(direction) {
                break;
            }
        }
    }

    /// Top of the buffer.
    pub fn go_to_start(&mut self) {
        self.viewport.go_to_top();
        self.set_cursor(Point::default());
    }

    /// Append position of the last line, scrolled as far down as allowed.
    pub fn go_to_end(&mut self) {
        self.viewport.go_to_bottom();
        let y = self.viewport.visible_lines().saturating_sub(1);
        let x = self.row_width(y);
        self.set_cursor(Point::new(x, y));
    }

    /// Put the cursor on the cell showing raw position `raw`, scrolling if
    /// needed. Returns `false` if no such cell exists.
    pub fn place_at_raw(&mut self, raw: Point) -> bool {
        let Some(screen) = self.rendered.locate(raw) else {
            return false;
        };
        self.viewport.scroll_to(screen.y);
        let y = screen.y.saturating_sub(self.viewport.offset());
        self.set_cursor(Point::new(screen.x, y));
        true
    }

    /// Keep the cursor on a visible line and within reach of its end.
    pub fn clamp_cursor(&mut self) {
        if !self.viewport.is_renderable() {
            return;
        }
        let rows = self.viewport.visible_lines().max(1);
        self.cursor.y = self.cursor.y.min(rows - 1);
        let columns = self
            .viewport
            .width()
            .min(self.row_width(self.cursor.y) + 1);
        self.cursor.x = self.cursor.x.min(columns.saturating_sub(1));
    }
}
