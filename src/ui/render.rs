//! Screen rendering.
//!
//! [`render`] folds the token stream into wrapped screen lines, and
//! [`draw`] copies the visible part onto a [`Display`].

use crate::display::Display;
use crate::markup::{Point, Style, Token, TokenKind, Tokenizer};

use super::viewport::Viewport;

/// Raw position behind one screen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexEntry {
    /// A visible character rendered from the raw span starting here.
    Char(Point),
    /// The append position at the end of raw line `y`. Every wrapped line
    /// ends with one, and it is the only entry of an empty line.
    LineEnd(usize),
}

/// Wrapped, markup-free screen lines with their raw index and styles.
///
/// For every line `i`: `index[i].len() == lines[i].len() + 1` and
/// `styles[i].len() == lines[i].len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    lines: Vec<Vec<char>>,
    index: Vec<Vec<IndexEntry>>,
    styles: Vec<Vec<Style>>,
}

impl Rendered {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, y: usize) -> Option<&[char]> {
        self.lines.get(y).map(Vec::as_slice)
    }

    /// Characters on screen line `y`, 0 past the end.
    pub fn line_width(&self, y: usize) -> usize {
        self.lines.get(y).map_or(0, Vec::len)
    }

    pub fn entry(&self, x: usize, y: usize) -> Option<IndexEntry> {
        self.index.get(y)?.get(x).copied()
    }

    pub fn style(&self, x: usize, y: usize) -> Option<Style> {
        self.styles.get(y)?.get(x).copied()
    }

    /// Screen position showing raw position `raw`.
    ///
    /// Markup has no cell of its own, so a raw position inside markup maps
    /// to the next visible character on the same raw line, or to the line's
    /// append position.
    pub fn locate(&self, raw: Point) -> Option<Point> {
        let mut line_end = None;
        for (y, row) in self.index.iter().enumerate() {
            for (x, entry) in row.iter().enumerate() {
                match *entry {
                    IndexEntry::Char(p) if p.y == raw.y && p.x >= raw.x => {
                        return Some(Point::new(x, y));
                    }
                    IndexEntry::LineEnd(line) if line == raw.y => {
                        line_end = Some(Point::new(x, y));
                    }
                    _ => {}
                }
            }
        }
        line_end
    }

    /// Screen lines as strings, for tests and diagnostics.
    pub fn text_lines(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.iter().collect()).collect()
    }
}

/// Fold state for [`render`].
struct Wrap {
    width: usize,
    out: Rendered,
    style: Style,
    saved: Style,
}

impl Wrap {
    fn new(width: usize) -> Self {
        Self {
            width,
            out: Rendered::default(),
            style: Style::TEXT,
            saved: Style::TEXT,
        }
    }

    fn open(&mut self) {
        self.out.lines.push(Vec::new());
        self.out.index.push(Vec::new());
        self.out.styles.push(Vec::new());
    }

    fn close(&mut self, raw_line: usize) {
        if let Some(row) = self.out.index.last_mut() {
            row.push(IndexEntry::LineEnd(raw_line));
        }
    }

    fn step(mut self, token: Token<'_>) -> Self {
        match token.kind {
            TokenKind::Start => self.open(),
            TokenKind::Newline => {
                self.close(token.pos.y);
                self.open();
            }
            TokenKind::Char(c) => {
                if let (Some(line), Some(row), Some(styles)) = (
                    self.out.lines.last_mut(),
                    self.out.index.last_mut(),
                    self.out.styles.last_mut(),
                ) {
                    line.push(c);
                    row.push(IndexEntry::Char(token.pos));
                    styles.push(self.style);
                    if line.len() > self.width - 1 {
                        self.close(token.pos.y);
                        self.open();
                    }
                }
            }
            TokenKind::Style(style) => self.style = style,
            TokenKind::SelectionStart => {
                self.saved = self.style;
                self.style = Style::SELECTED;
            }
            TokenKind::SelectionEnd => self.style = self.saved,
            TokenKind::Eof => self.close(token.pos.y),
        }
        self
    }
}

/// Rebuild the screen lines for a `width` x `height` display.
///
/// Lines are hard-wrapped at `width` characters. A zero-sized display gets
/// no lines at all.
pub fn render(lines: &[Vec<char>], width: usize, height: usize) -> Rendered {
    if width == 0 || height == 0 {
        return Rendered::default();
    }
    let rendered = Tokenizer::new(lines)
        .fold(Wrap::new(width), Wrap::step)
        .out;
    tracing::trace!(
        raw_lines = lines.len(),
        screen_lines = rendered.line_count(),
        width,
        height,
        "rendered"
    );
    rendered
}

/// Copy the visible rows of `rendered` onto `display`.
///
/// Cells past the end of a line and rows past the end of the buffer are
/// blanked in the terminal's default colors.
pub fn draw<D: Display + ?Sized>(rendered: &Rendered, viewport: &Viewport, display: &mut D) {
    if !viewport.is_renderable() {
        return;
    }
    for row in 0..viewport.height() {
        let y = viewport.offset() + row;
        for x in 0..viewport.width() {
            let cell = rendered
                .line(y)
                .and_then(|line| line.get(x).copied())
                .zip(rendered.style(x, y));
            match cell {
                Some((c, style)) => display.set_cell(x, row, c, style),
                None => display.set_cell(x, row, ' ', Style::BLANK),
            }
        }
    }
}
