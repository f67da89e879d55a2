use crate::markup::{Point, to_lines, to_text};
use crate::ui::render::IndexEntry;

/// The raw buffer: lines of code points with markup left in place.
///
/// Edits are addressed by [`IndexEntry`], the raw position behind a screen
/// cell, so callers never compute raw columns themselves. Always holds at
/// least one (possibly empty) line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBuffer {
    lines: Vec<Vec<char>>,
}

impl RawBuffer {
    /// Create a new buffer from raw text.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: to_lines(text),
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    pub fn lines(&self) -> &[Vec<char>] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Length of a line in code points.
    pub fn line_len(&self, y: usize) -> usize {
        self.lines.get(y).map_or(0, Vec::len)
    }

    /// The full raw text, lines joined with `\n`.
    pub fn text(&self) -> String {
        to_text(&self.lines)
    }

    /// Raw position of an index entry. A line end resolves to the column
    /// just past the last character.
    pub fn resolve(&self, at: IndexEntry) -> Point {
        match at {
            IndexEntry::Char(p) => p,
            IndexEntry::LineEnd(y) => Point::new(self.line_len(y), y),
        }
    }

    /// Replace every line.
    pub fn set_lines(&mut self, lines: Vec<Vec<char>>) {
        self.lines = if lines.is_empty() {
            vec![Vec::new()]
        } else {
            lines
        };
    }

    /// Insert `chars` in front of the character at `at`, or at the end of
    /// the line for [`IndexEntry::LineEnd`].
    ///
    /// Returns `true` if the buffer changed.
    pub fn insert_at(&mut self, at: IndexEntry, chars: &[char]) -> bool {
        let (x, y) = match at {
            IndexEntry::Char(p) => (p.x, p.y),
            IndexEntry::LineEnd(y) => (self.line_len(y), y),
        };
        let Some(line) = self.lines.get_mut(y) else {
            return false;
        };
        if chars.is_empty() || x > line.len() {
            return false;
        }
        line.splice(x..x, chars.iter().copied());
        true
    }

    /// Delete the character at `at`.
    ///
    /// An escape entity is removed as a whole. At a line end the next line
    /// is joined onto this one.
    ///
    /// Returns `true` if the buffer changed.
    pub fn delete_at(&mut self, at: IndexEntry) -> bool {
        match at {
            IndexEntry::Char(p) => {
                let Some(line) = self.lines.get_mut(p.y) else {
                    return false;
                };
                let Some(&first) = line.get(p.x) else {
                    return false;
                };
                let end = if first == '&' {
                    line[p.x..]
                        .iter()
                        .position(|&c| c == ';')
                        .map_or(p.x + 1, |offset| p.x + offset + 1)
                } else {
                    p.x + 1
                };
                line.drain(p.x..end);
            }
            IndexEntry::LineEnd(y) => {
                if y + 1 >= self.lines.len() {
                    return false;
                }
                let next = self.lines.remove(y + 1);
                self.lines[y].extend(next);
            }
        }
        true
    }

    /// Break the line in front of the character at `at`. At a line end an
    /// empty line is inserted after it.
    ///
    /// Returns `true` if the buffer changed.
    pub fn split_at(&mut self, at: IndexEntry) -> bool {
        let (x, y) = match at {
            IndexEntry::Char(p) => (p.x, p.y),
            IndexEntry::LineEnd(y) => (self.line_len(y), y),
        };
        let Some(line) = self.lines.get_mut(y) else {
            return false;
        };
        if x > line.len() {
            return false;
        }
        let tail = line.split_off(x);
        self.lines.insert(y + 1, tail);
        true
    }
}

impl Default for RawBuffer {
    fn default() -> Self {
        Self::empty()
    }
}
