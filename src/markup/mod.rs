//! Inline markup carried by the raw buffer.
//!
//! The raw buffer stores text with a small tag language on top:
//! - `&amp;`, `&lt;`, `&gt;` escape the three special characters
//! - `<color:RRGGBB:RRGGBB>` switches foreground/background color
//! - `<select-from>` / `<select-to>` delimit the live selection
//!
//! Anything else that looks like markup is absorbed without a trace.

mod flatten;
mod token;

pub use flatten::{FlatIndex, Flattened, flatten};
pub use token::{Token, TokenKind, Tokenizer};

use std::cmp::Ordering;
use std::sync::LazyLock;

use ratatui::style::Color;
use regex::Regex;

/// Marker opening the selection.
pub const SELECT_FROM_TAG: &str = "<select-from>";
/// Marker closing the selection.
pub const SELECT_TO_TAG: &str = "<select-to>";

/// Matches a lone `<select-from>` marker.
pub static SELECT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&regex::escape(SELECT_FROM_TAG)).expect("select-from pattern is valid")
});

/// Matches a lone `<select-to>` marker.
pub static SELECT_TO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&regex::escape(SELECT_TO_TAG)).expect("select-to pattern is valid")
});

/// Matches a whole selection: both markers (in either order) and the text
/// between them. Group 2 is the selected raw text.
pub static SELECTION: LazyLock<Regex> = LazyLock::new(|| {
    let marker = format!(
        "({}|{})",
        regex::escape(SELECT_FROM_TAG),
        regex::escape(SELECT_TO_TAG)
    );
    Regex::new(&format!("(?s){marker}(.*?){marker}")).expect("selection pattern is valid")
});

/// Matches a complete color tag, capturing the foreground and background.
pub(crate) static COLOR_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^<color:([A-Fa-f0-9]{6}):([A-Fa-f0-9]{6})>$").expect("color tag pattern is valid")
});

/// A zero-based column/row position.
///
/// Depending on context this is a raw buffer position, a plain-text
/// position, or a cell on the screen grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Euclidean distance, rounded to the nearest cell.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn dist(self, other: Self) -> usize {
        let dx = self.x.abs_diff(other.x) as f64;
        let dy = self.y.abs_diff(other.y) as f64;
        dx.hypot(dy).round() as usize
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A range between two points, end exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Rounded distance between the endpoints. A size for logs and cursor
    /// heuristics, never a text offset.
    pub fn len(self) -> usize {
        self.start.dist(self.end)
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// Foreground/background color pair applied to rendered characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
}

impl Style {
    /// Style of ordinary text.
    pub const TEXT: Self = Self {
        fg: Color::Black,
        bg: Color::White,
    };

    /// Style of selected text: [`Style::TEXT`] inverted.
    pub const SELECTED: Self = Self::TEXT.inverted();

    /// Terminal default, used for padding and empty rows.
    pub const BLANK: Self = Self {
        fg: Color::Reset,
        bg: Color::Reset,
    };

    pub const fn inverted(self) -> Self {
        Self {
            fg: self.bg,
            bg: self.fg,
        }
    }

    /// Build a style from two `RRGGBB` hex strings.
    pub fn from_hex(fg: &str, bg: &str) -> Option<Self> {
        let fg = u32::from_str_radix(fg, 16).ok()?;
        let bg = u32::from_str_radix(bg, 16).ok()?;
        Some(Self {
            fg: Color::from_u32(fg),
            bg: Color::from_u32(bg),
        })
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::TEXT
    }
}

impl From<Style> for ratatui::style::Style {
    fn from(style: Style) -> Self {
        Self::default().fg(style.fg).bg(style.bg)
    }
}

/// Escape the characters that have a meaning in markup.
///
/// Must be applied to anything typed or pasted before it enters the raw
/// buffer.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Strip markup from `text` and decode escapes.
///
/// ```
/// use gridedit::markup::plain_text;
///
/// assert_eq!(plain_text("a &lt;b&gt; <color:ff0000:000000>c"), "a <b> c");
/// ```
pub fn plain_text(text: &str) -> String {
    plain_lines(&to_lines(text)).join("\n")
}

/// Decoded plain text of each raw line.
pub fn plain_lines(lines: &[Vec<char>]) -> Vec<String> {
    let mut plain: Vec<String> = Vec::new();
    for token in Tokenizer::new(lines) {
        match token.kind {
            TokenKind::Start | TokenKind::Newline => plain.push(String::new()),
            TokenKind::Char(c) => {
                if let Some(line) = plain.last_mut() {
                    line.push(c);
                }
            }
            _ => {}
        }
    }
    plain
}

/// Split text into raw lines of code points.
pub fn to_lines(text: &str) -> Vec<Vec<char>> {
    text.split('\n').map(|line| line.chars().collect()).collect()
}

/// Split a flat character sequence into raw lines.
pub fn chars_to_lines(chars: &[char]) -> Vec<Vec<char>> {
    chars.split(|&c| c == '\n').map(<[char]>::to_vec).collect()
}

/// Join raw lines back into text.
pub fn to_text(lines: &[Vec<char>]) -> String {
    let mut text = String::new();
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            text.push('\n');
        }
        text.extend(line.iter());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_escape_replaces_special_characters() {
        assert_eq!(escape("a&b<c>d"), "a&amp;b&lt;c&gt;d");
    }

    #[test]
    fn test_escape_ampersand_first() {
        // "&lt;" typed literally must survive as text, not turn into "<"
        assert_eq!(escape("&lt;"), "&amp;lt;");
        assert_eq!(plain_text(&escape("&lt;")), "&lt;");
    }

    #[test]
    fn test_plain_text_strips_selection_markers() {
        assert_eq!(plain_text("ab<select-from>c<select-to>d"), "abcd");
    }

    #[test]
    fn test_plain_text_keeps_lines() {
        assert_eq!(plain_text("one\n<color:00ff00:000000>two\n"), "one\ntwo\n");
    }

    #[test]
    fn test_plain_text_drops_unknown_tags_and_escapes() {
        assert_eq!(plain_text("a<bold>b&nbsp;c"), "abc");
    }

    #[test]
    fn test_to_lines_and_back() {
        let lines = to_lines("ab\n\ncd");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].is_empty());
        assert_eq!(to_text(&lines), "ab\n\ncd");
    }

    #[test]
    fn test_chars_to_lines_matches_to_lines() {
        let chars: Vec<char> = "x\ny\n".chars().collect();
        assert_eq!(chars_to_lines(&chars), to_lines("x\ny\n"));
    }

    #[test]
    fn test_point_orders_by_row_then_column() {
        assert!(Point::new(9, 0) < Point::new(0, 1));
        assert!(Point::new(1, 2) < Point::new(2, 2));
    }

    #[test]
    fn test_segment_len_is_rounded_distance() {
        assert_eq!(Segment::new(Point::new(0, 0), Point::new(3, 4)).len(), 5);
        assert_eq!(Segment::new(Point::new(2, 1), Point::new(3, 1)).len(), 1);
    }

    #[test]
    fn test_style_from_hex() {
        let style = Style::from_hex("FF0000", "00ff00").unwrap();
        assert_eq!(style.fg, Color::Rgb(255, 0, 0));
        assert_eq!(style.bg, Color::Rgb(0, 255, 0));
    }

    #[test]
    fn test_selected_style_is_inverted_text_style() {
        assert_eq!(Style::SELECTED.fg, Style::TEXT.bg);
        assert_eq!(Style::SELECTED.bg, Style::TEXT.fg);
    }

    #[test]
    fn test_selection_pattern_is_non_greedy() {
        let text = "<select-from>a<select-to>b<select-from>c<select-to>";
        let caps = SELECTION.captures(text).unwrap();
        assert_eq!(&caps[2], "a");
    }

    #[test]
    fn test_selection_pattern_spans_lines() {
        let caps = SELECTION.captures("x<select-from>a\nb<select-to>y").unwrap();
        assert_eq!(&caps[2], "a\nb");
    }

    proptest! {
        #[test]
        fn prop_escape_round_trips_through_tokenizer(text in "\\PC*") {
            prop_assert_eq!(plain_text(&escape(&text)), text);
        }

        #[test]
        fn prop_escape_round_trips_multiline(text in "[a-z&<>; \n]{0,40}") {
            prop_assert_eq!(plain_text(&escape(&text)), text);
        }
    }
}
