//! Flattening of the raw buffer into linear, indexed character sequences.
//!
//! Regex search needs a single haystack that can cross line boundaries.
//! [`flatten`] produces two of them, the raw text (markup included) and the
//! plain text (markup removed), each with an index back to both coordinate
//! spaces.

use super::{Point, TokenKind, Tokenizer};

/// Where one flat offset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatIndex {
    /// Position in the raw buffer.
    pub raw: Point,
    /// Position in the plain text (unwrapped line/column).
    pub screen: Point,
    /// Offset into [`Flattened::raw`].
    pub flat_raw: usize,
}

/// Output of [`flatten`].
///
/// Both index tables carry one extra trailing entry for the end of input, so
/// `raw_index.len() == raw.len() + 1` and
/// `screen_index.len() == screen.len() + 1`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Flattened {
    pub raw: Vec<char>,
    pub screen: Vec<char>,
    pub raw_index: Vec<FlatIndex>,
    pub screen_index: Vec<FlatIndex>,
}

impl Flattened {
    fn push_raw(&mut self, chars: &[char], from: Point, screen: Point) {
        for (offset, &c) in chars.iter().enumerate() {
            self.raw_index.push(FlatIndex {
                raw: Point::new(from.x + offset, from.y),
                screen,
                flat_raw: self.raw.len(),
            });
            self.raw.push(c);
        }
    }

    fn push_both(&mut self, entry: FlatIndex) {
        self.raw_index.push(entry);
        self.screen_index.push(entry);
    }
}

/// Flatten raw lines in a single pass over the token stream.
pub fn flatten(lines: &[Vec<char>]) -> Flattened {
    let mut flat = Flattened::default();
    let mut screen = Point::default();

    for token in Tokenizer::new(lines) {
        let absorbed_from = Point::new(token.pos.x - token.absorbed.len(), token.pos.y);
        flat.push_raw(token.absorbed, absorbed_from, screen);

        let entry = FlatIndex {
            raw: token.pos,
            screen,
            flat_raw: flat.raw.len(),
        };
        match token.kind {
            TokenKind::Start => {}
            TokenKind::Char(c) => {
                flat.screen_index.push(entry);
                flat.push_raw(token.span, token.pos, screen);
                flat.screen.push(c);
                screen.x += 1;
            }
            TokenKind::Newline => {
                flat.push_both(entry);
                flat.raw.push('\n');
                flat.screen.push('\n');
                screen = Point::new(0, screen.y + 1);
            }
            TokenKind::Eof => flat.push_both(entry),
            TokenKind::Style(_) | TokenKind::SelectionStart | TokenKind::SelectionEnd => {
                flat.push_raw(token.span, token.pos, screen);
            }
        }
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::to_lines;

    fn entry(raw: (usize, usize), screen: (usize, usize), flat_raw: usize) -> FlatIndex {
        FlatIndex {
            raw: Point::new(raw.0, raw.1),
            screen: Point::new(screen.0, screen.1),
            flat_raw,
        }
    }

    fn text(chars: &[char]) -> String {
        chars.iter().collect()
    }

    #[test]
    fn test_flatten_plain_text() {
        let flat = flatten(&to_lines("abc"));
        assert_eq!(text(&flat.raw), "abc");
        assert_eq!(text(&flat.screen), "abc");
        let want: Vec<_> = (0..4).map(|i| entry((i, 0), (i, 0), i)).collect();
        assert_eq!(flat.raw_index, want);
        assert_eq!(flat.screen_index, want);
    }

    #[test]
    fn test_flatten_selection_markers() {
        let input = "ab<select-from>c<select-to>";
        let flat = flatten(&to_lines(input));
        assert_eq!(text(&flat.raw), input);
        assert_eq!(text(&flat.screen), "abc");

        assert_eq!(flat.raw_index.len(), 28);
        for (i, e) in flat.raw_index.iter().enumerate() {
            assert_eq!(e.flat_raw, i);
            assert_eq!(e.raw, Point::new(i, 0));
        }
        // Markers sit at the screen position of the character they precede.
        assert_eq!(flat.raw_index[2].screen, Point::new(2, 0));
        assert_eq!(flat.raw_index[14].screen, Point::new(2, 0));
        assert_eq!(flat.raw_index[15].screen, Point::new(2, 0));
        assert_eq!(flat.raw_index[16].screen, Point::new(3, 0));
        assert_eq!(flat.raw_index[27].screen, Point::new(3, 0));

        assert_eq!(
            flat.screen_index,
            vec![
                entry((0, 0), (0, 0), 0),
                entry((1, 0), (1, 0), 1),
                entry((15, 0), (2, 0), 15),
                entry((27, 0), (3, 0), 27),
            ]
        );
    }

    #[test]
    fn test_flatten_color_tag() {
        let flat = flatten(&to_lines("a<color:ffffff:000000>bc"));
        assert_eq!(text(&flat.screen), "abc");
        assert_eq!(flat.raw_index.len(), 25);
        assert_eq!(flat.raw_index[1].screen, Point::new(1, 0));
        assert_eq!(flat.raw_index[22].screen, Point::new(1, 0));
        assert_eq!(flat.raw_index[23].screen, Point::new(2, 0));
        assert_eq!(
            flat.screen_index,
            vec![
                entry((0, 0), (0, 0), 0),
                entry((22, 0), (1, 0), 22),
                entry((23, 0), (2, 0), 23),
                entry((24, 0), (3, 0), 24),
            ]
        );
    }

    #[test]
    fn test_flatten_escape_collapses_to_one_screen_char() {
        let flat = flatten(&to_lines("&lt;x"));
        assert_eq!(text(&flat.screen), "<x");
        assert_eq!(flat.raw_index.len(), 6);
        assert!(flat.raw_index[..4].iter().all(|e| e.screen == Point::new(0, 0)));
        assert_eq!(flat.screen_index[1], entry((4, 0), (1, 0), 4));
    }

    #[test]
    fn test_flatten_multiline_resets_screen_column() {
        let flat = flatten(&to_lines("ab\n<select-to>c"));
        assert_eq!(text(&flat.raw), "ab\n<select-to>c");
        assert_eq!(text(&flat.screen), "ab\nc");
        assert_eq!(flat.screen_index[2], entry((2, 0), (2, 0), 2));
        assert_eq!(flat.screen_index[3], entry((11, 1), (0, 1), 14));
    }

    #[test]
    fn test_flatten_keeps_absorbed_markup_in_raw() {
        let input = "a<junk>b&bad;\nc";
        let flat = flatten(&to_lines(input));
        assert_eq!(text(&flat.raw), input);
        assert_eq!(text(&flat.screen), "ab\nc");
        assert_eq!(flat.raw_index.len(), flat.raw.len() + 1);
        assert_eq!(flat.screen_index.len(), flat.screen.len() + 1);
        for (i, e) in flat.raw_index.iter().enumerate() {
            assert_eq!(e.flat_raw, i);
        }
    }

    #[test]
    fn test_raw_index_offsets_are_monotonic() {
        let flat = flatten(&to_lines("x&amp;<color:010203:040506>y\n<select-from>z"));
        assert!(flat.raw_index.windows(2).all(|w| w[0].flat_raw <= w[1].flat_raw));
    }
}
