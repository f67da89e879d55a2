//! Markup tokenizer.

use super::{COLOR_TAG, Point, SELECT_FROM_TAG, SELECT_TO_TAG, Style};

/// What a [`Token`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Beginning of input. Always the first token.
    Start,
    /// A visible character, decoded from an escape if needed.
    Char(char),
    /// Boundary between two raw lines.
    Newline,
    /// A color tag; applies to the characters that follow.
    Style(Style),
    /// The first selection marker seen.
    SelectionStart,
    /// The second selection marker seen.
    SelectionEnd,
    /// End of input. Always the last token.
    Eof,
}

/// One parsed unit of the raw buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw position where `span` starts. For newline/eof this is the end of
    /// the line.
    pub pos: Point,
    /// The raw characters this token was decoded from.
    pub span: &'a [char],
    /// Raw characters immediately before `pos` that were consumed as markup
    /// without producing a token (unknown tags, bad escapes).
    pub absorbed: &'a [char],
}

/// Streams [`Token`]s out of raw buffer lines.
///
/// The scanner is in one of three states: plain text, inside an escape
/// (`&` up to `;`) or inside a tag (`<` up to `>`). The state resets at every
/// line boundary; whether a selection is open carries over.
///
/// ```
/// use gridedit::markup::{to_lines, TokenKind, Tokenizer};
///
/// let lines = to_lines("a&amp;");
/// let kinds: Vec<_> = Tokenizer::new(&lines).map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     [TokenKind::Start, TokenKind::Char('a'), TokenKind::Char('&'), TokenKind::Eof]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    lines: &'a [Vec<char>],
    x: usize,
    y: usize,
    /// Start of markup absorbed since the last emitted token on this line.
    pending: usize,
    in_selection: bool,
    started: bool,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub const fn new(lines: &'a [Vec<char>]) -> Self {
        Self {
            lines,
            x: 0,
            y: 0,
            pending: 0,
            in_selection: false,
            started: false,
            finished: false,
        }
    }

    fn decode_tag(&mut self, span: &[char]) -> Option<TokenKind> {
        let tag: String = span.iter().collect();
        if tag == SELECT_FROM_TAG || tag == SELECT_TO_TAG {
            let kind = if self.in_selection {
                TokenKind::SelectionEnd
            } else {
                TokenKind::SelectionStart
            };
            self.in_selection = !self.in_selection;
            return Some(kind);
        }
        let caps = COLOR_TAG.captures(&tag)?;
        Style::from_hex(&caps[1], &caps[2]).map(TokenKind::Style)
    }
}

fn decode_escape(span: &[char]) -> Option<char> {
    match span {
        ['&', 'a', 'm', 'p', ';'] => Some('&'),
        ['&', 'l', 't', ';'] => Some('<'),
        ['&', 'g', 't', ';'] => Some('>'),
        _ => None,
    }
}

/// End (exclusive) of markup opened at `start` and closed by `close`.
fn scan(line: &[char], start: usize, close: char) -> Option<usize> {
    line[start + 1..]
        .iter()
        .position(|&c| c == close)
        .map(|offset| start + offset + 2)
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if !self.started {
            self.started = true;
            return Some(Token {
                kind: TokenKind::Start,
                pos: Point::default(),
                span: &[],
                absorbed: &[],
            });
        }
        if self.finished {
            return None;
        }

        let lines = self.lines;
        loop {
            let Some(line) = lines.get(self.y) else {
                self.finished = true;
                return Some(Token {
                    kind: TokenKind::Eof,
                    pos: Point::default(),
                    span: &[],
                    absorbed: &[],
                });
            };

            if self.x >= line.len() {
                let token = Token {
                    kind: TokenKind::Newline,
                    pos: Point::new(line.len(), self.y),
                    span: &[],
                    absorbed: &line[self.pending.min(line.len())..],
                };
                if self.y + 1 < lines.len() {
                    self.y += 1;
                    self.x = 0;
                    self.pending = 0;
                    return Some(token);
                }
                self.finished = true;
                return Some(Token {
                    kind: TokenKind::Eof,
                    ..token
                });
            }

            let start = self.x;
            let decoded = match line[start] {
                '&' => scan(line, start, ';')
                    .map(|end| (end, decode_escape(&line[start..end]).map(TokenKind::Char))),
                '<' => scan(line, start, '>').map(|end| (end, self.decode_tag(&line[start..end]))),
                c => Some((start + 1, Some(TokenKind::Char(c)))),
            };
            // Unterminated markup swallows the rest of the line.
            let (end, kind) = decoded.unwrap_or((line.len(), None));
            self.x = end;

            if let Some(kind) = kind {
                let absorbed = &line[self.pending..start];
                self.pending = end;
                return Some(Token {
                    kind,
                    pos: Point::new(start, self.y),
                    span: &line[start..end],
                    absorbed,
                });
            }
        }
    }
}
