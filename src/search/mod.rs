//! Regex search and replace over the raw buffer.
//!
//! Provides:
//! - Matching in raw space (markup visible to the pattern) or screen space
//!   (markup invisible, escapes decoded)
//! - Matches that cross line boundaries
//! - Per-match accept/decline callback with raw and screen coordinates
//! - Capture-group expansion in the replacement template

use regex::{Captures, Regex};

use crate::markup::{FlatIndex, Flattened, Segment, chars_to_lines, flatten};

/// Which text a pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchSpace {
    /// The raw buffer, markup included.
    #[default]
    Raw,
    /// The plain text, markup removed and escapes decoded.
    Screen,
}

/// Haystack string with the byte offset of every character, plus the total
/// length as a final entry.
struct Haystack {
    text: String,
    offsets: Vec<usize>,
}

impl Haystack {
    fn new(chars: &[char]) -> Self {
        let mut text = String::with_capacity(chars.len());
        let mut offsets = Vec::with_capacity(chars.len() + 1);
        for &c in chars {
            offsets.push(text.len());
            text.push(c);
        }
        offsets.push(text.len());
        Self { text, offsets }
    }

    /// Character count.
    fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Character index of a byte offset.
    fn char_at(&self, byte: usize) -> usize {
        self.offsets.partition_point(|&b| b < byte)
    }
}

/// End (exclusive) of the raw span starting at `flat_raw`.
fn raw_span_end(raw: &[char], flat_raw: usize) -> usize {
    if raw.get(flat_raw) == Some(&'&') {
        raw[flat_raw..]
            .iter()
            .position(|&c| c == ';')
            .map_or(raw.len(), |offset| flat_raw + offset + 1)
    } else {
        (flat_raw + 1).min(raw.len())
    }
}

/// Raw offsets `[from, to)` that a match covering `index[start..end]`
/// replaces.
fn replaced_range(
    flat: &Flattened,
    space: SearchSpace,
    index: &[FlatIndex],
    start: usize,
    end: usize,
) -> (usize, usize) {
    let last = index.len() - 1;
    let from = index[start.min(last)].flat_raw;
    let to = match space {
        _ if end <= start => from,
        SearchSpace::Raw => index[end.min(last)].flat_raw,
        SearchSpace::Screen => raw_span_end(&flat.raw, index[(end - 1).min(last)].flat_raw),
    };
    (from, to.max(from))
}

/// Find every non-overlapping match of `pattern`, left to right, and replace
/// those that `decide` accepts with `template`.
///
/// `decide` receives the matched text and its raw and screen segments.
/// `template` is expanded with the match's capture groups (`$1`, `${name}`)
/// and inserted into the raw buffer verbatim.
///
/// Returns the new raw lines, or `None` if nothing was replaced.
pub fn replace<F>(
    lines: &[Vec<char>],
    space: SearchSpace,
    pattern: &Regex,
    template: &str,
    mut decide: F,
) -> Option<Vec<Vec<char>>>
where
    F: FnMut(&str, Segment, Segment) -> bool,
{
    let flat = flatten(lines);
    let (chars, index) = match space {
        SearchSpace::Raw => (&flat.raw, &flat.raw_index),
        SearchSpace::Screen => (&flat.screen, &flat.screen_index),
    };
    let haystack = Haystack::new(chars);
    let last = index.len() - 1;

    let mut out: Vec<char> = Vec::with_capacity(flat.raw.len());
    let mut copied = 0;
    let mut replaced = 0usize;
    let mut offset = 0;

    // Searching from an offset in the whole haystack keeps `^` and `\b`
    // anchored to the real start of text.
    loop {
        let Some(caps) = pattern.captures_at(&haystack.text, haystack.offsets[offset]) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        let start = haystack.char_at(whole.start());
        let end = haystack.char_at(whole.end());

        let from = index[start.min(last)];
        let to = index[end.min(last)];
        let raw_segment = Segment::new(from.raw, to.raw);
        let screen_segment = Segment::new(from.screen, to.screen);

        if decide(whole.as_str(), raw_segment, screen_segment) {
            let (raw_from, raw_to) = replaced_range(&flat, space, index, start, end);
            out.extend_from_slice(&flat.raw[copied.min(raw_from)..raw_from]);
            out.extend(expand(&caps, template).chars());
            copied = copied.max(raw_to);
            replaced += 1;
        }

        offset = end.max(start + 1);
        if offset >= haystack.len() {
            break;
        }
    }

    tracing::trace!(?space, replaced, "replace pass finished");
    if replaced == 0 {
        return None;
    }
    out.extend_from_slice(&flat.raw[copied..]);
    Some(chars_to_lines(&out))
}

fn expand(caps: &Captures<'_>, template: &str) -> String {
    let mut dst = String::new();
    caps.expand(template, &mut dst);
    dst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{Point, SELECTION, to_lines, to_text};

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    fn run(text: &str, space: SearchSpace, pattern: &str, template: &str) -> Option<String> {
        replace(&to_lines(text), space, &re(pattern), template, |_, _, _| true)
            .map(|lines| to_text(&lines))
    }

    fn seg(a: (usize, usize), b: (usize, usize)) -> Segment {
        Segment::new(Point::new(a.0, a.1), Point::new(b.0, b.1))
    }

    #[test]
    fn test_replace_single_char_in_raw_space() {
        let mut seen = Vec::new();
        let out = replace(&to_lines("abc"), SearchSpace::Raw, &re("a"), "d", |m, raw, screen| {
            seen.push((m.to_string(), raw, screen));
            true
        });
        assert_eq!(to_text(&out.unwrap()), "dbc");
        assert_eq!(
            seen,
            vec![("a".to_string(), seg((0, 0), (1, 0)), seg((0, 0), (1, 0)))]
        );
    }

    #[test]
    fn test_replace_selection_with_nothing() {
        let mut segments = Vec::new();
        let out = replace(
            &to_lines("ab<select-from>c<select-to>"),
            SearchSpace::Raw,
            &SELECTION,
            "",
            |_, raw, screen| {
                segments.push((raw, screen));
                true
            },
        );
        assert_eq!(to_text(&out.unwrap()), "ab");
        assert_eq!(segments, vec![(seg((2, 0), (27, 0)), seg((2, 0), (3, 0)))]);
    }

    #[test]
    fn test_replace_selection_across_lines() {
        let mut segments = Vec::new();
        let out = replace(
            &to_lines("ab\nde<select-from>cfg\nhi\n<select-to>j"),
            SearchSpace::Raw,
            &SELECTION,
            "",
            |_, raw, screen| {
                segments.push((raw, screen));
                true
            },
        );
        assert_eq!(to_text(&out.unwrap()), "ab\ndej");
        assert_eq!(segments, vec![(seg((2, 1), (11, 3)), seg((2, 1), (0, 3)))]);
    }

    #[test]
    fn test_screen_space_ignores_markup_and_keeps_trailing_tag() {
        let out = run(
            "x<color:ff0000:00ff00>bc<color:000000:ffffff>y",
            SearchSpace::Screen,
            "bc",
            "Z",
        );
        assert_eq!(
            out.as_deref(),
            Some("x<color:ff0000:00ff00>Z<color:000000:ffffff>y")
        );
    }

    #[test]
    fn test_screen_space_replaces_whole_escape() {
        assert_eq!(run("a&lt;b", SearchSpace::Screen, "<", "[").as_deref(), Some("a[b"));
    }

    #[test]
    fn test_raw_space_sees_markup() {
        assert_eq!(run("a&lt;b", SearchSpace::Raw, "<", "[").as_deref(), None);
        assert_eq!(run("a&lt;b", SearchSpace::Raw, "&lt;", "[").as_deref(), Some("a[b"));
    }

    #[test]
    fn test_template_expands_capture_groups() {
        let out = run("hello world", SearchSpace::Raw, r"(\w+) (?P<second>\w+)", "${second} $1");
        assert_eq!(out.as_deref(), Some("world hello"));
    }

    #[test]
    fn test_replace_every_match_on_every_line() {
        assert_eq!(run("a1\nb2", SearchSpace::Raw, r"\d", "#").as_deref(), Some("a#\nb#"));
    }

    #[test]
    fn test_declined_matches_return_none() {
        let mut calls = 0;
        let out = replace(&to_lines("aaa"), SearchSpace::Raw, &re("a"), "b", |_, _, _| {
            calls += 1;
            false
        });
        assert!(out.is_none());
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_only_accepted_matches_are_replaced() {
        let mut n = 0;
        let out = replace(&to_lines("aaa"), SearchSpace::Raw, &re("a"), "b", |_, _, _| {
            n += 1;
            n == 2
        });
        assert_eq!(to_text(&out.unwrap()), "aba");
    }

    #[test]
    fn test_empty_matches_terminate() {
        assert_eq!(run("ab", SearchSpace::Raw, "x*", "-").as_deref(), Some("-a-b"));
    }

    #[test]
    fn test_match_to_end_of_buffer_is_clamped() {
        assert_eq!(run("ab\ncd", SearchSpace::Raw, "(?s).*", "X").as_deref(), Some("X"));
        assert_eq!(run("ab\ncd", SearchSpace::Screen, "(?s).*", "X").as_deref(), Some("X"));
    }

    #[test]
    fn test_screen_match_across_lines() {
        let out = run("ab\n<color:010101:020202>cd", SearchSpace::Screen, "b\nc", "-");
        assert_eq!(out.as_deref(), Some("a-d"));
    }

    #[test]
    fn test_anchors_keep_whole_text_context() {
        assert_eq!(run("aaa", SearchSpace::Raw, "^a", "b").as_deref(), Some("baa"));
        assert_eq!(run("aa", SearchSpace::Raw, r"\ba", "b").as_deref(), Some("ba"));
        assert_eq!(run("a\na", SearchSpace::Raw, "(?m)^a", "b").as_deref(), Some("b\nb"));
    }
}
