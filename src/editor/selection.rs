//! The live selection, kept as a pair of markers inside the raw buffer.
//!
//! `<select-from>` marks the anchor (where Shift was first held) and
//! `<select-to>` the moving end at the cursor. Nothing else in the editor
//! inserts or removes markers; typed and pasted text is always escaped, so
//! it can never spell one.

use regex::Regex;

use super::buffer::RawBuffer;
use super::cursor::View;
use super::input::Action;
use crate::markup::{
    Point, SELECT_FROM, SELECT_FROM_TAG, SELECT_TO, SELECT_TO_TAG, SELECTION, Segment, plain_lines,
    to_lines,
};
use crate::search::{SearchSpace, replace};
use crate::ui::render::IndexEntry;

#[derive(Debug, Default, Clone)]
pub struct Selection {
    active: bool,
}

impl Selection {
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Treat the selection as active if the buffer carries a marker, e.g.
    /// after new content or an undo.
    pub fn sync(&mut self, buffer: &RawBuffer) {
        let text = buffer.text();
        self.active = SELECT_FROM.is_match(&text) || SELECT_TO.is_match(&text);
    }

    /// Update the markers after `action` was handled.
    ///
    /// `anchor` is the absolute screen position of the cursor before the
    /// action, present only for Shift-navigation.
    pub fn track(
        &mut self,
        anchor: Option<Point>,
        action: Action,
        buffer: &mut RawBuffer,
        view: &mut View,
    ) {
        match (self.active, anchor) {
            (true, Some(_)) => {
                strip(buffer, &SELECT_TO);
                view.refresh(buffer.lines());
                if let Some(at) = view.entry_at_cursor() {
                    insert_marker(buffer, at, SELECT_TO_TAG);
                }
            }
            (false, Some(anchor)) => {
                self.clear(buffer);
                view.refresh(buffer.lines());
                let anchor_entry = view.rendered().entry(anchor.x, anchor.y);
                let (Some(from), Some(to)) = (anchor_entry, view.entry_at_cursor()) else {
                    return;
                };
                let (from_raw, to_raw) = (buffer.resolve(from), buffer.resolve(to));
                if from_raw == to_raw {
                    insert_marker(buffer, to, &format!("{SELECT_FROM_TAG}{SELECT_TO_TAG}"));
                } else if from_raw < to_raw {
                    insert_marker(buffer, to, SELECT_TO_TAG);
                    insert_marker(buffer, from, SELECT_FROM_TAG);
                } else {
                    insert_marker(buffer, from, SELECT_FROM_TAG);
                    insert_marker(buffer, to, SELECT_TO_TAG);
                }
                self.active = true;
                tracing::trace!(?from_raw, ?to_raw, "selection started");
            }
            (true, None) if !action.keeps_selection() => {
                self.clear(buffer);
            }
            _ => return,
        }
        view.refresh(buffer.lines());
    }

    /// Remove both markers. Returns `true` if the buffer changed.
    pub fn clear(&mut self, buffer: &mut RawBuffer) -> bool {
        self.active = false;
        let to = strip(buffer, &SELECT_TO);
        let from = strip(buffer, &SELECT_FROM);
        to || from
    }

    /// Plain-text lines of the selection, if there is one.
    pub fn copy(buffer: &RawBuffer) -> Option<Vec<String>> {
        let mut copied = None;
        replace(buffer.lines(), SearchSpace::Raw, &SELECTION, "", |matched, _, _| {
            copied = selected_lines(matched);
            false
        });
        copied
    }

    /// Delete the selection, markers included, and move the cursor so it
    /// stays on the same text.
    ///
    /// Returns the plain-text lines that were removed, or `None` if there was
    /// no selection.
    pub fn remove(&mut self, buffer: &mut RawBuffer, view: &mut View) -> Option<Vec<String>> {
        let cursor = view.entry_at_cursor().map(|at| buffer.resolve(at));
        let mut removed = None;
        let lines = replace(buffer.lines(), SearchSpace::Raw, &SELECTION, "", |matched, raw, _| {
            removed = Some((selected_lines(matched).unwrap_or_default(), raw));
            true
        })?;
        buffer.set_lines(lines);
        view.refresh(buffer.lines());
        self.active = false;

        let (text, segment) = removed?;
        if let Some(cursor) = cursor {
            view.place_at_raw(relocate_after_removal(cursor, segment));
        }
        tracing::debug!(lines = text.len(), span = segment.len(), "selection removed");
        Some(text)
    }
}

fn selected_lines(matched: &str) -> Option<Vec<String>> {
    let caps = SELECTION.captures(matched)?;
    Some(plain_lines(&to_lines(&caps[2])))
}

/// Remove every match of `marker`. Returns `true` if the buffer changed.
fn strip(buffer: &mut RawBuffer, marker: &Regex) -> bool {
    match replace(buffer.lines(), SearchSpace::Raw, marker, "", |_, _, _| true) {
        Some(lines) => {
            buffer.set_lines(lines);
            true
        }
        None => false,
    }
}

fn insert_marker(buffer: &mut RawBuffer, at: IndexEntry, marker: &str) {
    let chars: Vec<char> = marker.chars().collect();
    buffer.insert_at(at, &chars);
}

/// Where raw position `cursor` ends up once `removed` is cut out.
///
/// Before the cut or for an empty cut it stays. Inside the cut it moves to
/// the cut's start, and after it it shifts back by the removed columns (same
/// line) or removed lines.
pub fn relocate_after_removal(cursor: Point, removed: Segment) -> Point {
    if removed.is_empty() || cursor < removed.start {
        cursor
    } else if cursor < removed.end {
        removed.start
    } else if cursor.y == removed.end.y {
        Point::new(
            removed.start.x + (cursor.x - removed.end.x),
            removed.start.y,
        )
    } else {
        Point::new(cursor.x, cursor.y - (removed.end.y - removed.start.y))
    }
}
