//! The editing session.
//!
//! An [`Editor`] owns a [`Display`], the raw buffer, the rendered view, the
//! selection, the paste buffer and the undo history. [`Editor::edit`] runs
//! the blocking event loop: each input event is decoded into an [`Action`],
//! applied to the buffer, recorded in history and drawn before the next
//! event is read.

mod buffer;
mod cursor;
mod history;
mod input;
mod selection;

pub use buffer::RawBuffer;
pub use cursor::{Direction, View};
pub use history::{History, Restored, UndoPatch, apply_patch, make_patch};
pub use input::{Action, action_for_event};
pub use selection::{Selection, relocate_after_removal};

use crossterm::event::Event;
use regex::Regex;
use thiserror::Error;

use crate::config::EditorConfig;
use crate::display::Display;
use crate::markup::{Point, Segment, escape, to_lines};
use crate::search::{SearchSpace, replace};
use crate::ui::render::draw;

/// Errors surfaced by an editing session.
///
/// Everything that can go wrong inside the buffer degrades to "no visible
/// change"; only the display can fail.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("display error: {0}")]
    Display(#[from] std::io::Error),
}

/// Hook that turns one incoming event into zero or more events.
pub type EventFilter = Box<dyn FnMut(Event) -> Vec<Event>>;

pub struct Editor<D: Display> {
    display: D,
    event_filter: Option<EventFilter>,
    config: EditorConfig,
    buffer: RawBuffer,
    view: View,
    selection: Selection,
    paste_buffer: Vec<String>,
    history: History,
}

impl<D: Display> Editor<D> {
    pub fn new(display: D) -> Self {
        Self {
            display,
            event_filter: None,
            config: EditorConfig::default(),
            buffer: RawBuffer::empty(),
            view: View::new(),
            selection: Selection::default(),
            paste_buffer: Vec::new(),
            history: History::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    /// Pass every incoming event through `filter` before decoding it.
    #[must_use]
    pub fn with_event_filter<F>(mut self, filter: F) -> Self
    where
        F: FnMut(Event) -> Vec<Event> + 'static,
    {
        self.event_filter = Some(Box::new(filter));
        self
    }

    pub const fn display(&self) -> &D {
        &self.display
    }

    pub const fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn into_display(self) -> D {
        self.display
    }

    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub const fn buffer(&self) -> &RawBuffer {
        &self.buffer
    }

    pub const fn view(&self) -> &View {
        &self.view
    }

    /// The raw text, markup included.
    pub fn content(&self) -> String {
        self.buffer.text()
    }

    /// Cursor position relative to the top of the viewport.
    pub const fn cursor(&self) -> Point {
        self.view.cursor()
    }

    /// Plain-text lines of the last copy or cut.
    pub fn paste_buffer(&self) -> &[String] {
        &self.paste_buffer
    }

    pub const fn is_selecting(&self) -> bool {
        self.selection.is_active()
    }

    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Replace the whole buffer with raw `text` and redraw.
    ///
    /// History is cleared and the cursor returns to the top. A selection
    /// embedded in `text` becomes the active selection.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing to the display fails.
    pub fn set_content(&mut self, text: &str) -> Result<(), EditorError> {
        self.buffer = RawBuffer::from_text(text);
        self.history.clear();
        self.selection.sync(&self.buffer);
        self.sync_view();
        self.view.go_to_start();
        tracing::debug!(lines = self.buffer.line_count(), "content set");
        self.present()
    }

    /// Run the session on `initial` until quit or until the display runs out
    /// of input. The display is closed on the way out.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from or drawing to the display fails.
    pub fn edit(&mut self, initial: &str) -> Result<(), EditorError> {
        self.set_content(initial)?;
        while let Some(event) = self.display.poll_event()? {
            let events = match self.event_filter.as_mut() {
                Some(filter) => filter(event),
                None => vec![event],
            };
            for event in events {
                let Some(action) = action_for_event(&event) else {
                    continue;
                };
                if action == Action::Quit {
                    tracing::debug!("quit");
                    self.display.close()?;
                    return Ok(());
                }
                self.apply(action);
                self.present()?;
            }
        }
        tracing::debug!("input exhausted");
        self.display.close()?;
        Ok(())
    }

    /// Apply one action to the buffer, update the selection and record the
    /// change in history. Does not draw.
    pub fn apply(&mut self, action: Action) {
        self.sync_view();
        let before = self.buffer.text();
        let cursor = self.view.cursor();
        let anchor = action
            .extends_selection()
            .then(|| self.view.absolute_cursor());

        self.handle(action);
        self.selection
            .track(anchor, action, &mut self.buffer, &mut self.view);

        if !action.is_history() {
            let after = self.buffer.text();
            if self.history.record(&before, cursor, &after) {
                tracing::trace!(?action, "edit recorded");
            }
        }
    }

    /// Run [`replace`] over the buffer, record the change and redraw.
    ///
    /// Returns `true` if anything was replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing to the display fails.
    pub fn replace_all<F>(
        &mut self,
        space: SearchSpace,
        pattern: &Regex,
        template: &str,
        decide: F,
    ) -> Result<bool, EditorError>
    where
        F: FnMut(&str, Segment, Segment) -> bool,
    {
        let Some(lines) = replace(self.buffer.lines(), space, pattern, template, decide) else {
            return Ok(false);
        };
        let before = self.buffer.text();
        let cursor = self.view.cursor();
        self.buffer.set_lines(lines);
        self.selection.sync(&self.buffer);
        self.view.refresh(self.buffer.lines());
        self.history.record(&before, cursor, &self.buffer.text());
        self.present()?;
        Ok(true)
    }

    fn handle(&mut self, action: Action) {
        match action {
            Action::Insert(c) => self.write(&escape(&c.to_string())),
            Action::SplitLine => self.split_line(),
            Action::DeleteBack => {
                if !self.remove_selection() && self.view.move_cursor(Direction::Left) {
                    self.delete_under_cursor();
                }
            }
            Action::DeleteWordBack => self.delete_word_back(),
            Action::DeleteForward => {
                if !self.remove_selection() {
                    self.delete_under_cursor();
                }
            }
            Action::Indent => self.indent(),
            Action::Move {
                direction, jump, ..
            } => {
                if jump {
                    self.view.jump(direction);
                } else {
                    self.view.move_cursor(direction);
                }
            }
            Action::PageUp { .. } => self.view.page(Direction::Up),
            Action::PageDown { .. } => self.view.page(Direction::Down),
            Action::GoToStart { .. } => self.view.go_to_start(),
            Action::GoToEnd { .. } => self.view.go_to_end(),
            Action::Undo => self.undo(),
            Action::Redo => self.redo(),
            Action::Copy => {
                if let Some(lines) = Selection::copy(&self.buffer) {
                    self.paste_buffer = lines;
                }
            }
            Action::Cut => {
                if let Some(lines) = self.selection.remove(&mut self.buffer, &mut self.view) {
                    self.paste_buffer = lines;
                }
            }
            Action::Paste => self.paste(),
            Action::ClearSelection => {
                if self.selection.clear(&mut self.buffer) {
                    self.view.refresh(self.buffer.lines());
                }
            }
            Action::Resize | Action::Quit => {}
        }
    }

    /// Insert raw `text` under the cursor and step over it.
    fn write(&mut self, text: &str) {
        let Some(at) = self.view.entry_at_cursor() else {
            return;
        };
        let chars: Vec<char> = text.chars().collect();
        if self.buffer.insert_at(at, &chars) {
            self.view.refresh(self.buffer.lines());
            self.view.move_cursor(Direction::Right);
        }
    }

    fn split_line(&mut self) {
        let Some(at) = self.view.entry_at_cursor() else {
            return;
        };
        if self.buffer.split_at(at) {
            self.view.refresh(self.buffer.lines());
            self.view.move_cursor(Direction::Right);
        }
    }

    fn delete_under_cursor(&mut self) -> bool {
        let Some(at) = self.view.entry_at_cursor() else {
            return false;
        };
        let deleted = self.buffer.delete_at(at);
        if deleted {
            self.view.refresh(self.buffer.lines());
        }
        deleted
    }

    fn remove_selection(&mut self) -> bool {
        self.selection.is_active()
            && self
                .selection
                .remove(&mut self.buffer, &mut self.view)
                .is_some()
    }

    fn delete_word_back(&mut self) {
        if !self.view.move_cursor(Direction::Left) {
            return;
        }
        let whitespace = self.view.char_at(self.view.cursor()).is_whitespace();
        self.delete_under_cursor();
        while self.view.move_cursor(Direction::Left) {
            if self.view.char_at(self.view.cursor()).is_whitespace() != whitespace {
                self.view.move_cursor(Direction::Right);
                break;
            }
            self.delete_under_cursor();
        }
    }

    /// Spaces up to the next tab stop.
    fn indent(&mut self) {
        let width = self.config.tab_width.max(1);
        for _ in 0..width {
            let x = self.view.cursor().x;
            self.write(" ");
            if self.view.cursor().x == x || self.view.cursor().x % width == 0 {
                break;
            }
        }
    }

    fn paste(&mut self) {
        let lines = self.paste_buffer.clone();
        for (idx, line) in lines.iter().enumerate() {
            if idx > 0 {
                self.split_line();
            }
            let Some(at) = self.view.entry_at_cursor() else {
                return;
            };
            let chars: Vec<char> = escape(line).chars().collect();
            if self.buffer.insert_at(at, &chars) {
                self.view.refresh(self.buffer.lines());
                for _ in line.chars() {
                    self.view.move_cursor(Direction::Right);
                }
            }
        }
        tracing::debug!(lines = lines.len(), "pasted");
    }

    fn undo(&mut self) {
        let current = self.buffer.text();
        if let Some(restored) = self.history.undo(&current, self.view.cursor()) {
            self.restore(restored);
        }
    }

    fn redo(&mut self) {
        let current = self.buffer.text();
        if let Some(restored) = self.history.redo(&current) {
            self.restore(restored);
        }
    }

    fn restore(&mut self, restored: Restored) {
        self.buffer.set_lines(to_lines(&restored.content));
        self.selection.sync(&self.buffer);
        self.view.refresh(self.buffer.lines());
        self.view.set_cursor(restored.cursor);
    }

    /// Re-render for the display's current size.
    fn sync_view(&mut self) {
        let (width, height) = self.display.size();
        self.view.update(self.buffer.lines(), width, height);
    }

    fn present(&mut self) -> Result<(), EditorError> {
        self.sync_view();
        if !self.view.viewport().is_renderable() {
            self.display.hide_cursor();
            return Ok(());
        }
        draw(self.view.rendered(), self.view.viewport(), &mut self.display);
        let cursor = self.view.cursor();
        self.display.show_cursor(cursor.x, cursor.y);
        self.display.flush()?;
        Ok(())
    }
}
