use std::collections::VecDeque;
use std::io;

use crossterm::event::Event;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use super::Display;
use crate::markup::Style;

/// A [`Display`] that keeps its cells in memory and replays queued events.
///
/// Used for embedding the editor without a terminal and for tests. When the
/// queue runs dry, [`Display::poll_event`] returns `None`.
#[derive(Debug, Clone)]
pub struct MemoryDisplay {
    cells: Buffer,
    events: VecDeque<Event>,
    cursor: Option<(usize, usize)>,
    flushes: usize,
    closed: bool,
}

impl MemoryDisplay {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cells: Buffer::empty(Rect::new(0, 0, width, height)),
            events: VecDeque::new(),
            cursor: None,
            flushes: 0,
            closed: false,
        }
    }

    /// Queue events to be returned by [`Display::poll_event`], in order.
    #[must_use]
    pub fn with_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.events.extend(events);
        self
    }

    /// Change the grid size. A matching [`Event::Resize`] is not queued.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.cells.resize(Rect::new(0, 0, width, height));
    }

    /// Characters of row `y`, one per cell.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.cells.area.width)
            .filter_map(|x| self.cells.cell((x, y)))
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    /// Style of one cell, as last set.
    pub fn cell_style(&self, x: u16, y: u16) -> Option<Style> {
        let cell = self.cells.cell((x, y))?;
        Some(Style {
            fg: cell.fg,
            bg: cell.bg,
        })
    }

    pub const fn cursor(&self) -> Option<(usize, usize)> {
        self.cursor
    }

    pub const fn flushes(&self) -> usize {
        self.flushes
    }

    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Display for MemoryDisplay {
    fn size(&self) -> (usize, usize) {
        (
            usize::from(self.cells.area.width),
            usize::from(self.cells.area.height),
        )
    }

    fn set_cell(&mut self, x: usize, y: usize, ch: char, style: Style) {
        let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
            return;
        };
        if let Some(cell) = self.cells.cell_mut((x, y)) {
            cell.set_char(ch).set_style(style);
        }
    }

    fn show_cursor(&mut self, x: usize, y: usize) {
        self.cursor = Some((x, y));
    }

    fn hide_cursor(&mut self) {
        self.cursor = None;
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn poll_event(&mut self) -> io::Result<Option<Event>> {
        if self.closed {
            return Ok(None);
        }
        Ok(self.events.pop_front())
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}
