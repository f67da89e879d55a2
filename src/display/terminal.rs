use std::io;

use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};

use super::Display;
use crate::markup::Style;

/// A [`Display`] backed by the real terminal.
///
/// Cells are staged in an off-screen buffer and handed to ratatui on flush,
/// which only writes what changed.
pub struct TerminalDisplay {
    terminal: Option<DefaultTerminal>,
    staged: Buffer,
    cursor: Option<Position>,
}

impl TerminalDisplay {
    /// Switch the terminal to raw mode on the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout is not an interactive terminal.
    pub fn init() -> io::Result<Self> {
        let terminal = ratatui::try_init()?;
        let size = terminal.size()?;
        tracing::debug!(width = size.width, height = size.height, "terminal initialized");
        Ok(Self {
            terminal: Some(terminal),
            staged: Buffer::empty(Rect::new(0, 0, size.width, size.height)),
            cursor: None,
        })
    }
}

impl Display for TerminalDisplay {
    fn size(&self) -> (usize, usize) {
        (
            usize::from(self.staged.area.width),
            usize::from(self.staged.area.height),
        )
    }

    fn set_cell(&mut self, x: usize, y: usize, ch: char, style: Style) {
        let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
            return;
        };
        if let Some(cell) = self.staged.cell_mut((x, y)) {
            cell.set_char(ch).set_style(style);
        }
    }

    fn show_cursor(&mut self, x: usize, y: usize) {
        self.cursor = u16::try_from(x)
            .ok()
            .zip(u16::try_from(y).ok())
            .map(|(x, y)| Position::new(x, y));
    }

    fn hide_cursor(&mut self) {
        self.cursor = None;
    }

    fn flush(&mut self) -> io::Result<()> {
        let Self {
            terminal,
            staged,
            cursor,
        } = self;
        let Some(terminal) = terminal.as_mut() else {
            return Ok(());
        };
        terminal.draw(|frame| {
            let area = frame.area().intersection(staged.area);
            let out = frame.buffer_mut();
            for y in area.top()..area.bottom() {
                for x in area.left()..area.right() {
                    if let (Some(src), Some(dst)) = (staged.cell((x, y)), out.cell_mut((x, y))) {
                        *dst = src.clone();
                    }
                }
            }
            if let Some(position) = *cursor {
                frame.set_cursor_position(position);
            }
        })?;
        Ok(())
    }

    fn poll_event(&mut self) -> io::Result<Option<Event>> {
        if self.terminal.is_none() {
            return Ok(None);
        }
        let event = event::read()?;
        if let Event::Resize(width, height) = event {
            tracing::debug!(width, height, "terminal resized");
            self.staged.resize(Rect::new(0, 0, width, height));
        }
        Ok(Some(event))
    }

    fn close(&mut self) -> io::Result<()> {
        if self.terminal.take().is_some() {
            ratatui::restore();
            tracing::debug!("terminal restored");
        }
        Ok(())
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        if self.terminal.take().is_some() {
            ratatui::restore();
        }
    }
}
