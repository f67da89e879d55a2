//! The character grid the editor draws on and reads input from.
//!
//! - [`TerminalDisplay`]: a real terminal via ratatui/crossterm
//! - [`MemoryDisplay`]: an in-memory grid with a scripted event queue

mod memory;
mod terminal;

pub use memory::MemoryDisplay;
pub use terminal::TerminalDisplay;

use std::io;

use crossterm::event::Event;

use crate::markup::Style;

/// A grid of styled cells plus an input event source.
///
/// Drawing is buffered: nothing becomes visible until [`Display::flush`].
/// A size of `(0, 0)` means the display cannot be drawn to yet.
pub trait Display {
    /// Current `(width, height)` in cells.
    fn size(&self) -> (usize, usize);

    /// Set one cell. Out-of-range positions are ignored.
    fn set_cell(&mut self, x: usize, y: usize, ch: char, style: Style);

    fn show_cursor(&mut self, x: usize, y: usize);

    fn hide_cursor(&mut self);

    /// Make everything drawn since the last flush visible.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the underlying device fails.
    fn flush(&mut self) -> io::Result<()>;

    /// Block until the next input event. `None` means input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the input device fails.
    fn poll_event(&mut self) -> io::Result<Option<Event>>;

    /// Release the display. Later calls are no-ops.
    ///
    /// # Errors
    ///
    /// Returns an error if the device could not be restored.
    fn close(&mut self) -> io::Result<()>;
}
