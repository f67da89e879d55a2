use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::cursor::Direction;

/// One logical editing step, decoded from an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Type a character.
    Insert(char),
    /// Enter.
    SplitLine,
    /// Backspace.
    DeleteBack,
    /// Ctrl+Backspace / Ctrl+H.
    DeleteWordBack,
    /// Delete.
    DeleteForward,
    /// Tab.
    Indent,
    /// Arrow keys. `jump` with Ctrl, `select` with Shift.
    Move {
        direction: Direction,
        jump: bool,
        select: bool,
    },
    PageUp {
        select: bool,
    },
    PageDown {
        select: bool,
    },
    /// Home.
    GoToStart {
        select: bool,
    },
    /// End.
    GoToEnd {
        select: bool,
    },
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    /// Esc.
    ClearSelection,
    /// The display changed size.
    Resize,
    /// Ctrl+W (or Ctrl+Q).
    Quit,
}

impl Action {
    /// Navigation with Shift held.
    pub const fn extends_selection(self) -> bool {
        match self {
            Self::Move { select, .. }
            | Self::PageUp { select }
            | Self::PageDown { select }
            | Self::GoToStart { select }
            | Self::GoToEnd { select } => select,
            _ => false,
        }
    }

    /// Actions that leave an active selection in place.
    pub const fn keeps_selection(self) -> bool {
        matches!(self, Self::Copy | Self::Resize | Self::Undo | Self::Redo)
    }

    /// Undo and redo manage history themselves and are never recorded.
    pub const fn is_history(self) -> bool {
        matches!(self, Self::Undo | Self::Redo)
    }
}

/// Decode an input event. Events with no editing meaning map to `None`.
pub fn action_for_event(event: &Event) -> Option<Action> {
    match event {
        Event::Key(key) => action_for_key(*key),
        Event::Resize(..) => Some(Action::Resize),
        _ => None,
    }
}

fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let select = key.modifiers.contains(KeyModifiers::SHIFT);
    let step = |direction| {
        Some(Action::Move {
            direction,
            jump: ctrl,
            select,
        })
    };

    match key.code {
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            'z' => Some(Action::Undo),
            'y' => Some(Action::Redo),
            'c' => Some(Action::Copy),
            'x' => Some(Action::Cut),
            'v' => Some(Action::Paste),
            'h' => Some(Action::DeleteWordBack),
            'w' | 'q' => Some(Action::Quit),
            _ => None,
        },
        KeyCode::Char(c) => Some(Action::Insert(c)),
        KeyCode::Enter => Some(Action::SplitLine),
        KeyCode::Backspace if ctrl => Some(Action::DeleteWordBack),
        KeyCode::Backspace => Some(Action::DeleteBack),
        KeyCode::Delete => Some(Action::DeleteForward),
        KeyCode::Tab => Some(Action::Indent),
        KeyCode::Up => step(Direction::Up),
        KeyCode::Down => step(Direction::Down),
        KeyCode::Left => step(Direction::Left),
        KeyCode::Right => step(Direction::Right),
        KeyCode::PageUp => Some(Action::PageUp { select }),
        KeyCode::PageDown => Some(Action::PageDown { select }),
        KeyCode::Home => Some(Action::GoToStart { select }),
        KeyCode::End => Some(Action::GoToEnd { select }),
        KeyCode::Esc => Some(Action::ClearSelection),
        _ => None,
    }
}
