//! Undo/redo history as a pair of patch stacks.
//!
//! Each entry holds a unified diff that turns the content *after* an edit
//! back into the content *before* it, plus the cursor to restore. Only the
//! patch text is stored, never a full copy of the buffer.

use diffy::Patch;

use crate::markup::Point;

/// One step of history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoPatch {
    /// Cursor to restore when this entry is applied.
    pub cursor: Point,
    /// Unified diff text.
    pub patch: String,
}

/// Content and cursor produced by undo or redo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    pub content: String,
    pub cursor: Point,
}

#[derive(Debug, Default, Clone)]
pub struct History {
    undo: Vec<UndoPatch>,
    redo: Vec<UndoPatch>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Record an edit from `before` (with the cursor at `cursor`) to
    /// `after`. Nothing is recorded if the content did not change.
    ///
    /// Returns `true` if an entry was pushed. A new entry invalidates
    /// everything that could have been redone.
    pub fn record(&mut self, before: &str, cursor: Point, after: &str) -> bool {
        if before == after {
            return false;
        }
        self.undo.push(UndoPatch {
            cursor,
            patch: make_patch(after, before),
        });
        self.redo.clear();
        true
    }

    /// Revert the most recent edit of `current`.
    ///
    /// The entry is consumed even if its patch no longer applies, in which
    /// case nothing else happens.
    pub fn undo(&mut self, current: &str, cursor: Point) -> Option<Restored> {
        let entry = self.undo.pop()?;
        let Some(content) = apply_patch(&entry.patch, current) else {
            tracing::warn!("undo patch did not apply; entry dropped");
            return None;
        };
        self.redo.push(UndoPatch {
            cursor,
            patch: make_patch(&content, current),
        });
        tracing::debug!(undo = self.undo.len(), redo = self.redo.len(), "undo");
        Some(Restored {
            content,
            cursor: entry.cursor,
        })
    }

    /// Re-apply the most recently undone edit to `current`.
    pub fn redo(&mut self, current: &str) -> Option<Restored> {
        let entry = self.redo.pop()?;
        let Some(content) = apply_patch(&entry.patch, current) else {
            tracing::warn!("redo patch did not apply; entry dropped");
            return None;
        };
        tracing::debug!(undo = self.undo.len(), redo = self.redo.len(), "redo");
        Some(Restored {
            content,
            cursor: entry.cursor,
        })
    }
}

/// Unified diff turning `from` into `to`.
///
/// Both sides get a trailing newline so that a missing final newline never
/// shows up in the patch.
pub fn make_patch(from: &str, to: &str) -> String {
    let from = format!("{from}\n");
    let to = format!("{to}\n");
    diffy::create_patch(&from, &to).to_string()
}

/// Apply a patch made by [`make_patch`]. `None` if it does not apply.
pub fn apply_patch(patch: &str, text: &str) -> Option<String> {
    let patch = match Patch::from_str(patch) {
        Ok(patch) => patch,
        Err(err) => {
            tracing::warn!(%err, "malformed patch");
            return None;
        }
    };
    let base = format!("{text}\n");
    match diffy::apply(&base, &patch) {
        Ok(mut content) => {
            content.pop();
            Some(content)
        }
        Err(err) => {
            tracing::debug!(%err, "patch rejected");
            None
        }
    }
}
