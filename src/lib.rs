// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorError)
    clippy::module_name_repetitions
)]

//! # gridedit
//!
//! An embeddable text editor for character-grid displays.
//!
//! The buffer carries a small inline markup language: escaped entities,
//! color tags and the selection markers. gridedit renders it into
//! hard-wrapped, styled screen lines and keeps raw and screen coordinates
//! in step while the user navigates, selects, edits and undoes.
//!
//! ## Architecture
//!
//! - **Raw buffer**: the authoritative text, markup included
//! - **Render**: a fold over the token stream into screen lines plus a
//!   screen-to-raw index
//! - **Actions**: each input event becomes one [`editor::Action`] that
//!   edits the raw buffer, after which everything is re-rendered
//!
//! ## Modules
//!
//! - [`markup`]: tokenizer, flattener and markup helpers
//! - [`ui`]: rendering and the viewport
//! - [`editor`]: buffer, cursor, selection, history and the session loop
//! - [`search`]: regex replace over raw or screen text
//! - [`display`]: the character grid the editor draws on
//! - [`config`]: saved defaults

pub mod config;
pub mod display;
pub mod editor;
pub mod markup;
pub mod search;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::EditorConfig;
    pub use crate::display::{Display, MemoryDisplay, TerminalDisplay};
    pub use crate::editor::{Editor, EditorError};
    pub use crate::markup::{escape, plain_text};
    pub use crate::search::SearchSpace;
}
