//! Screen-side state.
//!
//! - [`viewport`]: display size, line offset and scroll bounds
//! - [`render`]: wrapping the raw buffer into styled screen lines

pub mod render;
pub mod viewport;

pub use render::{IndexEntry, Rendered, draw, render};
pub use viewport::Viewport;
