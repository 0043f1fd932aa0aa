//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into pixels on
//! the terminal.  No file I/O or decoding happens here.

pub mod glass_card;
pub mod image_stack;
pub mod layout;
pub mod spinner;
pub mod status;
pub mod theme;
