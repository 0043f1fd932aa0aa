//! Core model: image list, scroll position, bottom detection, and the card
//! animation.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Time is
//! passed in explicitly so every piece can be driven from tests.

pub mod animator;
pub mod gallery;
pub mod monitor;
pub mod scene;
pub mod scroll;
