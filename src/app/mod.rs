//! Application orchestration: state management, event sources, input
//! handling and background decoding.

pub mod event;
pub mod handler;
pub mod loader;
pub mod state;
