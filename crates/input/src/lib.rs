//! Terminal input module (session-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events into [`crate::types::GameAction`]; everything it does
//! not recognize is dropped here so the session only ever sees a direction or
//! a restart.

pub mod map;

pub use tui_2048_types as types;

pub use map::{handle_key_event, should_quit};
