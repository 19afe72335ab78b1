//! Terminal rendering for the 2048 front-end.
//!
//! Renders into a plain framebuffer rather than a widget toolkit, then flushes
//! that framebuffer to the terminal with diffing.
//!
//! - `fb`: cells, colors, framebuffer
//! - `palette`: tile colors keyed by value
//! - `game_view`: snapshot to framebuffer (pure)
//! - `renderer`: framebuffer to terminal (I/O)

pub mod fb;
pub mod game_view;
pub mod palette;
pub mod renderer;

pub use tui_2048_core as core;
pub use tui_2048_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AdapterStatusView, AnchorY, GameView, Viewport};
pub use palette::{tile_bg, tile_style};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
