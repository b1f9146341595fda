//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: views draw into a plain
//! framebuffer, and the renderer flushes only the cells that changed.
//!
//! - [`fb`]: styled character cells
//! - [`game_view`]: one screen per game phase
//! - [`tutorial_view`]: the walkthrough over the demo board
//! - [`renderer`]: crossterm output with diffing

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod tutorial_view;

pub use tui_target_core as core;
pub use tui_target_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, StatusView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use tutorial_view::TutorialView;
