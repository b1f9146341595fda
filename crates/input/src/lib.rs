//! Terminal input module.
//!
//! Maps `crossterm` key events to [`UiAction`]s. The same key means
//! different things in different phases (letters pick tiles while guessing,
//! digits claim a guess during play), so mapping always takes the current
//! [`types::Phase`].

pub mod map;

pub use tui_target_types as types;

pub use map::{handle_key_event, handle_tutorial_key, should_quit, TutorialAction, UiAction};
