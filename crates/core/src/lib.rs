//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the rules of the target-number game and the session
//! state machine. It has **no dependencies** on terminals, timers, or I/O:
//!
//! - **Deterministic**: a seeded generator replays the same boards
//! - **Reducer-shaped**: commands and wakes in, effects out
//! - **Testable**: time only advances when a test delivers a wake
//!
//! # Module Structure
//!
//! - [`evaluator`]: exact arithmetic for a 3-tile equation with `×`/`÷` precedence
//! - [`countdown`]: epoch-guarded whole-second countdown clocks
//! - [`generator`]: round generation (seeded random, scripted, tutorial board)
//! - [`machine`]: phases, scoring, history and scheduled continuations
//! - [`snapshot`]: read-only view for presentation code
//! - [`tutorial`]: the five-step walkthrough
//!
//! # Rules
//!
//! - **Board**: 10 tiles `A`..`J`, each an operator and a number, plus a target
//! - **Equation**: 3 distinct tiles in selection order; the first operator is ignored
//! - **Scoring**: +1 for a new correct equation, −1 (never below zero) for a
//!   wrong answer, an equation already found this round, or running out of time
//! - **Rounds**: 3 minutes each; a round ends early once every valid equation is found
//!
//! # Example
//!
//! ```
//! use tui_target_core::{tutorial_board, Effect, GameMachine, ScriptedRoundGenerator, Wake};
//! use tui_target_types::{Command, Phase, PlayerId};
//!
//! let mut game = GameMachine::new(ScriptedRoundGenerator::repeat(tutorial_board()));
//! game.apply(Command::Start);
//! game.apply(Command::StartGame);
//! game.apply(Command::StartGuessing(PlayerId::new(1)));
//!
//! // A, I, J: 1 + 2 × 5 = 11
//! game.apply(Command::SelectTile(0));
//! game.apply(Command::SelectTile(8));
//! let effects = game.apply(Command::SelectTile(9));
//!
//! assert_eq!(game.phase(), Phase::ShowingResult);
//! assert_eq!(game.player(PlayerId::new(1)).unwrap().score, 1);
//!
//! // the driver delivers the deferred wake after the display delay
//! let token = effects
//!     .iter()
//!     .find_map(|e| match e {
//!         Effect::Defer { token, .. } => Some(*token),
//!         _ => None,
//!     })
//!     .unwrap();
//! game.wake(Wake::Deferred { token });
//! assert_eq!(game.phase(), Phase::Game);
//! ```

pub mod countdown;
pub mod evaluator;
pub mod generator;
pub mod machine;
pub mod snapshot;
pub mod tutorial;

pub use tui_target_types as types;

// Re-export commonly used types for convenience
pub use countdown::{Countdown, Tick};
pub use evaluator::{evaluate, expression, EvalError, Evaluation};
pub use generator::{tutorial_board, RandomRoundGenerator, RoundGenerator, ScriptedRoundGenerator};
pub use machine::{DeferredKind, Effect, Effects, GameMachine, Outcome, Wake, MAX_EFFECTS};
pub use snapshot::GameSnapshot;
pub use tutorial::{Highlight, Tutorial, TutorialProgress, TutorialStep, TUTORIAL_STEPS};
