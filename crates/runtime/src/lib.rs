//! Runtime module - drives the pure game machine with time, storage and logs
//!
//! The core crate never touches clocks or files. This crate supplies them:
//!
//! - [`scheduler`]: the `Scheduler`/`ScheduledTask` seam and a virtual-time
//!   implementation for tests and headless runs
//! - [`realtime`]: tokio-backed scheduling for the interactive binary
//! - [`session`]: a machine plus a scheduler, executing effects
//! - [`prefs`]: the persisted audio flag
//! - [`config`]: environment-driven runtime knobs
//! - [`logging`]: `env_logger` to a file
//!
//! # Example
//!
//! ```
//! use tui_target_runtime::Session;
//! use tui_target_core::{tutorial_board, GameMachine, ScriptedRoundGenerator};
//! use tui_target_core::types::{Clock, Command};
//!
//! let machine = GameMachine::new(ScriptedRoundGenerator::repeat(tutorial_board()));
//! let mut session = Session::manual(machine);
//! session.dispatch(Command::Start);
//! session.dispatch(Command::StartGame);
//!
//! session.advance(10_000);
//! assert_eq!(session.machine().clock(Clock::Round).remaining(), 170);
//! ```

pub mod config;
pub mod logging;
pub mod prefs;
pub mod realtime;
pub mod scheduler;
pub mod session;

pub use tui_target_core as core;
pub use tui_target_types as types;

pub use config::RuntimeConfig;
pub use prefs::{AudioPreference, FileStore, KeyValueStore, MemoryStore, PrefsError};
pub use realtime::{Realtime, TokioScheduler, TokioTask};
pub use scheduler::{ManualScheduler, ManualTask, ScheduledTask, Scheduler};
pub use session::Session;
