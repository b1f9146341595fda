//! TUI Target (workspace facade crate).
//!
//! Re-exports the workspace crates as `tui_target::{core,input,runtime,term,types}`
//! so the binary, integration tests and benches share one import root.

pub use tui_target_core as core;
pub use tui_target_input as input;
pub use tui_target_runtime as runtime;
pub use tui_target_term as term;
pub use tui_target_types as types;
