//! Command-line interface support: script replay and command implementations.

pub mod commands;
pub mod replay;
pub mod script;

pub use replay::{Replay, ReplayEntry};
pub use script::{load_script, parse_script, ScriptLine, ScriptOp, ScriptQuery};
