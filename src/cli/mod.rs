//! CLI layer: argument parsing, command parsing and sessions

pub mod args;
pub mod command;
pub mod commands;
pub mod error;
pub mod output;
pub mod session;

pub use args::{Cli, Commands};
pub use command::{Command, CommandError, CommandKind};
pub use commands::execute_command;
pub use error::{CliError, CliResult};
pub use session::{Flow, Session};
