pub mod commands;
pub mod context;
pub mod help;
pub mod host;
pub mod io;
pub mod output;
pub mod render;
mod shell;

pub use context::{CliError, CliMode, CommandError, ShellContext};
pub use shell::{run_shell, SCRIPT_ENV};
