//! CLI layer: argument parsing, terminal output and the interactive menu

pub mod args;
pub mod error;
pub mod menu;
pub mod output;

pub use args::Cli;
pub use error::{CliError, CliResult};
pub use menu::{MenuChoice, Session};
