pub mod commands;
pub mod context;
pub mod errors;
pub mod output;
pub mod registry;
mod shell;
pub mod ui;

pub use errors::{CliError, CommandError};
pub use shell::{run_cli, SCRIPT_ENV};
