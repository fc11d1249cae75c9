// mediaprobe-cli/src/lib.rs
//
// Library portion of the Mediaprobe CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, InfoArgs, OutputFormat};
pub use commands::check::run_check;
pub use commands::info::run_info;
