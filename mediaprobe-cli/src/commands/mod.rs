//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Module containing the implementation of the `check` command.
pub mod check;

/// Module containing the implementation of the `info` command.
/// This command analyzes one input and prints tracks or a raw report.
pub mod info;
