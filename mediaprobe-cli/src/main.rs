// mediaprobe-cli/src/main.rs
//
// Entry point for the `mediaprobe` binary.
//
// Responsibilities include:
// - Parsing command-line arguments (definitions live in `cli.rs`).
// - Installing the logger.
// - Dispatching to the `info` and `check` commands.
// - Reporting errors on stderr and exiting with status 1.

use clap::Parser;
use mediaprobe_cli::output::print_error;
use mediaprobe_cli::{Cli, Commands, logging, run_check, run_info};
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let library = cli.library.as_deref();
    let result = match &cli.command {
        Commands::Info(args) => run_info(args, library),
        Commands::Check => run_check(library),
    };

    if let Err(e) = result {
        log::debug!("Command failed: {:?}", e);
        print_error(&e.to_string());
        process::exit(1);
    }
}
