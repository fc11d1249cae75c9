// ============================================================================
// mediaprobe-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger Setup for the CLI
//
// The core library only emits through the `log` facade; this module installs
// the backend. Output goes to stderr so reports on stdout stay pipeable.
//
// USAGE:
// - RUST_LOG=warn (default): only problems
// - RUST_LOG=debug or -v: option application, library discovery, handles
// - RUST_LOG=trace: everything

use owo_colors::OwoColorize;
use std::io::Write;

/// Installs the global logger. `RUST_LOG` overrides the level chosen here.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            let level = match record.level() {
                log::Level::Error => "ERROR".bright_red().to_string(),
                log::Level::Warn => "WARN ".yellow().to_string(),
                log::Level::Info => "INFO ".green().to_string(),
                log::Level::Debug => "DEBUG".blue().to_string(),
                log::Level::Trace => "TRACE".magenta().to_string(),
            };
            writeln!(buf, "{} {} {}", timestamp, level, record.args())
        })
        .init();

    log::debug!("Logger initialized with default level: {}", default_level);
}
