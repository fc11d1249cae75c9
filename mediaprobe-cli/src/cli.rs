// mediaprobe-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Mediaprobe: Media metadata extraction",
    long_about = "Extracts container, video, audio, subtitle and menu metadata using libmediainfo via mediaprobe-core."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Load libmediainfo from this file instead of searching the usual locations.
    /// Can also be set via the MEDIAPROBE_LIBRARY environment variable.
    #[arg(long, global = true, value_name = "LIBRARY_FILE", env = "MEDIAPROBE_LIBRARY")]
    pub library: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyzes a local file or URL and prints its metadata
    Info(InfoArgs),
    /// Reports whether libmediainfo can be loaded, and its version
    Check,
}

/// Report format for the `info` command.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Parsed tracks as JSON
    Tracks,
    /// The library's human-readable text report
    Text,
    /// The library's own JSON report
    Json,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Local path or http(s) URL to analyze
    #[arg(required = true, value_name = "INPUT")]
    pub input: String,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Tracks)]
    pub format: OutputFormat,

    /// Print a single value selected by a template such as "General;%FileSize%"
    #[arg(long, value_name = "TEMPLATE", conflicts_with = "format")]
    pub parameter: Option<String>,

    /// Omit internal and rarely used fields
    #[arg(long, default_value_t = false)]
    pub no_full: bool,

    /// Include embedded artwork as base64
    #[arg(long, default_value_t = false)]
    pub cover_data: bool,

    /// Analysis thoroughness between 0.0 (fastest) and 1.0 (most thorough)
    #[arg(long, value_name = "SPEED")]
    pub parse_speed: Option<f32>,

    /// Use the legacy format for compound fields such as channel layouts
    #[arg(long, default_value_t = false)]
    pub legacy_stream_display: bool,

    /// Raw libmediainfo option, repeatable (e.g. --option Language=raw)
    #[arg(long = "option", value_name = "NAME=VALUE", value_parser = parse_option)]
    pub options: Vec<(String, String)>,
}

/// Splits a `NAME=VALUE` pair. The value may be empty or contain `=`.
fn parse_option(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}
