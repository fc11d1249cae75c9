//! Implementation of the 'info' subcommand.
//!
//! Translates the command-line flags into `ParseOptions`, runs one analysis
//! through mediaprobe-core and prints either the parsed tracks (as JSON) or
//! the library's raw report.

use crate::cli::{InfoArgs, OutputFormat};
use crate::output::print_report;

use mediaprobe_core::{CoreResult, MediaInfo, ParseOptions, ParseOutput, RawOutput};

use log::debug;

use std::path::Path;

/// Builds the analysis options for `args`.
pub fn build_options(args: &InfoArgs, library_file: Option<&Path>) -> CoreResult<ParseOptions> {
    let mut builder = ParseOptions::builder()
        .full(!args.no_full)
        .cover_data(args.cover_data)
        .legacy_stream_display(args.legacy_stream_display)
        .mediainfo_options(args.options.iter().cloned());

    if let Some(speed) = args.parse_speed {
        builder = builder.parse_speed(speed);
    }
    if let Some(file) = library_file {
        builder = builder.library_file(file);
    }

    builder = match (&args.parameter, args.format) {
        (Some(template), _) => builder.raw_output(RawOutput::Parameter(template.clone())),
        (None, OutputFormat::Text) => builder.raw_output(RawOutput::Text),
        (None, OutputFormat::Json) => builder.raw_output(RawOutput::Json),
        (None, OutputFormat::Tracks) => builder,
    };

    builder.build()
}

/// Analyzes the input and prints the result to stdout.
pub fn run_info(args: &InfoArgs, library_file: Option<&Path>) -> CoreResult<()> {
    let options = build_options(args, library_file)?;
    debug!("Analyzing {} with {:?}", args.input, options);

    match MediaInfo::parse(args.input.as_str(), &options)? {
        ParseOutput::Tracks(info) => {
            debug!("Found {} track(s)", info.len());
            let rendered = serde_json::to_string_pretty(&info.to_data())?;
            print_report(&rendered);
        }
        ParseOutput::Raw(report) => print_report(&report),
    }
    Ok(())
}
