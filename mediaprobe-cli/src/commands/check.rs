//! Implementation of the 'check' subcommand.

use crate::output::{print_info, print_success};

use mediaprobe_core::{CoreResult, MediaInfo};

use std::path::Path;

/// Loads the library and prints its version. Fails when it cannot be loaded.
pub fn run_check(library_file: Option<&Path>) -> CoreResult<()> {
    let version = MediaInfo::library_version(library_file)?;

    print_info(
        "Library",
        library_file.map_or_else(|| "system".to_string(), |path| path.display().to_string()),
    );
    print_info("Version", version);
    print_success("libmediainfo is available");
    Ok(())
}
