// ============================================================================
// mediaprobe-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for Mediaprobe Core
//
// This module defines the error taxonomy surfaced by every public operation of
// the core library. Errors are never retried or swallowed internally; the
// native handle is always released before one of these escapes a session.
//
// KEY COMPONENTS:
// - CoreError: Enum of all failure conditions
// - CoreResult: Type alias for Result<T, CoreError>
// - Helper constructors for the common runtime failures

// ---- External crate imports ----
use thiserror::Error;

// ---- Standard library imports ----
use std::io;
use std::path::PathBuf;

/// Custom error type for the mediaprobe-core library.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The native MediaInfo library could not be located or loaded.
    #[error("MediaInfo library unavailable: {0}")]
    LibraryUnavailable(String),

    /// A local input path does not exist at analysis time.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The library's XML report is not well-formed.
    #[error("Malformed MediaInfo report: {0}")]
    MalformedReport(String),

    /// The library (or the network fetch feeding it) reported a failure that
    /// is not a missing local file.
    #[error("MediaInfo runtime failure: {0}")]
    RuntimeFailure(String),

    /// A parse option was rejected before reaching the library.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for Result with CoreError.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds the error returned when the library could not open an input.
pub(crate) fn open_failed_error(target: &str) -> CoreError {
    CoreError::RuntimeFailure(format!(
        "An error occurred while opening {} with libmediainfo",
        target
    ))
}
