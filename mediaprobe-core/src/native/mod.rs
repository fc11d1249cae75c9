// ============================================================================
// mediaprobe-core/src/native/mod.rs
// ============================================================================
//
// NATIVE LIBRARY: Contract with libmediainfo
//
// This module describes the native analysis library as two traits so that the
// session logic can be exercised without the real library present.
//
// KEY COMPONENTS:
// - NativeLibrary / NativeHandle: the open/option/open-file/open-buffer/
//   inform/close contract consumed by the session
// - LibraryVersion and Capabilities: version-gated features, evaluated once
// - load_library(): process-wide cache of located libraries
// - MediaInfoLib (ffi): the libloading-backed implementation
// - MockLibrary (mock): an in-process implementation for tests
//
// Dropping a NativeHandle closes and deletes the underlying native handle.

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- External crate imports ----
use once_cell::sync::{Lazy, OnceCell};

// ---- Standard library imports ----
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

// ============================================================================
// SUBMODULES
// ============================================================================

/// libloading-backed binding to the real library
pub mod ffi;

/// Wide string conversions for the wchar_t API
pub mod wide;

/// In-process library double used by tests
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use ffi::MediaInfoLib;

// ============================================================================
// CONTRACT
// ============================================================================

/// Stream kinds understood by `MediaInfo_Count_Get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    General = 0,
    Video = 1,
    Audio = 2,
    Text = 3,
    Other = 4,
    Image = 5,
    Menu = 6,
}

/// One open analysis handle. Dropping it closes and deletes the handle.
pub trait NativeHandle {
    /// Sets an option, returning the library's answer.
    fn option(&mut self, name: &str, value: &str) -> String;

    /// Analyzes a local file. Returns 0 on failure.
    fn open_file(&mut self, path: &Path) -> usize;

    /// Analyzes in-memory content. Returns 0 when nothing was recognized.
    fn open_buffer(&mut self, data: &[u8]) -> usize;

    /// The report in the format selected by the `Inform` option.
    fn inform(&mut self) -> String;

    /// Number of streams of `kind` found by the last analysis.
    fn stream_count(&mut self, kind: StreamKind) -> usize;
}

/// A loaded native library able to hand out independent handles.
pub trait NativeLibrary: Send + Sync {
    /// Raw version string, e.g. "MediaInfoLib - v20.09".
    fn version_string(&self) -> &str;

    fn version(&self) -> LibraryVersion;

    /// Acquires a fresh handle.
    fn open_handle(&self) -> CoreResult<Box<dyn NativeHandle + '_>>;
}

// ============================================================================
// VERSIONS AND CAPABILITIES
// ============================================================================

/// A library version as a comparable `(major, minor, patch)` tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LibraryVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl LibraryVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }
}

impl FromStr for LibraryVersion {
    type Err = CoreError;

    /// Accepts `"MediaInfoLib - v20.09"` as well as a bare `"20.09"`.
    fn from_str(raw: &str) -> CoreResult<Self> {
        let unrecognized =
            || CoreError::LibraryUnavailable(format!("Unrecognized library version: {:?}", raw));

        let trimmed = raw.trim();
        let version = trimmed
            .strip_prefix("MediaInfoLib - v")
            .unwrap_or(trimmed)
            .split_whitespace()
            .next()
            .ok_or_else(unrecognized)?;

        let parts = version
            .split('.')
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<u32>, _>>()
            .map_err(|_| unrecognized())?;

        match parts.as_slice() {
            [major] => Ok(Self::new(*major, 0, 0)),
            [major, minor] => Ok(Self::new(*major, *minor, 0)),
            [major, minor, patch, ..] => Ok(Self::new(*major, *minor, *patch)),
            [] => Err(unrecognized()),
        }
    }
}

impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch > 0 {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        } else {
            write!(f, "{}.{:02}", self.major, self.minor)
        }
    }
}

/// First version producing the legacy XML layout under the `OLDXML` name.
pub const OLDXML_VERSION: LibraryVersion = LibraryVersion::new(17, 10, 0);
/// First version honouring `Cover_Data` (artwork is no longer parsed by default).
pub const COVER_DATA_VERSION: LibraryVersion = LibraryVersion::new(18, 3, 0);
/// First version with the JSON report.
pub const JSON_OUTPUT_VERSION: LibraryVersion = LibraryVersion::new(18, 3, 0);
/// First version supporting the `Reset` option.
pub const RESET_VERSION: LibraryVersion = LibraryVersion::new(19, 9, 0);
/// First version safe to drive from several threads at once.
pub const THREAD_SAFE_VERSION: LibraryVersion = LibraryVersion::new(20, 3, 0);

/// Version-gated features of a library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub oldxml: bool,
    pub cover_data: bool,
    pub json_output: bool,
    pub reset: bool,
    pub thread_safe: bool,
}

impl From<LibraryVersion> for Capabilities {
    fn from(version: LibraryVersion) -> Self {
        Self {
            oldxml: version >= OLDXML_VERSION,
            cover_data: version >= COVER_DATA_VERSION,
            json_output: version >= JSON_OUTPUT_VERSION,
            reset: version >= RESET_VERSION,
            thread_safe: version >= THREAD_SAFE_VERSION,
        }
    }
}

// ============================================================================
// LIBRARY CACHE
// ============================================================================

static DEFAULT_LIBRARY: OnceCell<Arc<MediaInfoLib>> = OnceCell::new();

static FILE_LIBRARIES: Lazy<Mutex<HashMap<PathBuf, Arc<MediaInfoLib>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Locates and loads the native library, once per process.
///
/// With `library_file` the library is loaded from that file; otherwise the
/// platform's usual library names are searched. Successful loads are cached
/// for the lifetime of the process, failures are not.
pub fn load_library(library_file: Option<&Path>) -> CoreResult<Arc<dyn NativeLibrary>> {
    let library: Arc<MediaInfoLib> = match library_file {
        None => DEFAULT_LIBRARY.get_or_try_init(MediaInfoLib::locate)?.clone(),
        Some(path) => {
            let mut cache = FILE_LIBRARIES
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match cache.get(path) {
                Some(library) => library.clone(),
                None => {
                    let library = MediaInfoLib::load(path)?;
                    cache.insert(path.to_path_buf(), library.clone());
                    library
                }
            }
        }
    };
    Ok(library)
}
