//! libloading binding to the MediaInfo C API (wide-character variant).
//!
//! The library is opened at runtime rather than linked, so a host without
//! libmediainfo can still run everything except the analysis itself and
//! `MediaInfo::can_parse` simply answers `false`.

use crate::error::{CoreError, CoreResult};
use crate::native::wide::{WChar, from_wide_ptr, path_to_wide, to_wide};
use crate::native::{LibraryVersion, NativeHandle, NativeLibrary, StreamKind};

use libloading::Library;

use std::ffi::c_void;
use std::os::raw::c_int;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Library file names tried, in order, when no explicit file is given.
#[cfg(target_os = "windows")]
pub const LIBRARY_NAMES: &[&str] = &["MediaInfo.dll"];
#[cfg(target_os = "macos")]
pub const LIBRARY_NAMES: &[&str] = &["libmediainfo.0.dylib", "libmediainfo.dylib"];
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const LIBRARY_NAMES: &[&str] = &["libmediainfo.so.0", "libmediainfo.so"];

/// Bytes handed to `MediaInfo_Open_Buffer_Continue` per call.
const BUFFER_CHUNK: usize = 64 * 1024;

/// Bit of the `Open_Buffer_Continue` status meaning "finished".
const BUFFER_FINISHED: usize = 0x08;

/// Returned by `Open_Buffer_Continue_GoTo_Get` when no seek is requested.
const NO_SEEK: u64 = u64::MAX;

type RawHandle = *mut c_void;

type NewFn = unsafe extern "C" fn() -> RawHandle;
type DeleteFn = unsafe extern "C" fn(RawHandle);
type CloseFn = unsafe extern "C" fn(RawHandle);
type OpenFn = unsafe extern "C" fn(RawHandle, *const WChar) -> usize;
type OpenBufferInitFn = unsafe extern "C" fn(RawHandle, u64, u64) -> usize;
type OpenBufferContinueFn = unsafe extern "C" fn(RawHandle, *const u8, usize) -> usize;
type OpenBufferGoToGetFn = unsafe extern "C" fn(RawHandle) -> u64;
type OpenBufferFinalizeFn = unsafe extern "C" fn(RawHandle) -> usize;
type InformFn = unsafe extern "C" fn(RawHandle, usize) -> *const WChar;
type OptionFn = unsafe extern "C" fn(RawHandle, *const WChar, *const WChar) -> *const WChar;
type CountGetFn = unsafe extern "C" fn(RawHandle, c_int, usize) -> usize;

/// Resolved entry points. Only valid while the owning `Library` is loaded.
struct Api {
    new: NewFn,
    delete: DeleteFn,
    close: CloseFn,
    open: OpenFn,
    open_buffer_init: OpenBufferInitFn,
    open_buffer_continue: OpenBufferContinueFn,
    open_buffer_goto_get: OpenBufferGoToGetFn,
    open_buffer_finalize: OpenBufferFinalizeFn,
    inform: InformFn,
    option: OptionFn,
    count_get: CountGetFn,
}

impl Api {
    fn resolve(library: &Library) -> Result<Self, libloading::Error> {
        // SAFETY: every signature matches MediaInfoDLL.h for the wchar_t API.
        unsafe {
            Ok(Self {
                new: *library.get::<NewFn>(b"MediaInfo_New\0")?,
                delete: *library.get::<DeleteFn>(b"MediaInfo_Delete\0")?,
                close: *library.get::<CloseFn>(b"MediaInfo_Close\0")?,
                open: *library.get::<OpenFn>(b"MediaInfo_Open\0")?,
                open_buffer_init: *library.get::<OpenBufferInitFn>(b"MediaInfo_Open_Buffer_Init\0")?,
                open_buffer_continue: *library
                    .get::<OpenBufferContinueFn>(b"MediaInfo_Open_Buffer_Continue\0")?,
                open_buffer_goto_get: *library
                    .get::<OpenBufferGoToGetFn>(b"MediaInfo_Open_Buffer_Continue_GoTo_Get\0")?,
                open_buffer_finalize: *library
                    .get::<OpenBufferFinalizeFn>(b"MediaInfo_Open_Buffer_Finalize\0")?,
                inform: *library.get::<InformFn>(b"MediaInfo_Inform\0")?,
                option: *library.get::<OptionFn>(b"MediaInfo_Option\0")?,
                count_get: *library.get::<CountGetFn>(b"MediaInfo_Count_Get\0")?,
            })
        }
    }
}

/// The loaded libmediainfo shared library.
pub struct MediaInfoLib {
    api: Api,
    location: PathBuf,
    version_string: String,
    version: LibraryVersion,
    // Declared last so the entry points above never outlive the library.
    _library: Library,
}

impl MediaInfoLib {
    /// Searches the platform's usual library names.
    pub fn locate() -> CoreResult<Arc<Self>> {
        let mut failures = Vec::new();
        for name in LIBRARY_NAMES {
            match Self::load(Path::new(name)) {
                Ok(library) => return Ok(library),
                Err(e) => {
                    log::debug!("Could not load {}: {}", name, e);
                    failures.push(format!("{}: {}", name, e));
                }
            }
        }
        Err(CoreError::LibraryUnavailable(format!(
            "libmediainfo not found (tried {})",
            failures.join("; ")
        )))
    }

    /// Loads the library from a specific file (or bare library name).
    pub fn load(location: &Path) -> CoreResult<Arc<Self>> {
        // SAFETY: loading libmediainfo runs no initialisers with preconditions.
        let library = unsafe { Library::new(location.as_os_str()) }
            .map_err(|e| CoreError::LibraryUnavailable(format!("{}: {}", location.display(), e)))?;
        let api = Api::resolve(&library).map_err(|e| {
            CoreError::LibraryUnavailable(format!(
                "{} is missing MediaInfo symbols: {}",
                location.display(),
                e
            ))
        })?;

        let version_string = Self::query_version(&api)?;
        let version: LibraryVersion = version_string.parse()?;
        log::debug!(
            "Loaded {} from {} (v{})",
            version_string,
            location.display(),
            version
        );

        Ok(Arc::new(Self {
            api,
            location: location.to_path_buf(),
            version_string,
            version,
            _library: library,
        }))
    }

    fn query_version(api: &Api) -> CoreResult<String> {
        let name = to_wide("Info_Version");
        let empty = to_wide("");
        // SAFETY: the handle is created, used and released within this block.
        unsafe {
            let handle = (api.new)();
            if handle.is_null() {
                return Err(CoreError::LibraryUnavailable(
                    "MediaInfo_New returned a null handle".to_string(),
                ));
            }
            let version = from_wide_ptr((api.option)(handle, name.as_ptr(), empty.as_ptr()));
            (api.close)(handle);
            (api.delete)(handle);
            Ok(version)
        }
    }

    /// Where the library was loaded from.
    pub fn location(&self) -> &Path {
        &self.location
    }
}

impl NativeLibrary for MediaInfoLib {
    fn version_string(&self) -> &str {
        &self.version_string
    }

    fn version(&self) -> LibraryVersion {
        self.version
    }

    fn open_handle(&self) -> CoreResult<Box<dyn NativeHandle + '_>> {
        // SAFETY: MediaInfo_New has no preconditions.
        let raw = unsafe { (self.api.new)() };
        if raw.is_null() {
            return Err(CoreError::RuntimeFailure(
                "MediaInfo_New returned a null handle".to_string(),
            ));
        }
        Ok(Box::new(MediaInfoHandle { api: &self.api, raw }))
    }
}

/// A live `MediaInfo_New` handle, closed and deleted on drop.
struct MediaInfoHandle<'lib> {
    api: &'lib Api,
    raw: RawHandle,
}

impl NativeHandle for MediaInfoHandle<'_> {
    fn option(&mut self, name: &str, value: &str) -> String {
        let name = to_wide(name);
        let value = to_wide(value);
        // SAFETY: `raw` is live; the returned buffer is copied before any other call.
        unsafe { from_wide_ptr((self.api.option)(self.raw, name.as_ptr(), value.as_ptr())) }
    }

    fn open_file(&mut self, path: &Path) -> usize {
        let path = path_to_wide(path);
        // SAFETY: `raw` is live and `path` is NUL-terminated.
        unsafe { (self.api.open)(self.raw, path.as_ptr()) }
    }

    fn open_buffer(&mut self, data: &[u8]) -> usize {
        feed_buffer(self, data);
        // SAFETY: `raw` is live and has been fed the whole buffer.
        unsafe { (self.api.open_buffer_finalize)(self.raw) };
        self.stream_count(StreamKind::General)
    }

    fn inform(&mut self) -> String {
        // SAFETY: `raw` is live; the returned buffer is copied immediately.
        unsafe { from_wide_ptr((self.api.inform)(self.raw, 0)) }
    }

    fn stream_count(&mut self, kind: StreamKind) -> usize {
        // SAFETY: `raw` is live; usize::MAX asks for the number of streams.
        unsafe { (self.api.count_get)(self.raw, kind as c_int, usize::MAX) }
    }
}

impl BufferFeed for MediaInfoHandle<'_> {
    fn init(&mut self, size: u64, offset: u64) {
        // SAFETY: `raw` is live.
        unsafe { (self.api.open_buffer_init)(self.raw, size, offset) };
    }

    fn feed(&mut self, chunk: &[u8]) -> usize {
        // SAFETY: `raw` is live and `chunk` outlives the call.
        unsafe { (self.api.open_buffer_continue)(self.raw, chunk.as_ptr(), chunk.len()) }
    }

    fn seek_request(&mut self) -> u64 {
        // SAFETY: `raw` is live.
        unsafe { (self.api.open_buffer_goto_get)(self.raw) }
    }
}

/// The incremental buffer half of the C API.
trait BufferFeed {
    fn init(&mut self, size: u64, offset: u64);
    fn feed(&mut self, chunk: &[u8]) -> usize;
    fn seek_request(&mut self) -> u64;
}

/// Feeds `data` in chunks until the library reports it is finished or the
/// input runs out. Seek requests restart feeding at the requested offset.
fn feed_buffer(feed: &mut impl BufferFeed, data: &[u8]) {
    let size = data.len() as u64;
    let mut offset = 0usize;
    feed.init(size, 0);
    while offset < data.len() {
        let end = offset.saturating_add(BUFFER_CHUNK).min(data.len());
        if feed.feed(&data[offset..end]) & BUFFER_FINISHED != 0 {
            break;
        }
        offset = end;

        let seek = feed.seek_request();
        if seek != NO_SEEK {
            offset = usize::try_from(seek).unwrap_or(usize::MAX).min(data.len());
            feed.init(size, offset as u64);
        }
    }
}

impl Drop for MediaInfoHandle<'_> {
    fn drop(&mut self) {
        // SAFETY: `raw` came from MediaInfo_New and is released exactly once.
        unsafe {
            (self.api.close)(self.raw);
            (self.api.delete)(self.raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_names_not_empty() {
        assert!(!LIBRARY_NAMES.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_unavailable() {
        let result = MediaInfoLib::load(Path::new("/nonexistent/libmediainfo.so.0"));
        assert!(matches!(result, Err(CoreError::LibraryUnavailable(_))));
    }

    /// Records every buffer call; finishes after `finish_after` chunks and
    /// asks for one seek after the first chunk when `seek_to` is set.
    #[derive(Default)]
    struct RecordingFeed {
        inits: Vec<u64>,
        chunks: Vec<usize>,
        seek_requests: usize,
        seek_to: Option<u64>,
        finish_after: Option<usize>,
    }

    impl BufferFeed for RecordingFeed {
        fn init(&mut self, _size: u64, offset: u64) {
            self.inits.push(offset);
        }

        fn feed(&mut self, chunk: &[u8]) -> usize {
            self.chunks.push(chunk.len());
            if Some(self.chunks.len()) == self.finish_after {
                BUFFER_FINISHED
            } else {
                0
            }
        }

        fn seek_request(&mut self) -> u64 {
            self.seek_requests += 1;
            self.seek_to.take().unwrap_or(NO_SEEK)
        }
    }

    #[test]
    fn test_feed_buffer_stops_when_input_runs_out() {
        let data = vec![0u8; BUFFER_CHUNK + 10];
        let mut feed = RecordingFeed::default();
        feed_buffer(&mut feed, &data);

        assert_eq!(feed.inits, vec![0]);
        assert_eq!(feed.chunks, vec![BUFFER_CHUNK, 10]);
        assert_eq!(feed.seek_requests, 2);
    }

    #[test]
    fn test_feed_buffer_empty_input_sends_nothing() {
        let mut feed = RecordingFeed::default();
        feed_buffer(&mut feed, &[]);

        assert_eq!(feed.inits, vec![0]);
        assert!(feed.chunks.is_empty());
        assert_eq!(feed.seek_requests, 0);
    }

    #[test]
    fn test_feed_buffer_stops_when_finished() {
        let data = vec![0u8; BUFFER_CHUNK * 3];
        let mut feed = RecordingFeed {
            finish_after: Some(1),
            ..Default::default()
        };
        feed_buffer(&mut feed, &data);

        assert_eq!(feed.chunks, vec![BUFFER_CHUNK]);
        assert_eq!(feed.seek_requests, 0);
    }

    #[test]
    fn test_feed_buffer_honours_seek() {
        let data = vec![0u8; BUFFER_CHUNK * 2];
        let mut feed = RecordingFeed {
            seek_to: Some((BUFFER_CHUNK * 2 - 100) as u64),
            ..Default::default()
        };
        feed_buffer(&mut feed, &data);

        assert_eq!(feed.inits, vec![0, (BUFFER_CHUNK * 2 - 100) as u64]);
        assert_eq!(feed.chunks, vec![BUFFER_CHUNK, 100]);
    }

    #[test]
    #[ignore = "requires libmediainfo"]
    fn test_locate_real_library() {
        let library = MediaInfoLib::locate().unwrap();
        assert!(library.version_string().starts_with("MediaInfoLib"));
        let mut handle = library.open_handle().unwrap();
        assert_eq!(handle.stream_count(StreamKind::General), 0);
    }
}
