// ============================================================================
// mediaprobe-core/src/session.rs
// ============================================================================
//
// LIBRARY SESSION: One Native Handle, Open to Close
//
// A LibrarySession owns exactly one native handle for exactly one analysis:
// open -> configure -> analyze -> fetch output -> close/delete. The handle is
// released when the session is dropped, so every exit path (success, failed
// analysis, error while configuring) releases it before an error escapes.
//
// CONCURRENCY:
// Every session opens its own handle and never shares it. Libraries older
// than the thread-safety threshold additionally serialize whole sessions
// through a process-wide lock.

// ---- Internal crate imports ----
use crate::config::{ParseOptions, RawOutput};
use crate::error::{CoreError, CoreResult, open_failed_error};
use crate::input::ResolvedInput;
use crate::native::{Capabilities, LibraryVersion, NativeHandle, NativeLibrary};

// ---- Standard library imports ----
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Serializes sessions on libraries that are not thread-safe.
static SERIAL_SESSIONS: Mutex<()> = Mutex::new(());

/// What the session should retrieve from the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputRequest {
    /// The XML report, for the track model.
    Tracks,
    /// A raw string returned verbatim.
    Raw(RawOutput),
}

impl OutputRequest {
    pub fn from_options(options: &ParseOptions) -> Self {
        match options.raw_output() {
            Some(output) => OutputRequest::Raw(output.clone()),
            None => OutputRequest::Tracks,
        }
    }
}

/// A single-use session around one native handle.
pub struct LibrarySession<'lib> {
    handle: Box<dyn NativeHandle + 'lib>,
    version: LibraryVersion,
    capabilities: Capabilities,
    reset_pending: bool,
    // Released after the handle.
    _serial: Option<MutexGuard<'static, ()>>,
}

impl<'lib> LibrarySession<'lib> {
    /// Acquires a new handle from `library`.
    pub fn open(library: &'lib dyn NativeLibrary) -> CoreResult<Self> {
        let version = library.version();
        let capabilities = Capabilities::from(version);

        let serial = if capabilities.thread_safe {
            None
        } else {
            log::debug!(
                "MediaInfoLib v{} is not thread-safe, serializing sessions",
                version
            );
            Some(SERIAL_SESSIONS.lock().unwrap_or_else(PoisonError::into_inner))
        };

        let handle = library.open_handle()?;
        log::debug!("Opened MediaInfo handle (v{})", version);

        Ok(Self {
            handle,
            version,
            capabilities,
            reset_pending: false,
            _serial: serial,
        })
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn set(&mut self, name: &str, value: &str) {
        log::debug!("MediaInfo option {}={:?}", name, value);
        self.handle.option(name, value);
    }

    /// The `Inform` selector for `request`.
    fn selector(&self, request: &OutputRequest) -> CoreResult<String> {
        match request {
            OutputRequest::Tracks if self.capabilities.oldxml => Ok("OLDXML".to_string()),
            OutputRequest::Tracks => Ok("XML".to_string()),
            OutputRequest::Raw(RawOutput::Json) if !self.capabilities.json_output => {
                Err(CoreError::RuntimeFailure(format!(
                    "JSON output requires MediaInfoLib v18.03 or newer (v{} detected)",
                    self.version
                )))
            }
            OutputRequest::Raw(output) => Ok(output.template().to_string()),
        }
    }

    /// Applies the options for this call, in library order: output format,
    /// parse speed, legacy stream display, cover data, completeness, then
    /// the caller's raw options.
    pub fn configure(&mut self, options: &ParseOptions, request: &OutputRequest) -> CoreResult<()> {
        let selector = self.selector(request)?;

        self.set("CharSet", "UTF-8");
        self.set("Inform", &selector);

        if let Some(speed) = options.parse_speed() {
            self.set("ParseSpeed", &speed.to_string());
        }

        self.set(
            "LegacyStreamDisplay",
            if options.legacy_stream_display() { "1" } else { "" },
        );

        if self.capabilities.cover_data {
            self.set("Cover_Data", if options.cover_data() { "base64" } else { "" });
        } else if options.cover_data() {
            log::debug!(
                "Cover_Data is not supported by MediaInfoLib v{}, ignoring",
                self.version
            );
        }

        self.set("Complete", if options.full() { "1" } else { "" });

        if !options.mediainfo_options().is_empty() {
            if !self.capabilities.reset {
                log::warn!(
                    "MediaInfoLib v{} cannot reset options to their defaults; custom options \
                     may leak into later analyses",
                    self.version
                );
            }
            for (name, value) in options.mediainfo_options() {
                self.set(name, value);
            }
            self.reset_pending = self.capabilities.reset;
        }

        Ok(())
    }

    /// Runs the analysis on a local file or in-memory content.
    pub fn analyze(&mut self, input: &ResolvedInput) -> CoreResult<()> {
        match input {
            ResolvedInput::Local(path) => {
                if self.handle.open_file(path) == 0 {
                    if !path.exists() {
                        return Err(CoreError::NotFound(path.clone()));
                    }
                    return Err(open_failed_error(&path.display().to_string()));
                }
            }
            ResolvedInput::Content(data) => {
                if self.handle.open_buffer(data) == 0 {
                    return Err(open_failed_error(&input.describe()));
                }
            }
            ResolvedInput::Url(url) => {
                return Err(CoreError::RuntimeFailure(format!(
                    "{} must be fetched before it can be analyzed",
                    url
                )));
            }
        }
        log::debug!("Analyzed {}", input.describe());
        Ok(())
    }

    /// Retrieves the report in the format selected by `configure`.
    pub fn fetch_output(&mut self) -> String {
        let output = self.handle.inform();
        self.reset();
        output
    }

    fn reset(&mut self) {
        if self.reset_pending {
            self.reset_pending = false;
            self.set("Reset", "");
        }
    }
}

impl Drop for LibrarySession<'_> {
    fn drop(&mut self) {
        self.reset();
        log::debug!("Releasing MediaInfo handle");
    }
}

/// Runs one complete session and returns the library's output string.
pub fn run(
    library: &dyn NativeLibrary,
    input: &ResolvedInput,
    options: &ParseOptions,
) -> CoreResult<String> {
    let request = OutputRequest::from_options(options);
    let mut session = LibrarySession::open(library)?;
    session.configure(options, &request)?;
    session.analyze(input)?;
    Ok(session.fetch_output())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::mock::{MockCall, MockLibrary};
    use std::path::PathBuf;

    fn option_names(library: &MockLibrary) -> Vec<String> {
        library
            .options_applied()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    #[test]
    fn test_configure_order_on_recent_library() {
        let library = MockLibrary::new("20.09");
        let options = ParseOptions::builder()
            .parse_speed(1.0)
            .mediainfo_option("Language", "raw")
            .build()
            .unwrap();
        let mut session = LibrarySession::open(&library).unwrap();
        session.configure(&options, &OutputRequest::Tracks).unwrap();

        assert_eq!(
            option_names(&library),
            [
                "CharSet",
                "Inform",
                "ParseSpeed",
                "LegacyStreamDisplay",
                "Cover_Data",
                "Complete",
                "Language"
            ]
        );
        assert!(
            library
                .options_applied()
                .contains(&("Inform".to_string(), "OLDXML".to_string()))
        );
        assert!(
            library
                .options_applied()
                .contains(&("ParseSpeed".to_string(), "1".to_string()))
        );
    }

    #[test]
    fn test_cover_data_skipped_on_old_library() {
        let library = MockLibrary::new("17.12");
        let options = ParseOptions::builder().cover_data(true).build().unwrap();
        let mut session = LibrarySession::open(&library).unwrap();
        session.configure(&options, &OutputRequest::Tracks).unwrap();
        assert!(!option_names(&library).contains(&"Cover_Data".to_string()));
    }

    #[test]
    fn test_xml_selector_before_oldxml() {
        let library = MockLibrary::new("0.7.99");
        let mut session = LibrarySession::open(&library).unwrap();
        session
            .configure(&ParseOptions::default(), &OutputRequest::Tracks)
            .unwrap();
        drop(session);
        assert!(
            library
                .options_applied()
                .contains(&("Inform".to_string(), "XML".to_string()))
        );
    }

    #[test]
    fn test_json_rejected_before_18_03() {
        let library = MockLibrary::new("17.10");
        let mut session = LibrarySession::open(&library).unwrap();
        let result = session.configure(
            &ParseOptions::default(),
            &OutputRequest::Raw(RawOutput::Json),
        );
        assert!(matches!(result, Err(CoreError::RuntimeFailure(_))));
    }

    #[test]
    fn test_reset_issued_after_custom_options() {
        let library = MockLibrary::new("19.09").with_output("", "report");
        let options = ParseOptions::builder()
            .mediainfo_option("Language", "raw")
            .output("")
            .build()
            .unwrap();
        let input = ResolvedInput::Content(vec![1, 2, 3]);
        assert_eq!(run(&library, &input, &options).unwrap(), "report");

        let calls = library.calls();
        let inform = calls.iter().position(|c| *c == MockCall::Inform).unwrap();
        let reset = calls
            .iter()
            .position(|c| *c == MockCall::Option("Reset".into(), "".into()))
            .unwrap();
        assert!(reset > inform);
        assert_eq!(calls.last(), Some(&MockCall::Close));
    }

    #[test]
    fn test_no_reset_without_custom_options_or_support() {
        let library = MockLibrary::new("19.04");
        let options = ParseOptions::builder()
            .mediainfo_option("Language", "raw")
            .build()
            .unwrap();
        run(&library, &ResolvedInput::Content(vec![0]), &options).unwrap();
        assert!(!option_names(&library).contains(&"Reset".to_string()));

        let library = MockLibrary::new("20.09");
        run(&library, &ResolvedInput::Content(vec![0]), &ParseOptions::default()).unwrap();
        assert!(!option_names(&library).contains(&"Reset".to_string()));
    }

    #[test]
    fn test_missing_file_is_not_found_and_handle_released() {
        let library = MockLibrary::new("20.09");
        let path = PathBuf::from("/this/file/does/not/exist.mp4");
        let result = run(&library, &ResolvedInput::Local(path.clone()), &ParseOptions::default());
        assert!(matches!(result, Err(CoreError::NotFound(p)) if p == path));
        assert_eq!(library.live_handles(), 0);
        assert_eq!(library.handles_opened(), 1);
    }

    #[test]
    fn test_existing_but_unreadable_input_is_runtime_failure() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let library = MockLibrary::new("20.09").failing_open();
        let result = run(
            &library,
            &ResolvedInput::Local(file.path().to_path_buf()),
            &ParseOptions::default(),
        );
        assert!(matches!(result, Err(CoreError::RuntimeFailure(_))));
        assert_eq!(library.live_handles(), 0);
    }

    #[test]
    fn test_unfetched_url_is_runtime_failure() {
        let library = MockLibrary::new("20.09");
        let result = run(
            &library,
            &ResolvedInput::Url("https://example.com/a.mkv".into()),
            &ParseOptions::default(),
        );
        assert!(matches!(result, Err(CoreError::RuntimeFailure(_))));
        assert_eq!(library.live_handles(), 0);
    }

    #[test]
    fn test_handle_released_when_configure_fails() {
        let library = MockLibrary::new("17.10");
        let options = ParseOptions::builder().output("JSON").build().unwrap();
        let result = run(&library, &ResolvedInput::Content(vec![1]), &options);
        assert!(result.is_err());
        assert_eq!(library.live_handles(), 0);
        assert_eq!(library.calls().last(), Some(&MockCall::Close));
    }
}
