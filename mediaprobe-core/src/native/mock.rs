// mediaprobe-core/src/native/mock.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and when the "test-mocks" feature is enabled.

use super::{LibraryVersion, NativeHandle, NativeLibrary, StreamKind};
use crate::error::CoreResult;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// A call received by a mock handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Open,
    Option(String, String),
    OpenFile(PathBuf),
    OpenBuffer(usize),
    Inform,
    Close,
}

/// In-process stand-in for libmediainfo.
///
/// Outputs are served per `Inform` selector (`"OLDXML"`, `""`, `"JSON"`,
/// `"General;%FileSize%"`, ...). Files open successfully iff they exist on
/// disk; buffers iff they are non-empty.
#[derive(Debug)]
pub struct MockLibrary {
    version_string: String,
    version: LibraryVersion,
    outputs: HashMap<String, String>,
    fail_open: bool,
    inform_delay: Option<Duration>,
    calls: Mutex<Vec<MockCall>>,
    live_handles: AtomicUsize,
    opened_handles: AtomicUsize,
    peak_handles: AtomicUsize,
}

impl MockLibrary {
    /// A mock reporting `version` (e.g. "20.09").
    pub fn new(version: &str) -> Self {
        Self {
            version_string: format!("MediaInfoLib - v{}", version),
            version: version.parse().unwrap_or(LibraryVersion::new(0, 0, 0)),
            outputs: HashMap::new(),
            fail_open: false,
            inform_delay: None,
            calls: Mutex::new(Vec::new()),
            live_handles: AtomicUsize::new(0),
            opened_handles: AtomicUsize::new(0),
            peak_handles: AtomicUsize::new(0),
        }
    }

    /// Serves `output` when `Inform` is set to `selector`.
    pub fn with_output(mut self, selector: &str, output: impl Into<String>) -> Self {
        self.outputs.insert(selector.to_string(), output.into());
        self
    }

    /// Serves `xml` for structured requests (both XML selectors).
    pub fn with_report(self, xml: &str) -> Self {
        self.with_output("OLDXML", xml).with_output("XML", xml)
    }

    /// Makes every open report failure, as with an unsupported input.
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Sleeps in every `Inform` call, keeping handles open longer.
    pub fn with_inform_delay(mut self, delay: Duration) -> Self {
        self.inform_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// The `(name, value)` pairs of every option call, in order.
    pub fn options_applied(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::Option(name, value) => Some((name, value)),
                _ => None,
            })
            .collect()
    }

    /// Handles currently open.
    pub fn live_handles(&self) -> usize {
        self.live_handles.load(Ordering::SeqCst)
    }

    /// Handles opened since creation.
    pub fn handles_opened(&self) -> usize {
        self.opened_handles.load(Ordering::SeqCst)
    }

    /// Most handles ever open at the same time.
    pub fn peak_handles(&self) -> usize {
        self.peak_handles.load(Ordering::SeqCst)
    }

    fn record(&self, call: MockCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl NativeLibrary for MockLibrary {
    fn version_string(&self) -> &str {
        &self.version_string
    }

    fn version(&self) -> LibraryVersion {
        self.version
    }

    fn open_handle(&self) -> CoreResult<Box<dyn NativeHandle + '_>> {
        let live = self.live_handles.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_handles.fetch_max(live, Ordering::SeqCst);
        self.opened_handles.fetch_add(1, Ordering::SeqCst);
        self.record(MockCall::Open);
        Ok(Box::new(MockHandle {
            library: self,
            selector: String::new(),
            opened: false,
        }))
    }
}

struct MockHandle<'a> {
    library: &'a MockLibrary,
    selector: String,
    opened: bool,
}

impl NativeHandle for MockHandle<'_> {
    fn option(&mut self, name: &str, value: &str) -> String {
        self.library
            .record(MockCall::Option(name.to_string(), value.to_string()));
        match name {
            "Inform" => {
                self.selector = value.to_string();
                String::new()
            }
            "Info_Version" => self.library.version_string.clone(),
            _ => String::new(),
        }
    }

    fn open_file(&mut self, path: &Path) -> usize {
        self.library.record(MockCall::OpenFile(path.to_path_buf()));
        self.opened = !self.library.fail_open && path.exists();
        usize::from(self.opened)
    }

    fn open_buffer(&mut self, data: &[u8]) -> usize {
        self.library.record(MockCall::OpenBuffer(data.len()));
        self.opened = !self.library.fail_open && !data.is_empty();
        usize::from(self.opened)
    }

    fn inform(&mut self) -> String {
        self.library.record(MockCall::Inform);
        if let Some(delay) = self.library.inform_delay {
            thread::sleep(delay);
        }
        self.library
            .outputs
            .get(&self.selector)
            .cloned()
            .unwrap_or_default()
    }

    fn stream_count(&mut self, kind: StreamKind) -> usize {
        usize::from(self.opened && kind == StreamKind::General)
    }
}

impl Drop for MockHandle<'_> {
    fn drop(&mut self) {
        self.library.record(MockCall::Close);
        self.library.live_handles.fetch_sub(1, Ordering::SeqCst);
    }
}
