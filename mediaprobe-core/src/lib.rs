//! Core library for extracting media metadata through libmediainfo.
//!
//! This crate locates the native MediaInfo library at runtime, drives one
//! independent handle per analysis, and turns the library's reports into an
//! ordered, comparable and serializable list of tracks. Raw text, JSON and
//! single-parameter reports are available as plain strings.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use mediaprobe_core::{MediaInfo, ParseOptions};
//!
//! if MediaInfo::can_parse(None) {
//!     let output = MediaInfo::parse("/path/to/movie.mkv", &ParseOptions::default()).unwrap();
//!     let info = output.into_tracks().unwrap();
//!     for track in &info {
//!         println!("{} {:?}", track, track.get("format"));
//!     }
//!
//!     let options = ParseOptions::builder()
//!         .output("General;%FileSize%")
//!         .build()
//!         .unwrap();
//!     let size = MediaInfo::parse("/path/to/movie.mkv", &options).unwrap();
//!     println!("{}", size.raw().unwrap_or_default());
//! }
//! ```

pub mod attributes;
pub mod config;
pub mod error;
pub mod fetch;
pub mod input;
pub mod media_info;
pub mod native;
pub mod report;
pub mod session;
pub mod track;

// Re-exports for public API
pub use attributes::AttributeValue;
pub use config::{ParseOptions, ParseOptionsBuilder, RawOutput};
pub use error::{CoreError, CoreResult};
pub use input::MediaInput;
pub use media_info::{MediaInfo, ParseOutput};
pub use native::{Capabilities, LibraryVersion, NativeHandle, NativeLibrary, load_library};
pub use track::Track;
