// ============================================================================
// mediaprobe-core/src/media_info.rs
// ============================================================================
//
// MEDIA INFO: Public Entry Point
//
// `MediaInfo::parse` is the single analysis entry point. It orchestrates:
//
// 1. INPUT RESOLUTION: strings, paths and in-memory content are classified
// 2. REMOTE FETCH: URLs are downloaded and analyzed as in-memory content
// 3. LIBRARY SESSION: one native handle is opened, configured, run, released
// 4. REPORT PARSING: structured requests are turned into tracks, raw requests
//    are returned verbatim
//
// A `MediaInfo` value is the structured result: an ordered list of tracks,
// comparable, hashable and serializable as a whole.

// ---- Internal crate imports ----
use crate::config::ParseOptions;
use crate::error::CoreResult;
use crate::fetch::fetch_url;
use crate::input::{MediaInput, ResolvedInput, resolve};
use crate::native::{LibraryVersion, NativeLibrary, load_library};
use crate::report::parse_report;
use crate::session;
use crate::track::Track;

// ---- External crate imports ----
use serde::{Deserialize, Serialize};

// ---- Standard library imports ----
use std::path::Path;

/// The tracks found in one input, in report order (General first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaInfo {
    tracks: Vec<Track>,
}

/// Result of [`MediaInfo::parse`]: tracks in structured mode, the library's
/// string in raw mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutput {
    Tracks(MediaInfo),
    Raw(String),
}

impl ParseOutput {
    pub fn tracks(&self) -> Option<&MediaInfo> {
        match self {
            ParseOutput::Tracks(info) => Some(info),
            ParseOutput::Raw(_) => None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            ParseOutput::Raw(output) => Some(output),
            ParseOutput::Tracks(_) => None,
        }
    }

    pub fn into_tracks(self) -> Option<MediaInfo> {
        match self {
            ParseOutput::Tracks(info) => Some(info),
            ParseOutput::Raw(_) => None,
        }
    }

    pub fn into_raw(self) -> Option<String> {
        match self {
            ParseOutput::Raw(output) => Some(output),
            ParseOutput::Tracks(_) => None,
        }
    }
}

impl MediaInfo {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Builds a result directly from an XML report.
    pub fn from_xml(xml: &str) -> CoreResult<Self> {
        parse_report(xml).map(Self::new)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn tracks_of(&self, track_type: &str) -> Vec<&Track> {
        self.tracks
            .iter()
            .filter(|track| track.track_type() == track_type)
            .collect()
    }

    pub fn general_tracks(&self) -> Vec<&Track> {
        self.tracks_of("General")
    }

    pub fn video_tracks(&self) -> Vec<&Track> {
        self.tracks_of("Video")
    }

    pub fn audio_tracks(&self) -> Vec<&Track> {
        self.tracks_of("Audio")
    }

    pub fn text_tracks(&self) -> Vec<&Track> {
        self.tracks_of("Text")
    }

    pub fn other_tracks(&self) -> Vec<&Track> {
        self.tracks_of("Other")
    }

    pub fn image_tracks(&self) -> Vec<&Track> {
        self.tracks_of("Image")
    }

    pub fn menu_tracks(&self) -> Vec<&Track> {
        self.tracks_of("Menu")
    }

    /// The result as plain data: `{"tracks": [{...}, ...]}`.
    pub fn to_data(&self) -> serde_json::Value {
        let tracks = self.tracks.iter().map(Track::to_data).collect::<Vec<_>>();
        serde_json::json!({ "tracks": tracks })
    }

    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuilds a result from the shape produced by [`MediaInfo::to_data`].
    pub fn from_data(data: serde_json::Value) -> CoreResult<Self> {
        Ok(serde_json::from_value(data)?)
    }

    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// True when the native library can be located and loaded. Never fails.
    pub fn can_parse(library_file: Option<&Path>) -> bool {
        match load_library(library_file) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("MediaInfo is not usable: {}", e);
                false
            }
        }
    }

    /// Version of the native library that `parse` would use.
    pub fn library_version(library_file: Option<&Path>) -> CoreResult<LibraryVersion> {
        Ok(load_library(library_file)?.version())
    }

    /// Analyzes `input` with the library selected by `options`.
    pub fn parse(input: impl Into<MediaInput>, options: &ParseOptions) -> CoreResult<ParseOutput> {
        let library = load_library(options.library_file())?;
        Self::parse_with(library.as_ref(), input, options)
    }

    /// Analyzes `input` against an already loaded library.
    pub fn parse_with(
        library: &dyn NativeLibrary,
        input: impl Into<MediaInput>,
        options: &ParseOptions,
    ) -> CoreResult<ParseOutput> {
        let resolved = match resolve(input.into()) {
            ResolvedInput::Url(url) => ResolvedInput::Content(fetch_url(&url)?),
            other => other,
        };

        let output = session::run(library, &resolved, options)?;

        if options.raw_output().is_some() {
            return Ok(ParseOutput::Raw(output));
        }

        Ok(ParseOutput::Tracks(Self::from_xml(&output)?))
    }
}

impl<'a> IntoIterator for &'a MediaInfo {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}
