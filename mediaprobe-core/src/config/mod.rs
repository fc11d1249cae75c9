//! Configuration structures and constants for a single analysis call.
//!
//! A [`ParseOptions`] value is resolved once per `MediaInfo::parse` call and
//! is never mutated afterwards, so it can be shared freely between threads.

mod builder;

use std::path::{Path, PathBuf};

pub use builder::ParseOptionsBuilder;

// Default constants

/// Include internal and rarely-used fields (`Complete` option).
pub const DEFAULT_FULL: bool = true;

/// Do not request embedded artwork.
pub const DEFAULT_COVER_DATA: bool = false;

/// Use the current stream display format for compound fields.
pub const DEFAULT_LEGACY_STREAM_DISPLAY: bool = false;

/// Output template selecting the JSON report.
pub const JSON_TEMPLATE: &str = "JSON";

/// Raw (string) output requested from the library instead of tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawOutput {
    /// Full human-readable text report.
    Text,
    /// JSON report in the library's native schema.
    Json,
    /// A `Section;%Parameter%` template extracting a single value.
    Parameter(String),
}

impl RawOutput {
    /// Interprets an output template: `""` is the text report, `"JSON"` the
    /// JSON report, anything else a parameter template.
    pub fn from_template(template: &str) -> Self {
        match template {
            "" => RawOutput::Text,
            JSON_TEMPLATE => RawOutput::Json,
            other => RawOutput::Parameter(other.to_string()),
        }
    }

    /// The `Inform` selector passed to the library.
    pub fn template(&self) -> &str {
        match self {
            RawOutput::Text => "",
            RawOutput::Json => JSON_TEMPLATE,
            RawOutput::Parameter(template) => template,
        }
    }
}

/// Options for one analysis call.
///
/// # Examples
///
/// ```rust
/// use mediaprobe_core::config::{ParseOptions, RawOutput};
///
/// let options = ParseOptions::builder()
///     .full(false)
///     .parse_speed(1.0)
///     .mediainfo_option("Language", "raw")
///     .output("General;%FileSize%")
///     .build()
///     .unwrap();
///
/// assert_eq!(options.raw_output(), Some(&RawOutput::Parameter("General;%FileSize%".into())));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    pub(crate) full: bool,
    pub(crate) cover_data: bool,
    pub(crate) parse_speed: Option<f32>,
    pub(crate) legacy_stream_display: bool,
    pub(crate) mediainfo_options: Vec<(String, String)>,
    pub(crate) output: Option<RawOutput>,
    pub(crate) library_file: Option<PathBuf>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            full: DEFAULT_FULL,
            cover_data: DEFAULT_COVER_DATA,
            parse_speed: None,
            legacy_stream_display: DEFAULT_LEGACY_STREAM_DISPLAY,
            mediainfo_options: Vec::new(),
            output: None,
            library_file: None,
        }
    }
}

impl ParseOptions {
    pub fn builder() -> ParseOptionsBuilder {
        ParseOptionsBuilder::new()
    }

    pub fn full(&self) -> bool {
        self.full
    }

    pub fn cover_data(&self) -> bool {
        self.cover_data
    }

    /// `None` leaves the library's own default in place.
    pub fn parse_speed(&self) -> Option<f32> {
        self.parse_speed
    }

    pub fn legacy_stream_display(&self) -> bool {
        self.legacy_stream_display
    }

    /// Raw library options, in the order they will be applied.
    pub fn mediainfo_options(&self) -> &[(String, String)] {
        &self.mediainfo_options
    }

    /// `None` selects structured (track) output.
    pub fn raw_output(&self) -> Option<&RawOutput> {
        self.output.as_ref()
    }

    pub fn library_file(&self) -> Option<&Path> {
        self.library_file.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_template() {
        assert_eq!(RawOutput::from_template(""), RawOutput::Text);
        assert_eq!(RawOutput::from_template("JSON"), RawOutput::Json);
        assert_eq!(
            RawOutput::from_template("General;%FileSize%"),
            RawOutput::Parameter("General;%FileSize%".to_string())
        );
    }

    #[test]
    fn test_template_round_trip() {
        for template in ["", "JSON", "Video;%Format%"] {
            assert_eq!(RawOutput::from_template(template).template(), template);
        }
    }

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert!(options.full());
        assert!(!options.cover_data());
        assert!(options.parse_speed().is_none());
        assert!(!options.legacy_stream_display());
        assert!(options.mediainfo_options().is_empty());
        assert!(options.raw_output().is_none());
        assert!(options.library_file().is_none());
    }
}
