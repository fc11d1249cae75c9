// ============================================================================
// mediaprobe-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for ParseOptions
//
// This module implements the builder pattern for the ParseOptions structure,
// providing a fluent API with defaults for every option and validation of the
// values that would otherwise only be rejected (or silently clamped) by the
// native library.
//
// KEY COMPONENTS:
// - ParseOptionsBuilder: Builder struct for creating ParseOptions instances
// - build(): validation of parse speed and raw option names

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::{ParseOptions, RawOutput};
use crate::error::{CoreError, CoreResult};

/// Builder for creating ParseOptions instances.
///
/// # Examples
///
/// ```rust
/// use mediaprobe_core::config::ParseOptionsBuilder;
///
/// let options = ParseOptionsBuilder::new()
///     .cover_data(true)
///     .legacy_stream_display(true)
///     .build()
///     .unwrap();
///
/// assert!(options.cover_data());
/// assert!(options.raw_output().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptionsBuilder {
    full: bool,
    cover_data: bool,
    parse_speed: Option<f32>,
    legacy_stream_display: bool,
    mediainfo_options: Vec<(String, String)>,
    output: Option<RawOutput>,
    text: bool,
    library_file: Option<PathBuf>,
}

impl Default for ParseOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseOptionsBuilder {
    /// Creates a new ParseOptionsBuilder with default values.
    pub fn new() -> Self {
        Self {
            full: super::DEFAULT_FULL,
            cover_data: super::DEFAULT_COVER_DATA,
            parse_speed: None,
            legacy_stream_display: super::DEFAULT_LEGACY_STREAM_DISPLAY,
            mediainfo_options: Vec::new(),
            output: None,
            text: false,
            library_file: None,
        }
    }

    /// Include internal and rarely-used fields.
    pub fn full(mut self, full: bool) -> Self {
        self.full = full;
        self
    }

    /// Request embedded artwork as base64 text (`cover_data` attribute).
    ///
    /// Ignored by libraries older than v18.03.
    pub fn cover_data(mut self, cover_data: bool) -> Self {
        self.cover_data = cover_data;
        self
    }

    /// Analysis thoroughness, from 0.0 (fastest) to 1.0 (read everything).
    pub fn parse_speed(mut self, parse_speed: f32) -> Self {
        self.parse_speed = Some(parse_speed);
        self
    }

    /// Use the older display format for compound fields such as channel
    /// layouts (`"2 / 1 / 1"` instead of `2`).
    pub fn legacy_stream_display(mut self, legacy_stream_display: bool) -> Self {
        self.legacy_stream_display = legacy_stream_display;
        self
    }

    /// Adds a raw library option, passed through verbatim.
    pub fn mediainfo_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.mediainfo_options.push((name.into(), value.into()));
        self
    }

    /// Adds several raw library options, in iteration order.
    pub fn mediainfo_options<I, K, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.mediainfo_options
            .extend(options.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Selects raw output from an output template (`""`, `"JSON"` or
    /// `"Section;%Parameter%"`).
    pub fn output(mut self, template: &str) -> Self {
        self.output = Some(RawOutput::from_template(template));
        self
    }

    /// Selects raw output.
    pub fn raw_output(mut self, output: RawOutput) -> Self {
        self.output = Some(output);
        self
    }

    /// Forces the text report, overriding any output chosen with `output`.
    #[deprecated(note = "use `output(\"\")` instead")]
    pub fn text(mut self, text: bool) -> Self {
        self.text = text;
        self
    }

    /// Load the native library from this file instead of searching for it.
    pub fn library_file(mut self, library_file: impl Into<PathBuf>) -> Self {
        self.library_file = Some(library_file.into());
        self
    }

    /// Validates the options and builds the immutable ParseOptions.
    pub fn build(self) -> CoreResult<ParseOptions> {
        if let Some(speed) = self.parse_speed {
            if !speed.is_finite() || !(0.0..=1.0).contains(&speed) {
                return Err(CoreError::InvalidOption(format!(
                    "parse_speed must be between 0.0 and 1.0, got {}",
                    speed
                )));
            }
        }

        if let Some((name, _)) = self
            .mediainfo_options
            .iter()
            .find(|(name, _)| name.trim().is_empty())
        {
            return Err(CoreError::InvalidOption(format!(
                "MediaInfo option names must not be empty (got {:?})",
                name
            )));
        }

        let output = match (self.output, self.text) {
            (_, true) => Some(RawOutput::Text),
            (output, false) => output,
        };

        Ok(ParseOptions {
            full: self.full,
            cover_data: self.cover_data,
            parse_speed: self.parse_speed,
            legacy_stream_display: self.legacy_stream_display,
            mediainfo_options: self.mediainfo_options,
            output,
            library_file: self.library_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_match_default() {
        assert_eq!(ParseOptionsBuilder::new().build().unwrap(), ParseOptions::default());
    }

    #[test]
    fn test_parse_speed_range() {
        assert!(ParseOptionsBuilder::new().parse_speed(0.0).build().is_ok());
        assert!(ParseOptionsBuilder::new().parse_speed(1.0).build().is_ok());
        assert!(matches!(
            ParseOptionsBuilder::new().parse_speed(1.5).build(),
            Err(CoreError::InvalidOption(_))
        ));
        assert!(ParseOptionsBuilder::new().parse_speed(f32::NAN).build().is_err());
    }

    #[test]
    fn test_empty_option_name_rejected() {
        let result = ParseOptionsBuilder::new().mediainfo_option(" ", "x").build();
        assert!(matches!(result, Err(CoreError::InvalidOption(_))));
    }

    #[test]
    fn test_mediainfo_options_keep_order() {
        let options = ParseOptionsBuilder::new()
            .mediainfo_option("Language", "raw")
            .mediainfo_options(vec![("File_TestContinuousFileNames", "0")])
            .build()
            .unwrap();
        let names: Vec<&str> = options
            .mediainfo_options()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, ["Language", "File_TestContinuousFileNames"]);
    }

    #[test]
    #[allow(deprecated)]
    fn test_text_alias() {
        let options = ParseOptionsBuilder::new().text(true).build().unwrap();
        assert_eq!(options.raw_output(), Some(&RawOutput::Text));

        let options = ParseOptionsBuilder::new().output("JSON").text(true).build().unwrap();
        assert_eq!(options.raw_output(), Some(&RawOutput::Text));

        let options = ParseOptionsBuilder::new().text(true).output("JSON").build().unwrap();
        assert_eq!(options.raw_output(), Some(&RawOutput::Text));

        let options = ParseOptionsBuilder::new().text(false).output("JSON").build().unwrap();
        assert_eq!(options.raw_output(), Some(&RawOutput::Json));
    }
}
