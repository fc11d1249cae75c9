//! Input resolution
//!
//! Responsibilities:
//! - Accept strings, paths and in-memory content through one `MediaInput` type
//! - Classify string locations as URLs (`scheme://...`) or local paths
//! - Route in-memory content around all path logic
//!
//! Existence of local paths is not checked here: the session
//! reports a missing file when the library fails to open it.

use std::path::{Path, PathBuf};

/// A caller-supplied input to analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaInput {
    /// A string location: URL or local path.
    Location(String),
    /// A path-like value.
    Path(PathBuf),
    /// Media bytes held in memory.
    Content(Vec<u8>),
}

impl MediaInput {
    /// Wraps in-memory media content (bytes or text).
    pub fn content(data: impl Into<Vec<u8>>) -> Self {
        MediaInput::Content(data.into())
    }
}

impl From<&str> for MediaInput {
    fn from(location: &str) -> Self {
        MediaInput::Location(location.to_string())
    }
}

impl From<String> for MediaInput {
    fn from(location: String) -> Self {
        MediaInput::Location(location)
    }
}

impl From<&Path> for MediaInput {
    fn from(path: &Path) -> Self {
        MediaInput::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for MediaInput {
    fn from(path: PathBuf) -> Self {
        MediaInput::Path(path)
    }
}

impl From<&PathBuf> for MediaInput {
    fn from(path: &PathBuf) -> Self {
        MediaInput::Path(path.clone())
    }
}

impl From<Vec<u8>> for MediaInput {
    fn from(data: Vec<u8>) -> Self {
        MediaInput::Content(data)
    }
}

impl From<&[u8]> for MediaInput {
    fn from(data: &[u8]) -> Self {
        MediaInput::Content(data.to_vec())
    }
}

/// An input after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedInput {
    Url(String),
    Local(PathBuf),
    Content(Vec<u8>),
}

impl ResolvedInput {
    pub fn is_remote(&self) -> bool {
        matches!(self, ResolvedInput::Url(_))
    }

    /// Short description for log and error messages.
    pub fn describe(&self) -> String {
        match self {
            ResolvedInput::Url(url) => url.clone(),
            ResolvedInput::Local(path) => path.display().to_string(),
            ResolvedInput::Content(data) => format!("<{} bytes in memory>", data.len()),
        }
    }
}

/// Returns the URI scheme of `location` if it has the `scheme://` shape.
pub fn scheme_of(location: &str) -> Option<&str> {
    let (scheme, _) = location.split_once("://")?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    chars
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        .then_some(scheme)
}

/// True when `location` looks like a URL rather than a local path.
///
/// A local path that happens to look like `scheme://...` is still a URL;
/// callers holding such files must pass their content instead.
pub fn is_url(location: &str) -> bool {
    scheme_of(location).is_some()
}

/// Classifies a string location, returning it unchanged with its URL flag.
pub fn parse_filename(location: &str) -> (String, bool) {
    (location.to_string(), is_url(location))
}

/// Classifies an input.
pub fn resolve(input: MediaInput) -> ResolvedInput {
    let resolved = match input {
        MediaInput::Content(data) => ResolvedInput::Content(data),
        MediaInput::Location(location) => {
            if is_url(&location) {
                ResolvedInput::Url(location)
            } else {
                ResolvedInput::Local(PathBuf::from(location))
            }
        }
        MediaInput::Path(path) => match path.to_str() {
            Some(location) if is_url(location) => ResolvedInput::Url(location.to_string()),
            _ => ResolvedInput::Local(path),
        },
    };
    log::debug!("Resolved input: {}", resolved.describe());
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_of() {
        assert_eq!(scheme_of("https://localhost"), Some("https"));
        assert_eq!(scheme_of("svn+ssh://host/repo"), Some("svn+ssh"));
        assert_eq!(scheme_of("unsupportedscheme://"), Some("unsupportedscheme"));
        assert_eq!(scheme_of("/tmp/file.mkv"), None);
        assert_eq!(scheme_of("1http://x"), None);
        assert_eq!(scheme_of("://x"), None);
        assert_eq!(scheme_of("dir with space://x"), None);
    }

    #[test]
    fn test_parse_filename_local() {
        let (name, remote) = parse_filename("/data/test.txt");
        assert_eq!(name, "/data/test.txt");
        assert!(!remote);
    }

    #[test]
    fn test_parse_filename_url() {
        assert!(parse_filename("https://localhost").1);
    }

    #[test]
    fn test_resolve_path_like() {
        let path = Path::new("/data").join("test.txt");
        assert_eq!(resolve(MediaInput::from(&path)), ResolvedInput::Local(path));
    }

    #[test]
    fn test_resolve_content_skips_path_logic() {
        let resolved = resolve(MediaInput::content("https://not-a-url-here"));
        assert!(matches!(resolved, ResolvedInput::Content(_)));
        assert!(!resolved.is_remote());
    }

    #[test]
    fn test_resolve_url_string() {
        let resolved = resolve("https://example.com/sample.mkv".into());
        assert!(resolved.is_remote());
    }
}
