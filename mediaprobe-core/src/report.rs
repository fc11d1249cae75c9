//! MediaInfo XML report parsing.
//!
//! Handles both report layouts the library produces:
//!
//! ```xml
//! <!-- legacy layout (Inform=OLDXML / XML before v17.10) -->
//! <Mediainfo version="0.7.99">
//!   <File>
//!     <track type="General">
//!       <File_size>404567</File_size>
//!       <File_size>395 KiB</File_size>
//!     </track>
//!   </File>
//! </Mediainfo>
//!
//! <!-- named-field layout -->
//! <MediaInfo>
//!   <media>
//!     <track type="General">
//!       <field name="FileSize">404567</field>
//!       <extra><FooterSize>59</FooterSize></extra>
//!     </track>
//!   </media>
//! </MediaInfo>
//! ```
//!
//! Both layouts feed the same `(name, value)` stream into
//! [`Track::from_fields`], so the aggregation rule is applied identically.

use crate::error::{CoreError, CoreResult};
use crate::track::Track;

const TRACK_TAG: &str = "track";
const EXTRA_TAG: &str = "extra";

/// Parses an XML report into its tracks, in document order.
///
/// A document that is not well-formed is an error; a well-formed document
/// without any `<track>` element yields an empty list.
pub fn parse_report(xml: &str) -> CoreResult<Vec<Track>> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| CoreError::MalformedReport(format!("XML parse error: {}", e)))?;

    let tracks: Vec<Track> = doc
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == TRACK_TAG)
        .map(|node| parse_track(&node))
        .collect();

    log::debug!("Parsed {} track(s) from MediaInfo report", tracks.len());
    Ok(tracks)
}

/// Parses a single `<track>` element.
fn parse_track(node: &roxmltree::Node) -> Track {
    let track_type = node.attribute("type").unwrap_or_default();
    let mut fields: Vec<(&str, &str)> = Vec::new();

    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == EXTRA_TAG && child.children().any(|n| n.is_element()) {
            for extra in child.children().filter(|n| n.is_element()) {
                fields.push(field_of(&extra));
            }
        } else {
            fields.push(field_of(&child));
        }
    }

    Track::from_fields(track_type, fields)
}

/// Field name (the `name` attribute wins over the tag) and raw text.
fn field_of<'a, 'input: 'a>(node: &roxmltree::Node<'a, 'input>) -> (&'a str, &'a str) {
    let name = node
        .attribute("name")
        .unwrap_or_else(|| node.tag_name().name());
    (name, node.text().unwrap_or_default())
}
