// ============================================================================
// mediaprobe-core/src/track.rs
// ============================================================================
//
// TRACK MODEL: One Logical Stream of an Analysis Report
//
// A Track is an ordered mapping of canonical attribute names to values. It is
// built once by the report parser from a single <track> element and never
// mutated afterwards.
//
// FIELD AGGREGATION:
// - The first occurrence of a field becomes `<field>` (as a string)
// - Later occurrences are appended, in order, to `other_<field>`
// - A field that gained an `other_<field>` list is retyped to an integer when
//   its own value, or failing that the first list entry, parses as one; the
//   displaced string is appended to the list
// - Fields seen exactly once keep their raw string

// ---- Internal crate imports ----
use crate::attributes::{AttributeValue, OTHER_PREFIX, coerce_int, normalize_name, other_name};

// ---- External crate imports ----
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---- Standard library imports ----
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Attribute under which the track category is stored.
pub const TRACK_TYPE: &str = "track_type";

/// One track (General, Video, Audio, Text, Menu, ...) of an analysis report.
#[derive(Debug, Clone, Default)]
pub struct Track {
    entries: Vec<(String, AttributeValue)>,
    index: HashMap<String, usize>,
}

impl Track {
    /// Builds a track from its category and its raw `(field name, value)`
    /// pairs in report order, applying name normalization and field
    /// aggregation.
    pub fn from_fields<I, N, V>(track_type: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<String>,
    {
        let mut track = Track::default();
        track.insert(TRACK_TYPE.to_string(), AttributeValue::Str(track_type.to_string()));

        for (raw_name, value) in fields {
            let name = normalize_name(raw_name.as_ref());
            let value = value.into();
            if !track.index.contains_key(&name) {
                track.insert(name, AttributeValue::Str(value));
                continue;
            }
            let other = other_name(&name);
            match track.get_mut(&other) {
                Some(AttributeValue::List(values)) => values.push(value),
                _ => track.insert(other, AttributeValue::List(vec![value])),
            }
        }

        track.promote_integers();
        track
    }

    fn promote_integers(&mut self) {
        let aggregated: Vec<String> = self
            .entries
            .iter()
            .filter(|(name, value)| {
                name.starts_with(OTHER_PREFIX) && matches!(value, AttributeValue::List(_))
            })
            .map(|(name, _)| name[OTHER_PREFIX.len()..].to_string())
            .collect();

        for primary in aggregated {
            if primary == TRACK_TYPE {
                continue;
            }
            let Some(AttributeValue::Str(current)) = self.get(&primary).cloned() else {
                continue;
            };
            if let Some(number) = coerce_int(&current) {
                self.insert(primary, AttributeValue::Int(number));
                continue;
            }

            let other = other_name(&primary);
            let promoted = self
                .get(&other)
                .and_then(AttributeValue::as_list)
                .and_then(|values| values.iter().find_map(|v| coerce_int(v)));
            if let Some(number) = promoted {
                if let Some(AttributeValue::List(values)) = self.get_mut(&other) {
                    values.push(current);
                }
                self.insert(primary, AttributeValue::Int(number));
            }
        }
    }

    fn insert(&mut self, name: String, value: AttributeValue) {
        match self.index.get(&name) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, value));
            }
        }
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut AttributeValue> {
        let position = *self.index.get(name)?;
        Some(&mut self.entries[position].1)
    }

    /// The track category, e.g. "General", "Video", "Audio", "Text", "Menu".
    pub fn track_type(&self) -> &str {
        self.get_str(TRACK_TYPE).unwrap_or_default()
    }

    /// Looks up an attribute. `None` is the "no value" marker: a missing
    /// attribute is never an error.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.index.get(name).map(|&position| &self.entries[position].1)
    }

    /// Alias of [`Track::get`].
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.get(name)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(AttributeValue::as_int)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttributeValue::as_str)
    }

    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(AttributeValue::as_list)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attributes in report order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The track as a plain JSON object.
    pub fn to_data(&self) -> serde_json::Value {
        // String keys and untagged values always serialize.
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sorted: Vec<&(String, AttributeValue)> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        sorted.len().hash(state);
        for (name, value) in sorted {
            name.hash(state);
            value.hash(state);
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Track track_type='{}'>", self.track_type())
    }
}

impl Serialize for Track {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Track {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TrackVisitor;

        impl<'de> Visitor<'de> for TrackVisitor {
            type Value = Track;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of track attributes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Track, A::Error> {
                let mut track = Track::default();
                while let Some((name, value)) = access.next_entry::<String, AttributeValue>()? {
                    track.insert(name, value);
                }
                if !track.contains(TRACK_TYPE) {
                    return Err(de::Error::missing_field(TRACK_TYPE));
                }
                Ok(track)
            }
        }

        deserializer.deserialize_map(TrackVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn general() -> Track {
        Track::from_fields(
            "General",
            vec![
                ("File_size", "404567"),
                ("File_size", "395 KiB"),
                ("File_size", "395 KiB"),
                ("Duration", "958 ms"),
                ("Duration", "958"),
                ("FooterSize", "59"),
                ("Stream_size", "3353 / 45"),
                ("Stream_size", "3353 / 45 bytes"),
            ],
        )
    }

    #[test]
    fn test_track_type_is_first_attribute() {
        let track = general();
        assert_eq!(track.track_type(), "General");
        assert_eq!(track.iter().next().map(|(name, _)| name), Some(TRACK_TYPE));
    }

    #[test]
    fn test_primary_integer_is_promoted() {
        let track = general();
        assert_eq!(track.get_int("file_size"), Some(404567));
        assert_eq!(track.get_list("other_file_size").map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_first_integer_occurrence_replaces_string() {
        let track = general();
        assert_eq!(track.get_int("duration"), Some(958));
        assert_eq!(
            track.get_list("other_duration"),
            Some(&["958".to_string(), "958 ms".to_string()][..])
        );
    }

    #[test]
    fn test_single_occurrence_stays_string() {
        let track = general();
        assert_eq!(track.get_str("footersize"), Some("59"));
        assert!(!track.contains("other_footersize"));
    }

    #[test]
    fn test_non_integer_aggregate_keeps_first_string() {
        let track = general();
        assert_eq!(track.get_str("stream_size"), Some("3353 / 45"));
        assert_eq!(track.get_list("other_stream_size").map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_missing_attribute_is_none() {
        assert!(general().get("does_not_exist").is_none());
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a = Track::from_fields("Audio", vec![("Format", "AAC"), ("Channel_s_", "2")]);
        let b = Track::from_fields("Audio", vec![("Channel_s_", "2"), ("Format", "AAC")]);
        assert_eq!(a, b);
        let c = Track::from_fields("Audio", vec![("Format", "MP3"), ("Channel_s_", "2")]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        use std::collections::hash_map::DefaultHasher;
        let hash = |track: &Track| {
            let mut hasher = DefaultHasher::new();
            track.hash(&mut hasher);
            hasher.finish()
        };
        let a = Track::from_fields("Audio", vec![("Format", "AAC"), ("Channel_s_", "2")]);
        let b = Track::from_fields("Audio", vec![("Channel_s_", "2"), ("Format", "AAC")]);
        assert_eq!(hash(&a), hash(&b));
    }

    #[test]
    fn test_serde_round_trip() {
        let track = general();
        let json = serde_json::to_string(&track).unwrap();
        let back: Track = serde_json::from_str(&json).unwrap();
        assert_eq!(track, back);
        assert_eq!(back.get_int("duration"), Some(958));
    }

    #[test]
    fn test_deserialize_requires_track_type() {
        let result: Result<Track, _> = serde_json::from_str(r#"{"format": "AVC"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_to_data_preserves_types() {
        let data = general().to_data();
        assert_eq!(data["file_size"], serde_json::json!(404567));
        assert_eq!(data["footersize"], serde_json::json!("59"));
        assert!(data["other_duration"].is_array());
    }

    #[test]
    fn test_to_data_matches_serialized_form() {
        let track = general();
        assert_eq!(track.to_data(), serde_json::to_value(&track).unwrap());
        assert_eq!(track.to_data().as_object().map(|map| map.len()), Some(track.len()));
    }
}
