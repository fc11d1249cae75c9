//! Attribute name normalization and value typing
//!
//! MediaInfo reports name their fields in several styles (`File_size`,
//! `FooterSize`, `Channel_s_`, `_00_00_05_000`). Every field name goes through
//! [`normalize_name`] before it reaches a [`crate::Track`], so lookups only
//! ever deal with one canonical, lowercase spelling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of the auxiliary list holding repeated occurrences of a field.
pub const OTHER_PREFIX: &str = "other_";

/// Value stored under a track attribute.
///
/// `List` only appears under `other_<field>` keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl AttributeValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttributeValue::List(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Int(value) => write!(f, "{}", value),
            AttributeValue::Str(value) => f.write_str(value),
            AttributeValue::List(values) => f.write_str(&values.join(" / ")),
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

/// Maps a raw report field name onto the canonical attribute name.
///
/// The name is lowercased and every run of non-alphanumeric characters
/// becomes a single `_`, so `Channel(s)` and `Channel_s_` both map to
/// `channel_s`. Leading/trailing underscores are stripped. `id` becomes
/// `track_id`.
pub fn normalize_name(raw: &str) -> String {
    let mut name = String::with_capacity(raw.len());
    for c in raw.trim().to_lowercase().chars() {
        if c.is_alphanumeric() {
            name.push(c);
        } else if !name.ends_with('_') {
            name.push('_');
        }
    }
    let name = name.trim_matches('_');
    if name == "id" {
        "track_id".to_string()
    } else {
        name.to_string()
    }
}

/// Parses a raw field value as a base-10 integer, if it is one.
pub fn coerce_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Name of the auxiliary list for `field`.
pub fn other_name(field: &str) -> String {
    format!("{}{}", OTHER_PREFIX, field)
}
