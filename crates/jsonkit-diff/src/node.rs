//! Typed view of a structural diff tree.
//!
//! Structural diff tools describe changes between two JSON documents as a
//! loosely typed JSON tree: marker keys (`name__added`, `name__deleted`),
//! update leaves (`{"__old": .., "__new": ..}`) and arrays of
//! `[marker, payload]` tuples. [`DiffNode`] classifies that tree once, up
//! front, so the annotator can match exhaustively instead of probing keys.

use serde_json::{Map, Value};

use crate::error::DiffResult;

/// Suffix of a field present only in the right document.
pub const ADDED_SUFFIX: &str = "__added";
/// Suffix of a field present only in the left document.
pub const DELETED_SUFFIX: &str = "__deleted";
/// Key holding the left value of an update leaf.
pub const OLD_KEY: &str = "__old";
/// Key holding the right value of an update leaf.
pub const NEW_KEY: &str = "__new";

/// Array tuple marker: element inserted on the right.
pub const MARKER_INSERTED: &str = "+";
/// Array tuple marker: element removed from the left.
pub const MARKER_REMOVED: &str = "-";
/// Array tuple marker: element changed in place.
pub const MARKER_CHANGED: &str = "~";
/// Array tuple marker: element unchanged.
pub const MARKER_UNCHANGED: &str = " ";

/// One node of a structural diff tree.
#[derive(Clone, Debug, PartialEq)]
pub enum DiffNode {
    /// An object whose keys are field names or added/deleted markers.
    Fields(Vec<FieldEntry>),
    /// An array of diff entries.
    Array(Vec<ArrayEntry>),
    /// An `{"__old": .., "__new": ..}` leaf: the value at this position
    /// changed between the two documents.
    Update,
    /// A plain scalar (or null). Carries no change information.
    Scalar,
}

/// A single key of a [`DiffNode::Fields`] object.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldEntry {
    /// `name__added`: the field exists only on the right.
    Added { name: String },
    /// `name__deleted`: the field exists only on the left.
    Deleted { name: String },
    /// An ordinary field; its value may hold further changes.
    Nested { name: String, node: DiffNode },
}

/// A single entry of a [`DiffNode::Array`].
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayEntry {
    /// `["+", value]`
    Inserted,
    /// `["-", value]`
    Removed,
    /// `["~", node]`
    Changed(DiffNode),
    /// `[" ", value]`, or a tuple whose marker is not recognized.
    Unchanged,
    /// Anything that is not a two-element array.
    Malformed,
}

impl DiffNode {
    /// Classify a JSON value as a diff node.
    ///
    /// Never fails: shapes that carry no recognizable change information
    /// become [`DiffNode::Scalar`] or [`ArrayEntry::Malformed`].
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_object(map),
            Value::Array(items) => Self::Array(items.iter().map(ArrayEntry::from_value).collect()),
            _ => Self::Scalar,
        }
    }

    /// Parse diff tree text and classify it.
    pub fn from_json_str(s: &str) -> DiffResult<Self> {
        let value: Value = serde_json::from_str(s)?;
        Ok(Self::from_value(&value))
    }

    fn from_object(map: &Map<String, Value>) -> Self {
        // Marker keys take precedence: an object carrying any of them is a
        // field container even if it also has `__old`/`__new`.
        let has_markers = map.keys().any(|key| is_marker_key(key));
        if !has_markers {
            if map.contains_key(OLD_KEY) && map.contains_key(NEW_KEY) {
                return Self::Update;
            }
        }

        Self::Fields(
            map.iter()
                .map(|(key, value)| FieldEntry::from_pair(key, value))
                .collect(),
        )
    }
}

impl FieldEntry {
    fn from_pair(key: &str, value: &Value) -> Self {
        if let Some(name) = key.strip_suffix(ADDED_SUFFIX) {
            Self::Added {
                name: name.to_string(),
            }
        } else if let Some(name) = key.strip_suffix(DELETED_SUFFIX) {
            Self::Deleted {
                name: name.to_string(),
            }
        } else {
            Self::Nested {
                name: key.to_string(),
                node: DiffNode::from_value(value),
            }
        }
    }

    /// The field name with any marker suffix stripped.
    pub fn name(&self) -> &str {
        match self {
            Self::Added { name } | Self::Deleted { name } | Self::Nested { name, .. } => name,
        }
    }
}

impl ArrayEntry {
    fn from_value(value: &Value) -> Self {
        let pair = match value {
            Value::Array(pair) if pair.len() == 2 => pair,
            _ => return Self::Malformed,
        };

        match pair[0].as_str() {
            Some(MARKER_INSERTED) => Self::Inserted,
            Some(MARKER_REMOVED) => Self::Removed,
            Some(MARKER_CHANGED) => Self::Changed(DiffNode::from_value(&pair[1])),
            _ => Self::Unchanged,
        }
    }
}

/// Returns `true` for keys ending in `__added` or `__deleted`.
pub fn is_marker_key(key: &str) -> bool {
    key.ends_with(ADDED_SUFFIX) || key.ends_with(DELETED_SUFFIX)
}
