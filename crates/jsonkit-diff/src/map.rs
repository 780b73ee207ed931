//! Path to change-kind lookup tables.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How a location differs between the two documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Present only in the right document.
    Add,
    /// Present only in the left document.
    Delete,
    /// Present in both, with different values.
    Update,
}

impl ChangeKind {
    /// Lowercase name, as used in serialized maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Delete => "delete",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of recording a classification into a [`PathAnnotationMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recorded {
    /// The path was new.
    Inserted,
    /// The path was already recorded with the same kind.
    Duplicate,
    /// The path was already recorded with a different kind, which was kept.
    Conflict { existing: ChangeKind },
}

/// Sparse mapping from dotted paths to change kinds for one document.
///
/// A path absent from the map means "no change at this location".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathAnnotationMap {
    entries: BTreeMap<String, ChangeKind>,
}

impl PathAnnotationMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the classification for a path.
    pub fn get(&self, path: &str) -> Option<ChangeKind> {
        self.entries.get(path).copied()
    }

    /// Returns `true` if the path has a classification.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Returns `true` if no path is classified.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of classified paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of paths classified as `kind`.
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.entries.values().filter(|k| **k == kind).count()
    }

    /// Iterate over `(path, kind)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ChangeKind)> {
        self.entries.iter().map(|(path, kind)| (path.as_str(), *kind))
    }

    /// Iterate over classified paths in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Record a classification. The first classification of a path wins.
    pub fn record(&mut self, path: impl Into<String>, kind: ChangeKind) -> Recorded {
        use std::collections::btree_map::Entry;

        match self.entries.entry(path.into()) {
            Entry::Vacant(slot) => {
                slot.insert(kind);
                Recorded::Inserted
            }
            Entry::Occupied(slot) if *slot.get() == kind => Recorded::Duplicate,
            Entry::Occupied(slot) => Recorded::Conflict {
                existing: *slot.get(),
            },
        }
    }
}
