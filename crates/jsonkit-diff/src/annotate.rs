//! Diff annotation: fold a structural diff tree into two path maps.
//!
//! The walk is a single depth-first pass that emits a flat list of
//! [`Annotation`]s; [`Annotations`] folds that list into one
//! [`PathAnnotationMap`] per document. Array entries are tracked with two
//! independent counters, since insertions and deletions shift the left and
//! right indices apart.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::map::{ChangeKind, PathAnnotationMap, Recorded};
use crate::node::{ArrayEntry, DiffNode, FieldEntry};
use crate::path::JsonPath;

/// Which of the two compared documents an annotation refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The before document.
    Left,
    /// The after document.
    Right,
}

/// A single classification emitted by the walk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub side: Side,
    pub path: String,
    pub kind: ChangeKind,
}

impl Annotation {
    fn new(side: Side, path: &JsonPath, kind: ChangeKind) -> Self {
        Self {
            side,
            path: path.to_dotted(),
            kind,
        }
    }
}

/// The left and right path maps for one diff tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    /// Classifications of locations in the before document.
    pub left: PathAnnotationMap,
    /// Classifications of locations in the after document.
    pub right: PathAnnotationMap,
}

impl Annotations {
    /// Create an empty pair of maps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if neither side has any classification.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// Total number of classified paths across both sides.
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    /// Number of added locations (right side).
    pub fn additions(&self) -> usize {
        self.right.count(ChangeKind::Add)
    }

    /// Number of deleted locations (left side).
    pub fn deletions(&self) -> usize {
        self.left.count(ChangeKind::Delete)
    }

    /// Number of updated locations, counted on the left side.
    pub fn updates(&self) -> usize {
        self.left.count(ChangeKind::Update)
    }

    /// The map for one side.
    pub fn side(&self, side: Side) -> &PathAnnotationMap {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Fold one annotation into the matching map. First write wins.
    pub fn record(&mut self, annotation: Annotation) {
        let map = match annotation.side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        if let Recorded::Conflict { existing } = map.record(annotation.path.clone(), annotation.kind)
        {
            debug!(
                side = ?annotation.side,
                path = %annotation.path,
                %existing,
                ignored = %annotation.kind,
                "conflicting classification for path"
            );
        }
    }
}

impl FromIterator<Annotation> for Annotations {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        let mut annotations = Self::new();
        for annotation in iter {
            annotations.record(annotation);
        }
        annotations
    }
}

/// Annotate a raw diff tree as produced by a structural diff tool.
///
/// Any JSON value is accepted. Null, `false` and other scalars, as well as
/// empty objects and arrays, yield two empty maps.
///
/// ```
/// use jsonkit_diff::{annotate, ChangeKind};
/// use serde_json::json;
///
/// let annotations = annotate(&json!({"a": 1, "b__added": 2}));
/// assert_eq!(annotations.right.get("b"), Some(ChangeKind::Add));
/// assert!(annotations.left.is_empty());
/// ```
pub fn annotate(diff: &Value) -> Annotations {
    annotate_node(&DiffNode::from_value(diff))
}

/// Annotate an already classified diff tree.
pub fn annotate_node(node: &DiffNode) -> Annotations {
    collect_annotations(node).into_iter().collect()
}

/// Walk a diff tree and return every emitted annotation, in walk order.
///
/// Unlike [`annotate_node`], duplicates and conflicts are kept.
pub fn collect_annotations(node: &DiffNode) -> Vec<Annotation> {
    let mut out = Vec::new();
    let mut path = JsonPath::root();
    walk(node, &mut path, &mut out);
    out
}

fn walk(node: &DiffNode, path: &mut JsonPath, out: &mut Vec<Annotation>) {
    match node {
        DiffNode::Fields(entries) => walk_fields(entries, path, out),
        DiffNode::Array(entries) => walk_array(entries, path, out),
        DiffNode::Update => {
            out.push(Annotation::new(Side::Left, path, ChangeKind::Update));
            out.push(Annotation::new(Side::Right, path, ChangeKind::Update));
        }
        DiffNode::Scalar => {}
    }
}

fn walk_fields(entries: &[FieldEntry], path: &mut JsonPath, out: &mut Vec<Annotation>) {
    for entry in entries {
        path.push_key(entry.name());
        match entry {
            FieldEntry::Added { .. } => {
                out.push(Annotation::new(Side::Right, path, ChangeKind::Add));
            }
            FieldEntry::Deleted { .. } => {
                out.push(Annotation::new(Side::Left, path, ChangeKind::Delete));
            }
            FieldEntry::Nested { node, .. } => walk(node, path, out),
        }
        path.pop();
    }
}

fn walk_array(entries: &[ArrayEntry], path: &mut JsonPath, out: &mut Vec<Annotation>) {
    let mut left_index = 0;
    let mut right_index = 0;

    for (position, entry) in entries.iter().enumerate() {
        match entry {
            ArrayEntry::Removed => {
                path.push_index(left_index);
                out.push(Annotation::new(Side::Left, path, ChangeKind::Delete));
                path.pop();
                left_index += 1;
            }
            ArrayEntry::Inserted => {
                path.push_index(right_index);
                out.push(Annotation::new(Side::Right, path, ChangeKind::Add));
                path.pop();
                right_index += 1;
            }
            ArrayEntry::Changed(node) => {
                // A changed element is addressed by its left position on both sides.
                path.push_index(left_index);
                walk(node, path, out);
                path.pop();
                left_index += 1;
                right_index += 1;
            }
            ArrayEntry::Unchanged => {
                left_index += 1;
                right_index += 1;
            }
            ArrayEntry::Malformed => {
                trace!(path = %path.to_dotted(), position, "skipping malformed array diff entry");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use proptest::prelude::*;
    use serde_json::json;

    fn entries(map: &PathAnnotationMap) -> Vec<(String, ChangeKind)> {
        map.iter().map(|(p, k)| (p.to_string(), k)).collect()
    }

    #[test]
    fn empty_roots_yield_empty_maps() {
        for diff in [json!(null), json!(false), json!({}), json!([]), json!(0), json!("")] {
            let annotations = annotate(&diff);
            assert!(annotations.is_empty(), "expected no annotations for {diff}");
        }
    }

    #[test]
    fn unchanged_full_diff_yields_empty_maps() {
        // Full-mode diff output of a document compared with itself.
        let diff = json!({
            "a": 1,
            "b": {"c": [[" ", 1], [" ", 2]]},
            "d": [[" ", {"e": true}]]
        });
        assert!(annotate(&diff).is_empty());
    }

    #[test]
    fn insertion_shifts_right_index_only() {
        // [1, 2, 3] -> [1, 2, 4, 3]
        let diff = json!([[" ", 1], [" ", 2], ["+", 4], [" ", 3]]);
        let annotations = annotate(&diff);

        assert_eq!(entries(&annotations.right), vec![("2".into(), ChangeKind::Add)]);
        assert!(annotations.left.is_empty());
        assert!(!annotations.right.contains("3"));
    }

    #[test]
    fn deletion_shifts_left_index_only() {
        // [1, 2, 3] -> [1, 3, 9]
        let diff = json!([[" ", 1], ["-", 2], [" ", 3], ["+", 9]]);
        let annotations = annotate(&diff);

        assert_eq!(entries(&annotations.left), vec![("1".into(), ChangeKind::Delete)]);
        assert_eq!(entries(&annotations.right), vec![("2".into(), ChangeKind::Add)]);
    }

    #[test]
    fn field_added() {
        // {"a": 1} -> {"a": 1, "b": 2}
        let annotations = annotate(&json!({"a": 1, "b__added": 2}));
        assert_eq!(annotations.right.get("b"), Some(ChangeKind::Add));
        assert!(!annotations.left.contains("b"));
        assert_eq!(annotations.additions(), 1);
    }

    #[test]
    fn field_deleted() {
        let annotations = annotate(&json!({"a": 1, "gone__deleted": {"deep": [1, 2]}}));
        assert_eq!(annotations.left.get("gone"), Some(ChangeKind::Delete));
        // The deleted value is terminal: nothing below it is annotated.
        assert_eq!(annotations.left.len(), 1);
        assert!(annotations.right.is_empty());
        assert_eq!(annotations.deletions(), 1);
    }

    #[test]
    fn nested_update_leaf() {
        // {"d": {"name": "alice"}} -> {"d": {"name": "bob"}}
        let diff = json!({"d": {"name": {"__old": "alice", "__new": "bob"}}});
        let annotations = annotate(&diff);

        assert_eq!(annotations.left.get("d.name"), Some(ChangeKind::Update));
        assert_eq!(annotations.right.get("d.name"), Some(ChangeKind::Update));
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations.updates(), 1);
    }

    #[test]
    fn update_leaf_contents_not_walked() {
        let diff = json!({"x": {"__old": {"a__added": 1}, "__new": [["+", 1]]}});
        let annotations = annotate(&diff);
        assert_eq!(entries(&annotations.left), vec![("x".into(), ChangeKind::Update)]);
        assert_eq!(entries(&annotations.right), vec![("x".into(), ChangeKind::Update)]);
    }

    #[test]
    fn root_update_uses_empty_path() {
        let annotations = annotate(&json!({"__old": 1, "__new": "one"}));
        assert_eq!(annotations.left.get(""), Some(ChangeKind::Update));
        assert_eq!(annotations.right.get(""), Some(ChangeKind::Update));
    }

    #[test]
    fn array_element_changed_in_place() {
        // {"e": [1, {"code": "123", "name": "test"}]}
        //   -> {"e": [1, {"code": "123", "name": "prod"}]}
        let diff = json!({
            "e": [
                [" ", 1],
                ["~", {"code": "123", "name": {"__old": "test", "__new": "prod"}}]
            ]
        });
        let annotations = annotate(&diff);

        assert_eq!(entries(&annotations.left), vec![("e.1.name".into(), ChangeKind::Update)]);
        assert_eq!(entries(&annotations.right), vec![("e.1.name".into(), ChangeKind::Update)]);
        for side in [Side::Left, Side::Right] {
            assert!(!annotations.side(side).contains("e.0"));
            assert!(!annotations.side(side).contains("e.1.code"));
        }
    }

    #[test]
    fn scalar_element_changed() {
        let diff = json!({"tags": [["~", {"__old": "a", "__new": "b"}], [" ", "c"]]});
        let annotations = annotate(&diff);
        assert_eq!(annotations.left.get("tags.0"), Some(ChangeKind::Update));
        assert_eq!(annotations.right.get("tags.0"), Some(ChangeKind::Update));
    }

    #[test]
    fn nested_arrays_track_indices_per_depth() {
        let diff = json!({
            "grid": [
                ["+", [9]],
                [" ", [1, 2]],
                ["~", [["-", 3], [" ", 4], ["+", 5]]]
            ]
        });
        let annotations = annotate(&diff);

        assert_eq!(annotations.right.get("grid.0"), Some(ChangeKind::Add));
        // Changed element sits at left index 1; inner counters start at 0.
        assert_eq!(annotations.left.get("grid.1.0"), Some(ChangeKind::Delete));
        assert_eq!(annotations.right.get("grid.1.1"), Some(ChangeKind::Add));
        assert_eq!(annotations.len(), 3);
    }

    #[test]
    fn unknown_markers_keep_indices_in_sync() {
        let diff = json!([["?", 1], [7, 2], ["-", 3], ["+", 4]]);
        let annotations = annotate(&diff);
        assert_eq!(annotations.left.get("2"), Some(ChangeKind::Delete));
        assert_eq!(annotations.right.get("2"), Some(ChangeKind::Add));
    }

    #[test]
    fn malformed_entries_do_not_advance_indices() {
        let diff = json!([[" ", 1], "loose", {"a": 1}, ["+"], ["-", 2]]);
        let annotations = annotate(&diff);
        assert_eq!(entries(&annotations.left), vec![("1".into(), ChangeKind::Delete)]);
        assert!(annotations.right.is_empty());
    }

    #[test]
    fn key_reordered_objects_have_no_annotations() {
        // A conforming diff tool reports nothing for reordered keys; the
        // full-mode output is just the unchanged document.
        let diff = json!({"b": 2, "a": {"y": 1, "x": 0}});
        assert!(annotate(&diff).is_empty());
    }

    #[test]
    fn marker_with_empty_field_name_lands_on_parent_path() {
        let annotations = annotate(&json!({"obj": {"__added": 1}}));
        assert_eq!(annotations.right.get("obj"), Some(ChangeKind::Add));
    }

    #[test]
    fn conflicting_paths_keep_first_classification() {
        // "a" -> {"b__deleted"} and the literal key "a.b" both address "a.b".
        let diff = json!({
            "a": {"b__deleted": 1},
            "a.b": {"__old": 1, "__new": 2}
        });
        let emitted = collect_annotations(&DiffNode::from_value(&diff));
        assert_eq!(emitted.len(), 3);

        let annotations = annotate(&diff);
        assert_eq!(annotations.left.get("a.b"), Some(ChangeKind::Delete));
        assert_eq!(annotations.right.get("a.b"), Some(ChangeKind::Update));
        assert_eq!(annotations.left.len(), 1);
    }

    #[test]
    fn collect_preserves_walk_order() {
        let diff = json!({"a__added": 1, "b": [["-", 1]], "c": {"__old": 1, "__new": 2}});
        let emitted = collect_annotations(&DiffNode::from_value(&diff));
        let summary: Vec<(Side, &str, ChangeKind)> = emitted
            .iter()
            .map(|a| (a.side, a.path.as_str(), a.kind))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Side::Right, "a", ChangeKind::Add),
                (Side::Left, "b.0", ChangeKind::Delete),
                (Side::Left, "c", ChangeKind::Update),
                (Side::Right, "c", ChangeKind::Update),
            ]
        );
    }

    #[test]
    fn serializes_both_sides() {
        let annotations = annotate(&json!({"a__added": 1, "b__deleted": 2}));
        let json = serde_json::to_value(&annotations).unwrap();
        assert_eq!(json, json!({"left": {"b": "delete"}, "right": {"a": "add"}}));
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-z +~-]{0,3}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 6, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                proptest::collection::btree_map(
                    "[a-z]{0,3}(__added|__deleted|__old|__new)?",
                    inner,
                    0..6
                )
                .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    /// Documents whose keys and values can never be read as diff markers.
    fn arb_document() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-z +~-]{0,3}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 6, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                proptest::collection::btree_map("[a-z]{0,3}", inner, 0..6)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    /// Full-mode diff output of `doc` compared with itself.
    fn self_diff(doc: &Value) -> Value {
        match doc {
            Value::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), self_diff(value)))
                    .collect(),
            ),
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| json!([" ", item])).collect())
            }
            scalar => scalar.clone(),
        }
    }

    proptest! {
        #[test]
        fn arbitrary_input_never_panics(value in arb_json()) {
            let emitted = collect_annotations(&DiffNode::from_value(&value));
            let annotations = annotate(&value);
            prop_assert!(annotations.len() <= emitted.len());
            for annotation in &emitted {
                prop_assert!(
                    annotations.side(annotation.side).contains(&annotation.path),
                    "{:?} {} missing from folded map",
                    annotation.side,
                    annotation.path
                );
            }
        }

        #[test]
        fn self_diff_has_no_annotations(doc in arb_document()) {
            let annotations = annotate(&self_diff(&doc));
            prop_assert!(annotations.is_empty(), "unexpected {:?}", annotations);
        }

        #[test]
        fn each_side_counts_its_own_elements(
            markers in proptest::collection::vec(
                prop_oneof![Just(" "), Just("+"), Just("-")],
                0..32,
            )
        ) {
            let diff = Value::Array(
                markers.iter().enumerate().map(|(i, m)| json!([m, i])).collect()
            );

            let mut left = 0usize;
            let mut right = 0usize;
            let mut expected_left = BTreeSet::new();
            let mut expected_right = BTreeSet::new();
            for marker in &markers {
                match *marker {
                    "-" => {
                        expected_left.insert(left.to_string());
                        left += 1;
                    }
                    "+" => {
                        expected_right.insert(right.to_string());
                        right += 1;
                    }
                    _ => {
                        left += 1;
                        right += 1;
                    }
                }
            }

            let annotations = annotate(&diff);
            let actual_left: BTreeSet<String> =
                annotations.left.paths().map(str::to_owned).collect();
            let actual_right: BTreeSet<String> =
                annotations.right.paths().map(str::to_owned).collect();
            prop_assert_eq!(actual_left, expected_left);
            prop_assert_eq!(actual_right, expected_right);
        }
    }
}
