//! Diff annotation for jsonkit.
//!
//! Structural JSON diff tools describe the difference between two documents
//! as a nested, loosely typed tree. This crate classifies that tree and folds
//! it into two flat lookups, one per document, mapping dotted paths such as
//! `"user.tags.0"` to a change kind. Renderers use the lookups to style the
//! nodes of two side-by-side tree views.
//!
//! # Key Types
//!
//! - [`DiffNode`] / [`FieldEntry`] / [`ArrayEntry`] -- Typed diff tree
//! - [`annotate`] / [`Annotations`] / [`Annotation`] -- Per-side path classification
//! - [`PathAnnotationMap`] / [`ChangeKind`] -- Path to change-kind lookup
//! - [`JsonPath`] / [`Segment`] -- Dotted path building
//! - [`annotated_lines`] / [`ViewLine`] -- Tree view styled by a map

pub mod annotate;
pub mod error;
pub mod map;
pub mod node;
pub mod path;
pub mod view;

pub use annotate::{annotate, annotate_node, collect_annotations, Annotation, Annotations, Side};
pub use error::{DiffError, DiffResult};
pub use map::{ChangeKind, PathAnnotationMap, Recorded};
pub use node::{ArrayEntry, DiffNode, FieldEntry};
pub use path::{JsonPath, Segment};
pub use view::{annotated_lines, ViewLine};
