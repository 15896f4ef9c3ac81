//! Polygon geometry: the in-progress rubberband, saved annotations and their editors.
//!
//! This module defines the shape types the polygon tool works with:
//! - [`RubberbandPolygon`]: the draft polygon that follows the pointer while drawing
//! - [`Annotation`] / [`AnnotationTarget`]: the SVG selector target produced on completion
//! - [`EditablePolygon`]: a saved polygon reopened for vertex-level editing

pub mod annotation;
pub mod editable;
pub mod rubberband;

// Re-export commonly used types at module level
pub use annotation::{
    Annotation, AnnotationError, AnnotationTarget, SVG_SELECTOR, Selector, to_svg_target,
};
pub use editable::{EditablePolygon, EditableShape};
pub use rubberband::{ClosedPolygon, PolygonShape, RubberbandPolygon};
