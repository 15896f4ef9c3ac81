//! Editable representation of a saved polygon annotation.

use super::annotation::{
    Annotation, AnnotationError, AnnotationTarget, SVG_SELECTOR, parse_polygon_points,
    to_svg_target,
};
use crate::config::Config;
use crate::util::{self, BoundingRect, Env, ImageInfo, Point};
use log::{debug, warn};

/// Vertex-level editing surface shared by every shape kind a tool can produce.
pub trait EditableShape: std::fmt::Debug {
    /// Current vertices in image coordinates.
    fn vertices(&self) -> &[Point];

    /// Adapts handle sizing to the canvas zoom factor.
    fn on_scale_changed(&mut self, scale: f64);

    /// Handle radius in image units at the current zoom.
    fn handle_radius(&self) -> f64;

    /// Index of the vertex whose handle contains `point`, if any.
    fn hit_vertex(&self, point: Point) -> Option<usize>;

    /// Moves one vertex, clamped to the image.
    fn move_vertex(&mut self, index: usize, x: f64, y: f64) -> Result<(), AnnotationError>;

    /// Moves the whole shape, stopping at the image edges.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Re-serializes the edited geometry, keeping the original annotation id.
    fn to_annotation(&self) -> Annotation;
}

/// A persisted polygon opened for editing.
#[derive(Debug, Clone)]
pub struct EditablePolygon {
    id: Option<String>,
    points: Vec<Point>,
    image: ImageInfo,
    base_handle_radius: f64,
    scale: f64,
}

impl EditablePolygon {
    /// Opens an annotation for editing.
    ///
    /// # Errors
    /// Fails when the annotation carries no SVG selector, the selector is not a
    /// polygon, or it has fewer than 3 vertices.
    pub fn from_annotation(
        annotation: &Annotation,
        config: &Config,
        env: &Env,
    ) -> Result<Self, AnnotationError> {
        let selector = annotation
            .selector(SVG_SELECTOR)
            .ok_or(AnnotationError::MissingSelector(SVG_SELECTOR))?;
        let points = parse_polygon_points(&selector.value)?;
        if points.len() < 3 {
            return Err(AnnotationError::TooFewVertices(points.len()));
        }

        debug!(
            "Editing polygon {:?} with {} vertices",
            annotation.id,
            points.len()
        );

        Ok(Self {
            id: annotation.id.clone(),
            points,
            image: env.image.clone(),
            base_handle_radius: config.handles.base_radius(env.is_touch),
            scale: 1.0,
        })
    }

    pub fn to_target(&self) -> AnnotationTarget {
        to_svg_target(&self.points, &self.image)
    }
}

impl EditableShape for EditablePolygon {
    fn vertices(&self) -> &[Point] {
        &self.points
    }

    fn on_scale_changed(&mut self, scale: f64) {
        if !(scale.is_finite() && scale > 0.0) {
            warn!("Ignoring invalid editable shape scale {scale}");
            return;
        }
        self.scale = scale;
    }

    fn handle_radius(&self) -> f64 {
        self.base_handle_radius / self.scale
    }

    fn hit_vertex(&self, point: Point) -> Option<usize> {
        let radius = self.handle_radius();
        let radius_sq = radius * radius;
        // Later vertices are drawn on top, so they win ties
        self.points
            .iter()
            .rposition(|vertex| vertex.distance_squared(&point) <= radius_sq)
    }

    fn move_vertex(&mut self, index: usize, x: f64, y: f64) -> Result<(), AnnotationError> {
        let len = self.points.len();
        let clamped = self.image.clamp(x, y);
        let vertex = self
            .points
            .get_mut(index)
            .ok_or(AnnotationError::VertexOutOfRange { index, len })?;
        *vertex = clamped;
        Ok(())
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        let bounds = BoundingRect::from_points(&self.points);
        let dx = util::clamp(dx, -bounds.x, self.image.natural_width - (bounds.x + bounds.width));
        let dy = util::clamp(
            dy,
            -bounds.y,
            self.image.natural_height - (bounds.y + bounds.height),
        );
        for point in &mut self.points {
            point.x += dx;
            point.y += dy;
        }
    }

    fn to_annotation(&self) -> Annotation {
        Annotation::new(self.id.clone(), self.to_target())
    }
}
