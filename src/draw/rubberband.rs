//! In-progress polygon backing the rubberband outline.

use super::annotation::{AnnotationTarget, format_points, to_svg_target};
use crate::config::Config;
use crate::util::{BoundingRect, Env, ImageInfo, Point};
use log::{debug, warn};

/// Squared distance under which a new vertex is considered a duplicate of the last one.
const MIN_VERTEX_DISTANCE_SQ: f64 = 4.0;

/// A finished polygon handed from the draft to the tool.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    /// Committed vertices in insertion order
    pub points: Vec<Point>,
    /// Target attached by the tool on completion
    pub annotation: Option<AnnotationTarget>,
}

/// Payload of the draft's close signal.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedPolygon {
    pub shape: PolygonShape,
    pub selection: AnnotationTarget,
}

/// The draft polygon: committed vertices plus a floating cursor vertex.
///
/// The cursor follows the pointer via [`drag_to`](Self::drag_to) and only becomes
/// permanent on [`add_point`](Self::add_point).
#[derive(Debug)]
pub struct RubberbandPolygon {
    points: Vec<Point>,
    cursor: Point,
    image: ImageInfo,
    base_handle_radius: f64,
    scale: f64,
    closed: bool,
    destroyed: bool,
}

impl RubberbandPolygon {
    /// Starts a draft anchored at `anchor`, which becomes the first vertex.
    pub fn new(anchor: Point, config: &Config, env: &Env) -> Self {
        Self {
            points: vec![anchor],
            cursor: anchor,
            image: env.image.clone(),
            base_handle_radius: config.handles.base_radius(env.is_touch),
            scale: 1.0,
            closed: false,
            destroyed: false,
        }
    }

    /// Committed vertices (the cursor is not included).
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Current position of the floating vertex.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn is_live(&self) -> bool {
        !self.closed && !self.destroyed
    }

    /// Moves the floating vertex.
    pub fn drag_to(&mut self, point: Point) {
        if self.is_live() {
            self.cursor = point;
        }
    }

    /// Commits the floating vertex unless it sits on top of the last committed one.
    ///
    /// Returns whether a vertex was added.
    pub fn add_point(&mut self) -> bool {
        if !self.is_live() {
            return false;
        }

        if let Some(last) = self.points.last() {
            if self.cursor.distance_squared(last) <= MIN_VERTEX_DISTANCE_SQ {
                return false;
            }
        }

        self.points.push(self.cursor);
        debug!(
            "Rubberband vertex {} committed at ({}, {})",
            self.points.len(),
            self.cursor.x,
            self.cursor.y
        );
        true
    }

    /// Bounding rectangle of the committed vertices and the floating vertex.
    pub fn bounding_rect(&self) -> BoundingRect {
        BoundingRect::from_points(self.points.iter().chain(std::iter::once(&self.cursor)))
    }

    /// [`bounding_rect`](Self::bounding_rect) in screen pixels at the current zoom.
    pub fn screen_rect(&self) -> BoundingRect {
        let rect = self.bounding_rect();
        BoundingRect {
            x: rect.x * self.scale,
            y: rect.y * self.scale,
            width: rect.width * self.scale,
            height: rect.height * self.scale,
        }
    }

    /// Closes the outline, producing the close-signal payload.
    ///
    /// Returns `None` when fewer than 3 vertices are committed or the draft already closed.
    pub fn close(&mut self) -> Option<ClosedPolygon> {
        if !self.is_live() || self.points.len() < 3 {
            return None;
        }

        self.closed = true;
        let selection = to_svg_target(&self.points, &self.image);
        Some(ClosedPolygon {
            shape: PolygonShape {
                points: self.points.clone(),
                annotation: None,
            },
            selection,
        })
    }

    /// Adapts handle sizing to the canvas zoom factor.
    pub fn on_scale_changed(&mut self, scale: f64) {
        if !(scale.is_finite() && scale > 0.0) {
            warn!("Ignoring invalid rubberband scale {scale}");
            return;
        }
        self.scale = scale;
    }

    /// Handle radius in image units at the current zoom.
    pub fn handle_radius(&self) -> f64 {
        self.base_handle_radius / self.scale
    }

    /// Renders the outline as an SVG group: committed vertices plus the cursor,
    /// and a handle on the cursor.
    pub fn svg_markup(&self) -> String {
        if self.destroyed {
            return String::new();
        }

        let mut outline = self.points.clone();
        if !self.closed {
            outline.push(self.cursor);
        }
        let element = if self.closed { "polygon" } else { "polyline" };

        format!(
            "<g class=\"polyband-rubberband\"><{element} points=\"{}\" /><circle class=\"polyband-handle\" cx=\"{}\" cy=\"{}\" r=\"{}\" /></g>",
            format_points(&outline),
            self.cursor.x,
            self.cursor.y,
            self.handle_radius()
        )
    }

    /// Releases the draft. Further mutations are ignored.
    pub fn destroy(&mut self) {
        if !self.destroyed {
            debug!("Rubberband destroyed with {} vertices", self.points.len());
        }
        self.destroyed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Env {
        Env::new(ImageInfo::new(Some("img.png".to_string()), 200.0, 100.0))
    }

    fn draft_at(x: f64, y: f64) -> RubberbandPolygon {
        RubberbandPolygon::new(Point::new(x, y), &Config::default(), &env())
    }

    fn commit(draft: &mut RubberbandPolygon, x: f64, y: f64) {
        draft.drag_to(Point::new(x, y));
        assert!(draft.add_point());
    }

    #[test]
    fn new_draft_holds_only_the_anchor() {
        let draft = draft_at(5.0, 5.0);
        assert_eq!(draft.points(), &[Point::new(5.0, 5.0)]);
        assert_eq!(draft.bounding_rect().width, 0.0);
    }

    #[test]
    fn bounding_rect_includes_cursor() {
        let mut draft = draft_at(5.0, 5.0);
        draft.drag_to(Point::new(12.0, 7.0));
        let rect = draft.bounding_rect();
        assert_eq!((rect.width, rect.height), (7.0, 2.0));
        assert_eq!(draft.points().len(), 1);
    }

    #[test]
    fn screen_rect_scales_with_zoom() {
        let mut draft = draft_at(5.0, 5.0);
        draft.drag_to(Point::new(8.0, 6.0));
        assert_eq!(draft.screen_rect(), draft.bounding_rect());

        draft.on_scale_changed(4.0);
        let rect = draft.screen_rect();
        assert_eq!((rect.x, rect.y), (20.0, 20.0));
        assert_eq!((rect.width, rect.height), (12.0, 4.0));
    }

    #[test]
    fn add_point_skips_near_duplicates() {
        let mut draft = draft_at(5.0, 5.0);
        draft.drag_to(Point::new(6.0, 6.0));
        assert!(!draft.add_point());
        draft.drag_to(Point::new(8.0, 5.0));
        assert!(draft.add_point());
        assert_eq!(draft.points().len(), 2);
    }

    #[test]
    fn close_requires_three_vertices() {
        let mut draft = draft_at(0.0, 0.0);
        commit(&mut draft, 10.0, 0.0);
        assert!(draft.close().is_none());

        commit(&mut draft, 10.0, 10.0);
        let closed = draft.close().unwrap();
        assert_eq!(closed.shape.points.len(), 3);
        assert!(closed.shape.annotation.is_none());
        assert_eq!(
            closed.selection.selector.value,
            "<svg><polygon points=\"0,0 10,0 10,10\" /></svg>"
        );
        assert_eq!(closed.selection.source.as_deref(), Some("img.png"));
    }

    #[test]
    fn draft_closes_once() {
        let mut draft = draft_at(0.0, 0.0);
        commit(&mut draft, 10.0, 0.0);
        commit(&mut draft, 10.0, 10.0);
        assert!(draft.close().is_some());
        assert!(draft.close().is_none());
        draft.drag_to(Point::new(50.0, 50.0));
        assert!(!draft.add_point());
    }

    #[test]
    fn destroyed_draft_ignores_mutation() {
        let mut draft = draft_at(0.0, 0.0);
        draft.destroy();
        draft.drag_to(Point::new(40.0, 40.0));
        assert!(!draft.add_point());
        assert_eq!(draft.cursor(), Point::new(0.0, 0.0));
        assert!(draft.svg_markup().is_empty());
    }

    #[test]
    fn handle_radius_tracks_scale_and_touch() {
        let mut draft = draft_at(0.0, 0.0);
        assert_eq!(draft.handle_radius(), 6.0);
        draft.on_scale_changed(2.0);
        assert_eq!(draft.handle_radius(), 3.0);
        draft.on_scale_changed(0.0);
        assert_eq!(draft.handle_radius(), 3.0);

        let touch = RubberbandPolygon::new(
            Point::new(0.0, 0.0),
            &Config::default(),
            &env().with_touch(true),
        );
        assert_eq!(touch.handle_radius(), 12.0);
    }

    #[test]
    fn markup_shows_open_outline_with_cursor() {
        let mut draft = draft_at(0.0, 0.0);
        commit(&mut draft, 10.0, 0.0);
        draft.drag_to(Point::new(10.0, 10.0));
        let markup = draft.svg_markup();
        assert!(markup.contains("<polyline points=\"0,0 10,0 10,10\" />"));
        assert!(markup.contains("cx=\"10\" cy=\"10\" r=\"6\""));
    }
}
