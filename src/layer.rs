//! Annotation layer: the host side of the drawing tools.
//!
//! Owns the tool registry and the active tool, routes pointer and keyboard
//! input to it, and turns completed shapes into stored annotations.

use crate::config::Config;
use crate::draw::{Annotation, AnnotationError, EditableShape};
use crate::input::{DrawingTool, Key, PointerEvent, PolygonTool, ToolEvent, ToolRegistry};
use crate::util::Env;
use log::{debug, info};

/// Canvas-level state shared by every drawing session.
#[derive(Debug)]
pub struct AnnotationLayer {
    config: Config,
    env: Env,
    registry: ToolRegistry,
    tool: Box<dyn DrawingTool>,
    scale: f64,
    annotations: Vec<Annotation>,
    cancelled: usize,
    next_id: u64,
}

impl AnnotationLayer {
    /// Creates a layer with the default registry and the polygon tool selected.
    pub fn new(config: Config, env: Env) -> Self {
        let tool = Box::new(PolygonTool::new(config.clone(), env.clone()));
        Self::from_parts(config, env, ToolRegistry::default(), tool)
    }

    /// Creates a layer over a custom registry, selecting its first tool.
    ///
    /// # Errors
    /// Returns [`AnnotationError::EmptyRegistry`] when the registry is empty.
    pub fn with_registry(
        config: Config,
        env: Env,
        registry: ToolRegistry,
    ) -> Result<Self, AnnotationError> {
        let entry = registry
            .identifiers()
            .next()
            .and_then(|id| registry.get(id))
            .copied()
            .ok_or(AnnotationError::EmptyRegistry)?;
        let tool = (entry.create)(&config, &env);
        Ok(Self::from_parts(config, env, registry, tool))
    }

    fn from_parts(
        config: Config,
        env: Env,
        registry: ToolRegistry,
        tool: Box<dyn DrawingTool>,
    ) -> Self {
        Self {
            config,
            env,
            registry,
            tool,
            scale: 1.0,
            annotations: Vec::new(),
            cancelled: 0,
            next_id: 1,
        }
    }

    /// Switches the active tool, abandoning any drawing in progress.
    pub fn set_tool(&mut self, identifier: &str) -> Result<(), AnnotationError> {
        let entry = *self
            .registry
            .get(identifier)
            .ok_or_else(|| AnnotationError::UnknownTool(identifier.to_string()))?;

        self.tool.stop();
        self.collect_events();

        self.tool = (entry.create)(&self.config, &self.env);
        debug!("Active tool set to '{identifier}'");
        Ok(())
    }

    pub fn tool(&self) -> &dyn DrawingTool {
        self.tool.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.tool.is_drawing()
    }

    /// Primary button pressed at image coordinates: starts a session when idle.
    pub fn press(&mut self, x: f64, y: f64) {
        if !self.tool.is_drawing() {
            self.start_drawing(x, y, self.config.tool.draw_on_single_click);
        }
    }

    /// Starts a session with an explicit single-click choice.
    ///
    /// The new draft picks up the current zoom factor.
    pub fn start_drawing(&mut self, x: f64, y: f64, start_on_single_click: bool) {
        self.tool.start_drawing(x, y, start_on_single_click);
        if self.scale != 1.0 {
            self.tool.on_scale_changed(self.scale);
        }
    }

    /// Delivers a pointer event to the active tool and collects its results.
    pub fn dispatch(&mut self, event: PointerEvent) {
        self.tool.handle_event(event);
        self.collect_events();
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.dispatch(PointerEvent::Move { x, y });
    }

    pub fn pointer_up(&mut self) {
        self.dispatch(PointerEvent::Up);
    }

    pub fn double_click(&mut self) {
        self.dispatch(PointerEvent::DoubleClick);
    }

    /// Keyboard input. Escape abandons the drawing in progress.
    pub fn on_key(&mut self, key: Key) {
        if key == Key::Escape && self.tool.is_drawing() {
            self.tool.stop();
            self.collect_events();
            self.cancelled += 1;
            debug!("Drawing abandoned with Escape");
        }
    }

    /// Propagates the canvas zoom factor to the active tool.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
        self.tool.on_scale_changed(scale);
    }

    /// Opens a stored annotation with whichever registered tool supports it.
    pub fn edit(&self, annotation: &Annotation) -> Result<Box<dyn EditableShape>, AnnotationError> {
        let entry = self
            .registry
            .for_annotation(annotation)
            .ok_or(AnnotationError::Unsupported)?;

        if entry.identifier == self.tool.identifier() {
            self.tool.create_editable_shape(annotation)
        } else {
            (entry.create)(&self.config, &self.env).create_editable_shape(annotation)
        }
    }

    /// Annotations completed so far, in completion order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Number of sessions that ended without a shape.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    fn collect_events(&mut self) {
        for event in self.tool.take_events() {
            match event {
                ToolEvent::Complete(shape) => {
                    let Some(target) = shape.annotation else {
                        continue;
                    };
                    let id = format!("#{}", self.next_id);
                    self.next_id += 1;
                    info!("Created annotation {id} with {} vertices", shape.points.len());
                    self.annotations.push(Annotation::new(Some(id), target));
                }
                ToolEvent::Cancel => {
                    self.cancelled += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ImageInfo;

    fn layer() -> AnnotationLayer {
        AnnotationLayer::new(
            Config::default(),
            Env::new(ImageInfo::new(Some("img.png".to_string()), 100.0, 100.0)),
        )
    }

    fn draw_triangle(layer: &mut AnnotationLayer) {
        layer.press(0.0, 0.0);
        for (x, y) in [(10.0, 0.0), (10.0, 10.0)] {
            layer.pointer_move(x, y);
            layer.pointer_up();
        }
        layer.double_click();
    }

    #[test]
    fn completed_polygons_become_annotations() {
        let mut layer = layer();
        draw_triangle(&mut layer);
        draw_triangle(&mut layer);

        let annotations = layer.annotations();
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].id.as_deref(), Some("#1"));
        assert_eq!(annotations[1].id.as_deref(), Some("#2"));
        assert_eq!(
            annotations[0].target.selector.value,
            "<svg><polygon points=\"0,0 10,0 10,10\" /></svg>"
        );
        assert!(!layer.is_drawing());
    }

    #[test]
    fn tiny_click_counts_as_cancel() {
        let mut layer = layer();
        layer.press(5.0, 5.0);
        layer.pointer_up();
        assert_eq!(layer.cancelled(), 1);
        assert!(layer.annotations().is_empty());
        assert!(!layer.is_drawing());
    }

    #[test]
    fn single_click_config_keeps_session_open() {
        let mut config = Config::default();
        config.tool.draw_on_single_click = true;
        let mut layer = AnnotationLayer::new(
            config,
            Env::new(ImageInfo::new(None, 100.0, 100.0)),
        );
        layer.press(5.0, 5.0);
        layer.pointer_up();
        assert!(layer.is_drawing());
        assert_eq!(layer.cancelled(), 0);
    }

    #[test]
    fn escape_abandons_drawing() {
        let mut layer = layer();
        layer.press(5.0, 5.0);
        layer.pointer_move(40.0, 40.0);
        layer.pointer_up();

        layer.on_key(Key::Return);
        assert!(layer.is_drawing());

        layer.on_key(Key::Escape);
        assert!(!layer.is_drawing());
        assert_eq!(layer.cancelled(), 1);

        layer.on_key(Key::Escape);
        assert_eq!(layer.cancelled(), 1);
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let mut layer = layer();
        assert_eq!(
            layer.set_tool("ellipse"),
            Err(AnnotationError::UnknownTool("ellipse".to_string()))
        );
        assert!(layer.set_tool("polygon").is_ok());
        assert_eq!(layer.tool().identifier(), "polygon");
    }

    #[test]
    fn empty_registry_has_no_tool() {
        let result = AnnotationLayer::with_registry(
            Config::default(),
            Env::new(ImageInfo::new(None, 10.0, 10.0)),
            ToolRegistry::empty(),
        );
        assert_eq!(result.err(), Some(AnnotationError::EmptyRegistry));
    }

    #[test]
    fn saved_annotation_reopens_for_editing() {
        let mut layer = layer();
        draw_triangle(&mut layer);
        let saved = layer.annotations()[0].clone();

        let mut shape = layer.edit(&saved).unwrap();
        shape.move_vertex(1, 20.0, 0.0).unwrap();
        let edited = shape.to_annotation();
        assert_eq!(edited.id, saved.id);
        assert_eq!(
            edited.target.selector.value,
            "<svg><polygon points=\"0,0 20,0 10,10\" /></svg>"
        );
    }

    #[test]
    fn unsupported_annotation_is_rejected() {
        let mut layer = layer();
        draw_triangle(&mut layer);
        let mut foreign = layer.annotations()[0].clone();
        foreign.target.selector.value = "<svg><circle r=\"4\" /></svg>".to_string();
        assert_eq!(
            layer.edit(&foreign).unwrap_err(),
            AnnotationError::Unsupported
        );
    }
}
