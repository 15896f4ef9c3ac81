//! Polygon drawing state machine.

use crate::config::Config;
use crate::draw::annotation::is_svg_polygon;
use crate::draw::{
    Annotation, AnnotationError, ClosedPolygon, EditablePolygon, EditableShape,
    RubberbandPolygon, SVG_SELECTOR,
};
use crate::input::events::{Listeners, PointerEvent};
use crate::input::tool::{DrawingTool, ToolEvent, ToolKind};
use crate::util::Env;
use log::{debug, warn};

/// Current drawing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawingState {
    /// No session - waiting for the host to start one
    Idle,
    /// A rubberband polygon is being built
    Drawing {
        /// Whether a below-threshold pointer-up keeps the session open instead of cancelling
        start_on_single_click: bool,
    },
}

/// Rubberband polygon tool.
///
/// Builds a polygon from pointer input: each sufficiently large drag commits a
/// vertex, a double-click closes the shape. While drawing, exactly one
/// [`RubberbandPolygon`] draft exists; while idle there is none.
#[derive(Debug)]
pub struct PolygonTool {
    pub(super) config: Config,
    pub(super) env: Env,
    pub(super) state: DrawingState,
    pub(super) rubberband: Option<RubberbandPolygon>,
    listeners: Listeners,
    events: Vec<ToolEvent>,
}

impl PolygonTool {
    pub const IDENTIFIER: &'static str = "polygon";

    pub fn new(config: Config, env: Env) -> Self {
        Self {
            config,
            env,
            state: DrawingState::Idle,
            rubberband: None,
            listeners: Listeners::default(),
            events: Vec::new(),
        }
    }

    /// True when the annotation's SVG selector looks like an `<svg>` wrapping a `<polygon>`.
    pub fn supports(annotation: &Annotation) -> bool {
        annotation
            .selector(SVG_SELECTOR)
            .is_some_and(|selector| is_svg_polygon(&selector.value))
    }

    pub fn state(&self) -> DrawingState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawingState::Drawing { .. })
    }

    /// The active draft, present only while drawing.
    pub fn rubberband(&self) -> Option<&RubberbandPolygon> {
        self.rubberband.as_ref()
    }

    /// Hooks currently attached to the host.
    pub fn listeners(&self) -> Listeners {
        self.listeners
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Starts a session with the first vertex at the clamped start point.
    ///
    /// Must only be called while idle. A second call without an intervening
    /// [`stop`](Self::stop) is a caller bug: it is logged and ignored.
    pub fn start_drawing(&mut self, x: f64, y: f64, start_on_single_click: bool) {
        if self.is_drawing() {
            warn!("start_drawing called while a polygon is already in progress; ignoring");
            return;
        }

        self.state = DrawingState::Drawing {
            start_on_single_click,
        };
        self.listeners.attach(Listeners::ALL);

        let anchor = self.env.image.clamp(x, y);
        debug!(
            "Polygon drawing started at ({}, {}), single-click start: {}",
            anchor.x, anchor.y, start_on_single_click
        );
        self.rubberband = Some(RubberbandPolygon::new(anchor, &self.config, &self.env));
    }

    /// Ends the session: detaches listeners, returns to idle and destroys the draft.
    ///
    /// Safe to call while idle.
    pub fn stop(&mut self) {
        let was_listening = self.listeners.detach_all();
        self.state = DrawingState::Idle;

        if let Some(mut rubberband) = self.rubberband.take() {
            rubberband.destroy();
        }

        if was_listening {
            debug!("Polygon drawing stopped");
        }
    }

    /// Handles the draft's close signal: attaches the selection, reports the
    /// shape and ends the session.
    pub(super) fn complete(&mut self, closed: ClosedPolygon) {
        let ClosedPolygon { mut shape, selection } = closed;
        debug!("Polygon completed with {} vertices", shape.points.len());
        shape.annotation = Some(selection);
        self.events.push(ToolEvent::Complete(shape));
        self.stop();
    }

    /// Reports a degenerate gesture and ends the session.
    pub(super) fn cancel(&mut self) {
        debug!("Polygon drawing cancelled");
        self.events.push(ToolEvent::Cancel);
        self.stop();
    }

    /// Forwards a zoom change to the draft, if one exists.
    pub fn on_scale_changed(&mut self, scale: f64) {
        if let Some(rubberband) = self.rubberband.as_mut() {
            rubberband.on_scale_changed(scale);
        }
    }

    /// Opens a saved polygon annotation for editing, independent of any drawing session.
    pub fn create_editable_shape(
        &self,
        annotation: &Annotation,
    ) -> Result<EditablePolygon, AnnotationError> {
        EditablePolygon::from_annotation(annotation, &self.config, &self.env)
    }

    /// Drains emitted `Complete`/`Cancel` signals.
    pub fn take_events(&mut self) -> Vec<ToolEvent> {
        std::mem::take(&mut self.events)
    }
}

impl DrawingTool for PolygonTool {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn is_drawing(&self) -> bool {
        PolygonTool::is_drawing(self)
    }

    fn start_drawing(&mut self, x: f64, y: f64, start_on_single_click: bool) {
        PolygonTool::start_drawing(self, x, y, start_on_single_click);
    }

    fn stop(&mut self) {
        PolygonTool::stop(self);
    }

    fn handle_event(&mut self, event: PointerEvent) {
        PolygonTool::handle_event(self, event);
    }

    fn on_scale_changed(&mut self, scale: f64) {
        PolygonTool::on_scale_changed(self, scale);
    }

    fn create_editable_shape(
        &self,
        annotation: &Annotation,
    ) -> Result<Box<dyn EditableShape>, AnnotationError> {
        let shape = PolygonTool::create_editable_shape(self, annotation)?;
        Ok(Box::new(shape))
    }

    fn take_events(&mut self) -> Vec<ToolEvent> {
        PolygonTool::take_events(self)
    }
}

impl ToolKind for PolygonTool {
    const IDENTIFIER: &'static str = PolygonTool::IDENTIFIER;

    fn supports(annotation: &Annotation) -> bool {
        PolygonTool::supports(annotation)
    }

    fn create(config: &Config, env: &Env) -> Self {
        PolygonTool::new(config.clone(), env.clone())
    }
}
