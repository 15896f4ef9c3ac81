use crate::input::events::PointerEvent;
use log::debug;

use super::{DrawingState, PolygonTool};

impl PolygonTool {
    /// Routes a host event to its handler if the matching listener is attached.
    ///
    /// Events arriving after [`stop`](Self::stop) never reach a handler.
    pub fn handle_event(&mut self, event: PointerEvent) {
        if !self.listeners().accepts(&event) {
            return;
        }

        match event {
            PointerEvent::Move { x, y } => self.on_pointer_move(x, y),
            PointerEvent::Up => self.on_pointer_up(),
            PointerEvent::DoubleClick => self.on_double_click(),
        }
    }

    /// Drags the floating vertex to the pointer, clamped to the image.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        let point = self.env.image.clamp(x, y);
        if let Some(rubberband) = self.rubberband.as_mut() {
            rubberband.drag_to(point);
        }
    }

    /// Commits the floating vertex, or gives up on a gesture that is too small.
    ///
    /// # Behavior
    /// - On-screen width OR height at least the configured minimum: the vertex is committed
    /// - Smaller, without single-click start: emits `Cancel` and stops
    /// - Smaller, with single-click start: nothing happens
    pub fn on_pointer_up(&mut self) {
        let DrawingState::Drawing {
            start_on_single_click,
        } = self.state
        else {
            return;
        };
        let Some(rubberband) = self.rubberband.as_mut() else {
            return;
        };

        let rect = rubberband.screen_rect();
        let min_width = self.config.tool.min_width();
        let min_height = self.config.tool.min_height();

        if rect.width >= min_width || rect.height >= min_height {
            rubberband.add_point();
        } else if !start_on_single_click {
            self.cancel();
        } else {
            // Below the threshold with single-click start: the session stays open
            // with no vertex committed.
            debug!(
                "Pointer-up below minimum size ({}x{}), waiting for a drag",
                rect.width, rect.height
            );
        }
    }

    /// Closes the polygon once it has more than two vertices.
    pub fn on_double_click(&mut self) {
        let Some(rubberband) = self.rubberband.as_mut() else {
            return;
        };
        if rubberband.points().len() <= 2 {
            return;
        }

        if let Some(closed) = rubberband.close() {
            self.complete(closed);
        }
        self.stop();
    }
}
