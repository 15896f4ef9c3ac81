//! Generic input event types delivered by the host canvas.

use serde::{Deserialize, Serialize};

/// Generic key representation.
///
/// Hosts map their native key codes to these values before dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Escape key (abandons the current drawing)
    Escape,
    /// Return/Enter key
    Return,
    /// Any other key
    Unknown,
}

/// Pointer events a drawing tool can subscribe to.
///
/// Coordinates are in image space, already transformed from screen space by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    /// Pointer moved (with or without a pressed button)
    Move { x: f64, y: f64 },
    /// Primary button released
    Up,
    /// Primary button double-clicked
    DoubleClick,
}

/// Named hooks a tool attaches for the duration of a drawing session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Listeners {
    pub mouse_move: bool,
    pub mouse_up: bool,
    pub dbl_click: bool,
}

impl Listeners {
    /// Hook set with every pointer listener attached.
    pub const ALL: Listeners = Listeners {
        mouse_move: true,
        mouse_up: true,
        dbl_click: true,
    };

    /// Attaches the given hooks.
    pub fn attach(&mut self, hooks: Listeners) {
        self.mouse_move |= hooks.mouse_move;
        self.mouse_up |= hooks.mouse_up;
        self.dbl_click |= hooks.dbl_click;
    }

    /// Detaches every hook. Returns whether anything was attached.
    pub fn detach_all(&mut self) -> bool {
        let was_attached = self.any();
        *self = Listeners::default();
        was_attached
    }

    pub fn any(&self) -> bool {
        self.mouse_move || self.mouse_up || self.dbl_click
    }

    /// Whether an event of this kind would reach a handler.
    pub fn accepts(&self, event: &PointerEvent) -> bool {
        match event {
            PointerEvent::Move { .. } => self.mouse_move,
            PointerEvent::Up => self.mouse_up,
            PointerEvent::DoubleClick => self.dbl_click,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_listeners_accept_nothing() {
        let mut listeners = Listeners::default();
        assert!(!listeners.accepts(&PointerEvent::Up));

        listeners.attach(Listeners::ALL);
        assert!(listeners.accepts(&PointerEvent::Move { x: 1.0, y: 2.0 }));
        assert!(listeners.accepts(&PointerEvent::DoubleClick));

        assert!(listeners.detach_all());
        assert!(!listeners.detach_all());
        assert!(!listeners.accepts(&PointerEvent::Up));
    }

    #[test]
    fn pointer_events_deserialize_from_tagged_json() {
        let event: PointerEvent = serde_json::from_str(r#"{"type":"move","x":3,"y":4.5}"#).unwrap();
        assert_eq!(event, PointerEvent::Move { x: 3.0, y: 4.5 });
        let event: PointerEvent = serde_json::from_str(r#"{"type":"double_click"}"#).unwrap();
        assert_eq!(event, PointerEvent::DoubleClick);
    }
}
