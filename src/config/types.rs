//! Configuration type definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Polygon tool settings.
///
/// Controls how pointer gestures are gated before they turn into vertices.
/// The minimum sizes are screen pixels: the rubberband extent is multiplied by
/// the canvas zoom before it is compared against them.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolConfig {
    /// Minimum rubberband width (screen pixels) for a pointer-up to commit a vertex.
    /// Either this or `min_selection_height` must be met.
    #[serde(default = "default_min_selection_width")]
    pub min_selection_width: f64,

    /// Minimum rubberband height (screen pixels) for a pointer-up to commit a vertex.
    #[serde(default = "default_min_selection_height")]
    pub min_selection_height: f64,

    /// Start drawing on a plain click instead of requiring a drag.
    /// A click below the minimum size then keeps the session open rather than cancelling it.
    #[serde(default)]
    pub draw_on_single_click: bool,
}

impl ToolConfig {
    /// Effective minimum width; zero, negative or non-finite values mean the default.
    pub fn min_width(&self) -> f64 {
        positive_or(self.min_selection_width, default_min_selection_width())
    }

    /// Effective minimum height; zero, negative or non-finite values mean the default.
    pub fn min_height(&self) -> f64 {
        positive_or(self.min_selection_height, default_min_selection_height())
    }
}

fn positive_or(value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        default
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            min_selection_width: default_min_selection_width(),
            min_selection_height: default_min_selection_height(),
            draw_on_single_click: false,
        }
    }
}

/// Vertex handle sizing.
///
/// Radii are expressed in screen pixels at zoom 1.0 and shrink as the canvas zooms in.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HandleConfig {
    /// Handle radius for mouse/pen input (valid range: 1.0 - 30.0)
    #[serde(default = "default_handle_radius")]
    pub radius: f64,

    /// Handle radius used on touch devices (valid range: 1.0 - 30.0)
    #[serde(default = "default_touch_handle_radius")]
    pub touch_radius: f64,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            radius: default_handle_radius(),
            touch_radius: default_touch_handle_radius(),
        }
    }
}

impl HandleConfig {
    /// Picks the base radius for the given input device class.
    pub fn base_radius(&self, is_touch: bool) -> f64 {
        if is_touch {
            self.touch_radius
        } else {
            self.radius
        }
    }
}

pub(crate) fn default_min_selection_width() -> f64 {
    4.0
}

pub(crate) fn default_min_selection_height() -> f64 {
    4.0
}

fn default_handle_radius() -> f64 {
    6.0
}

fn default_touch_handle_radius() -> f64 {
    12.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_minimums_resolve_to_default() {
        for value in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let config = ToolConfig {
                min_selection_width: value,
                min_selection_height: value,
                draw_on_single_click: false,
            };
            assert_eq!(config.min_width(), 4.0);
            assert_eq!(config.min_height(), 4.0);
        }

        let config = ToolConfig {
            min_selection_width: 10.0,
            min_selection_height: 0.5,
            draw_on_single_click: false,
        };
        assert_eq!(config.min_width(), 10.0);
        assert_eq!(config.min_height(), 0.5);
    }
}
