//! Scripted input replay.
//!
//! Reads a JSON array of canvas events and feeds it through an
//! [`AnnotationLayer`], which is how the CLI exercises the polygon tool
//! without a real pointer device.
//!
//! # Example script
//! ```json
//! [
//!   {"type": "start", "x": 0, "y": 0},
//!   {"type": "move", "x": 10, "y": 0}, {"type": "up"},
//!   {"type": "move", "x": 10, "y": 10}, {"type": "up"},
//!   {"type": "double_click"}
//! ]
//! ```

use crate::draw::Annotation;
use crate::input::Key;
use crate::layer::AnnotationLayer;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One scripted canvas event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Primary button press. `single_click` overrides the configured default.
    Start {
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        single_click: Option<bool>,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up,
    #[serde(alias = "dblclick")]
    DoubleClick,
    /// Canvas zoom change
    Scale {
        value: f64,
    },
    Escape,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub annotations: Vec<Annotation>,
    pub cancelled: usize,
    /// Whether a drawing was still open when the script ended
    pub drawing: bool,
}

/// Parses a script from JSON text.
pub fn parse_script(source: &str) -> Result<Vec<ScriptEvent>> {
    serde_json::from_str(source).context("Invalid event script")
}

/// Reads and parses a script file.
pub fn load_script(path: &Path) -> Result<Vec<ScriptEvent>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read event script {}", path.display()))?;
    parse_script(&source).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Feeds every event to the layer in order.
pub fn replay(layer: &mut AnnotationLayer, events: &[ScriptEvent]) -> ReplayReport {
    for event in events {
        match *event {
            ScriptEvent::Start {
                x,
                y,
                single_click: None,
            } => layer.press(x, y),
            ScriptEvent::Start {
                x,
                y,
                single_click: Some(single_click),
            } => {
                if !layer.is_drawing() {
                    layer.start_drawing(x, y, single_click);
                }
            }
            ScriptEvent::Move { x, y } => layer.pointer_move(x, y),
            ScriptEvent::Up => layer.pointer_up(),
            ScriptEvent::DoubleClick => layer.double_click(),
            ScriptEvent::Scale { value } => layer.set_scale(value),
            ScriptEvent::Escape => layer.on_key(Key::Escape),
        }
    }

    ReplayReport {
        annotations: layer.annotations().to_vec(),
        cancelled: layer.cancelled(),
        drawing: layer.is_drawing(),
    }
}
