//! Input handling and the polygon tool state machine.
//!
//! This module translates host pointer and keyboard events into drawing actions.
//! It defines the tool capability interface shared by every shape tool, the
//! registry the host uses to pick tools, and the polygon tool itself.

pub mod events;
pub mod state;
pub mod tool;

// Re-export commonly used types at module level
pub use events::{Key, Listeners, PointerEvent};
pub use state::{DrawingState, PolygonTool};
pub use tool::{DrawingTool, ToolEntry, ToolEvent, ToolKind, ToolRegistry};
