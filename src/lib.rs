//! Rubberband polygon drawing for image annotation canvases.
//!
//! Exposes the polygon tool state machine alongside the geometry, annotation
//! and configuration types it relies on, so hosts can embed the tool and drive
//! it from their own event loop.

pub mod config;
pub mod draw;
pub mod input;
pub mod layer;
pub mod replay;
pub mod util;

pub use config::Config;
pub use input::PolygonTool;
pub use layer::AnnotationLayer;
