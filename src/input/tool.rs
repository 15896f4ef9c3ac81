//! Drawing tool capability interface and the registry of tool variants.

use super::events::PointerEvent;
use crate::config::Config;
use crate::draw::{Annotation, AnnotationError, EditableShape, PolygonShape};
use crate::util::Env;

/// Terminal signals a drawing session reports to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolEvent {
    /// A shape was finished; its `annotation` holds the selection target
    Complete(PolygonShape),
    /// The gesture was too small to become a shape
    Cancel,
}

/// Capabilities the host invokes on whichever tool is active.
pub trait DrawingTool: std::fmt::Debug {
    /// Routing token for this tool kind (e.g. `"polygon"`).
    fn identifier(&self) -> &'static str;

    fn is_drawing(&self) -> bool;

    /// Begins a drawing session at the given image coordinates.
    fn start_drawing(&mut self, x: f64, y: f64, start_on_single_click: bool);

    /// Ends the session, detaching listeners and dropping the draft.
    fn stop(&mut self);

    /// Delivers a pointer event; events without an attached listener are dropped.
    fn handle_event(&mut self, event: PointerEvent);

    fn on_scale_changed(&mut self, scale: f64);

    /// Opens a saved annotation of this tool's kind for editing.
    fn create_editable_shape(
        &self,
        annotation: &Annotation,
    ) -> Result<Box<dyn EditableShape>, AnnotationError>;

    /// Drains the signals emitted since the last call.
    fn take_events(&mut self) -> Vec<ToolEvent>;
}

/// Static side of a tool: identity, capability sniffing and construction.
pub trait ToolKind: DrawingTool + Sized + 'static {
    const IDENTIFIER: &'static str;

    /// Whether annotations of this shape can be opened by the tool.
    fn supports(annotation: &Annotation) -> bool;

    fn create(config: &Config, env: &Env) -> Self;
}

/// Registry entry for one tool variant.
#[derive(Debug, Clone, Copy)]
pub struct ToolEntry {
    pub identifier: &'static str,
    pub supports: fn(&Annotation) -> bool,
    pub create: fn(&Config, &Env) -> Box<dyn DrawingTool>,
}

impl ToolEntry {
    /// Builds the entry for a concrete tool type.
    pub fn of<T: ToolKind>() -> Self {
        Self {
            identifier: T::IDENTIFIER,
            supports: T::supports,
            create: create_boxed::<T>,
        }
    }
}

fn create_boxed<T: ToolKind>(config: &Config, env: &Env) -> Box<dyn DrawingTool> {
    Box::new(T::create(config, env))
}

/// Tool variants keyed by identifier, in registration order.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
}

impl Default for ToolRegistry {
    /// Registry holding the built-in polygon tool.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(ToolEntry::of::<super::state::PolygonTool>());
        registry
    }
}

impl ToolRegistry {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a tool, replacing any entry with the same identifier.
    pub fn register(&mut self, entry: ToolEntry) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.identifier == entry.identifier)
        {
            log::debug!("Replacing registered tool '{}'", entry.identifier);
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&ToolEntry> {
        self.entries.iter().find(|e| e.identifier == identifier)
    }

    /// First registered tool whose capability check accepts the annotation.
    pub fn for_annotation(&self, annotation: &Annotation) -> Option<&ToolEntry> {
        self.entries.iter().find(|e| (e.supports)(annotation))
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{AnnotationTarget, SVG_SELECTOR, Selector};

    fn svg_annotation(value: &str) -> Annotation {
        Annotation::new(
            None,
            AnnotationTarget {
                source: None,
                selector: Selector {
                    kind: SVG_SELECTOR.to_string(),
                    value: value.to_string(),
                },
            },
        )
    }

    #[test]
    fn default_registry_routes_polygons() {
        let registry = ToolRegistry::default();
        assert_eq!(registry.identifiers().collect::<Vec<_>>(), vec!["polygon"]);
        assert!(registry.get("polygon").is_some());
        assert!(registry.get("rect").is_none());

        let polygon = svg_annotation("<svg><polygon points=\"0,0 1,1 2,2\"/></svg>");
        assert_eq!(
            registry.for_annotation(&polygon).map(|e| e.identifier),
            Some("polygon")
        );
        assert!(
            registry
                .for_annotation(&svg_annotation("<svg><rect/></svg>"))
                .is_none()
        );
    }

    fn never(_: &Annotation) -> bool {
        false
    }

    #[test]
    fn register_replaces_same_identifier() {
        let mut registry = ToolRegistry::default();
        let mut entry = ToolEntry::of::<crate::input::PolygonTool>();
        entry.supports = never;
        registry.register(entry);

        assert_eq!(registry.identifiers().count(), 1);
        let polygon = svg_annotation("<svg><polygon points=\"0,0 1,1 2,2\"/></svg>");
        assert!(registry.for_annotation(&polygon).is_none());
    }
}
