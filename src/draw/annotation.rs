//! Annotation targets and SVG polygon selectors.

use crate::util::{ImageInfo, Point};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

/// Selector type tag for SVG fragment selectors.
pub const SVG_SELECTOR: &str = "SvgSelector";

static SVG_POLYGON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<svg.*<polygon").expect("valid polygon sniff pattern"));

static POINTS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"points\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid points pattern")
});

/// Errors raised when reading or editing persisted annotations.
#[derive(Debug, Error, PartialEq)]
pub enum AnnotationError {
    #[error("annotation has no {0} selector")]
    MissingSelector(&'static str),

    #[error("selector is not an SVG polygon")]
    NotAPolygon,

    #[error("malformed polygon points: {0}")]
    MalformedPoints(String),

    #[error("polygon needs at least 3 vertices, found {0}")]
    TooFewVertices(usize),

    #[error("vertex index {index} out of range (polygon has {len} vertices)")]
    VertexOutOfRange { index: usize, len: usize },

    #[error("no drawing tool registered as '{0}'")]
    UnknownTool(String),

    #[error("tool registry is empty")]
    EmptyRegistry,

    #[error("no drawing tool supports this annotation")]
    Unsupported,
}

/// A structured pointer into the image (here always an SVG fragment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selector {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// The region of an image an annotation refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationTarget {
    /// Image reference; omitted when the image has no `src`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub selector: Selector,
}

/// A persisted annotation as the host stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub target: AnnotationTarget,
}

impl Annotation {
    pub fn new(id: Option<String>, target: AnnotationTarget) -> Self {
        Self { id, target }
    }

    /// Returns the target selector if it is of the given type.
    pub fn selector(&self, kind: &str) -> Option<&Selector> {
        let selector = &self.target.selector;
        (selector.kind == kind).then_some(selector)
    }
}

/// Structural sniff for `<svg ...><polygon ...` selector values.
///
/// This is deliberately loose: it checks the prefix shape, not the full markup.
pub fn is_svg_polygon(value: &str) -> bool {
    SVG_POLYGON.is_match(value)
}

/// Builds the annotation target for a finished polygon.
///
/// Coordinates are written in their shortest form (`10`, not `10.0`).
pub fn to_svg_target(points: &[Point], image: &ImageInfo) -> AnnotationTarget {
    AnnotationTarget {
        source: image.src.clone(),
        selector: Selector {
            kind: SVG_SELECTOR.to_string(),
            value: format!(
                "<svg><polygon points=\"{}\" /></svg>",
                format_points(points)
            ),
        },
    }
}

/// Formats points as an SVG `points` attribute value: `x1,y1 x2,y2 ...`.
pub fn format_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", format_coord(p.x), format_coord(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_coord(v: f64) -> String {
    // Normalize -0 so clamped coordinates print as "0"
    if v == 0.0 {
        "0".to_string()
    } else {
        v.to_string()
    }
}

/// Extracts the vertices of an SVG polygon selector value.
///
/// Coordinates may be separated by commas, whitespace, or both.
pub fn parse_polygon_points(value: &str) -> Result<Vec<Point>, AnnotationError> {
    if !is_svg_polygon(value) {
        return Err(AnnotationError::NotAPolygon);
    }

    let caps = POINTS_ATTR
        .captures(value)
        .ok_or_else(|| AnnotationError::MalformedPoints("missing points attribute".to_string()))?;
    let raw = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .unwrap_or_default();

    let coords = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| AnnotationError::MalformedPoints(format!("bad coordinate '{token}'")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if coords.len() % 2 != 0 {
        return Err(AnnotationError::MalformedPoints(
            "odd number of coordinates".to_string(),
        ));
    }

    Ok(coords
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect())
}
