//! Geometry helpers shared by the draft polygon, the editable polygon and the tool.
//!
//! This module provides:
//! - [`Point`] in image space
//! - [`ImageInfo`] / [`Env`] describing the annotated image and the input device
//! - Coordinate clamping against the image's natural bounds
//! - Bounding-rectangle computation for point sets

use serde::{Deserialize, Serialize};

// ============================================================================
// Points and Environment
// ============================================================================

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// The image being annotated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Image reference recorded as the annotation target's `source`
    pub src: Option<String>,
    /// Intrinsic width in image pixels
    pub natural_width: f64,
    /// Intrinsic height in image pixels
    pub natural_height: f64,
}

impl ImageInfo {
    pub fn new(src: Option<String>, natural_width: f64, natural_height: f64) -> Self {
        Self {
            src,
            natural_width,
            natural_height,
        }
    }

    /// Clamps a raw pointer position into `[0, natural_width] x [0, natural_height]`.
    pub fn clamp(&self, x: f64, y: f64) -> Point {
        Point {
            x: clamp(x, 0.0, self.natural_width),
            y: clamp(y, 0.0, self.natural_height),
        }
    }
}

/// Environment shared by all tools on a canvas.
///
/// `is_touch` is injected by the host rather than detected globally, so the same
/// tool can be exercised under touch and mouse input.
#[derive(Debug, Clone, PartialEq)]
pub struct Env {
    pub image: ImageInfo,
    pub is_touch: bool,
}

impl Env {
    pub fn new(image: ImageInfo) -> Self {
        Self {
            image,
            is_touch: false,
        }
    }

    pub fn with_touch(mut self, is_touch: bool) -> Self {
        self.is_touch = is_touch;
        self
    }
}

// ============================================================================
// Geometry Utilities
// ============================================================================

/// Clamps a value to `[min, max]`, applying the lower bound first.
///
/// NaN inputs collapse to `min` so a bogus pointer event can never escape the image.
pub fn clamp(val: f64, min: f64, max: f64) -> f64 {
    if val.is_nan() {
        return min;
    }
    val.max(min).min(max)
}

/// Width and height of an axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingRect {
    /// Computes the bounding rectangle of a point set. Empty input yields a zero rect.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }

        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }
}
