//! Axis-aligned bounding rectangles.
use serde::{Deserialize, Serialize};

/// Closed axis-aligned rectangle `[min_x, max_x] x [min_y, max_y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Envelope {
    /// Build an envelope from two corners; the corners may be given in any
    /// order.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { min_x: x0.min(x1), min_y: y0.min(y1), max_x: x0.max(x1), max_y: y0.max(y1) }
    }

    pub fn from_point(x: f64, y: f64) -> Self {
        Self { min_x: x, min_y: y, max_x: x, max_y: y }
    }

    /// Square envelope of half-side `radius` around `(x, y)`.
    pub fn around(x: f64, y: f64, radius: f64) -> Self {
        Self { min_x: x - radius, min_y: y - radius, max_x: x + radius, max_y: y + radius }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn min_dimension(&self) -> f64 {
        self.width().min(self.height())
    }

    pub fn max_dimension(&self) -> f64 {
        self.width().max(self.height())
    }

    pub fn center(&self) -> (f64, f64) {
        (0.5 * (self.min_x + self.max_x), 0.5 * (self.min_y + self.max_y))
    }

    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }

    pub fn expand_to_include(&mut self, other: &Envelope) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn union(mut self, other: &Envelope) -> Self {
        self.expand_to_include(other);
        self
    }

    /// Closed-interval overlap test; touching edges intersect.
    #[inline]
    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    #[inline]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}
