// THEORY:
// A `Blob` is the spatial summary of the tracked object in a single frame. It
// is produced by the blob selector from the largest external contour of the
// mask and carries everything later stages need: the contour itself, its area,
// the minimum enclosing circle used for the drawn halo, and the moment-based
// centroid that is appended to the trail.
//
// Like the mask it came from, a `Blob` lives for one iteration only. It has no
// memory of previous frames; continuity is the trail buffer's job.

use crate::core_modules::enclosing_circle::Circle;

/// An integer pixel coordinate. `x` grows to the right, `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The single object selected in a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    /// Boundary points of the region in tracing order.
    pub contour: Vec<Point>,
    /// Area enclosed by the contour polygon, in square pixels.
    pub area: f64,
    /// Smallest circle containing every contour point.
    pub enclosing_circle: Circle,
    /// Center of mass from the contour's raw moments, rounded to a pixel.
    pub centroid: Point,
}

impl Blob {
    pub fn enclosing_radius(&self) -> f64 {
        self.enclosing_circle.radius
    }

    /// Whether the marker should be drawn. The centroid is tracked either way.
    pub fn is_drawable(&self, min_radius: f64) -> bool {
        self.enclosing_circle.radius > min_radius
    }
}
