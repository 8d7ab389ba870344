use crate::math::intersect_2d::{ray_segment_intersect, RayHit};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::Ray;

/// An immutable, directed line segment from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2,
    pub end: Point2,
}

impl Segment {
    /// Creates a segment between two points.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// Returns `end - start`.
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        self.end - self.start
    }

    /// Returns the segment length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    /// Returns true if both endpoints coincide (within [`TOLERANCE`]).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.length() < TOLERANCE
    }

    /// Returns the midpoint of the segment.
    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        nalgebra::center(&self.start, &self.end)
    }

    /// Evaluates `start + s * (end - start)`.
    #[must_use]
    pub fn point_at(&self, s: f64) -> Point2 {
        self.start + self.direction() * s
    }

    /// Returns true if the segment parameter `s` lies on the finite segment,
    /// allowing a relative slack of `tolerance` at both ends.
    #[must_use]
    pub fn contains_param(s: f64, tolerance: f64) -> bool {
        (-tolerance..=1.0 + tolerance).contains(&s)
    }

    /// Intersects a ray with this segment. See [`ray_segment_intersect`].
    #[must_use]
    pub fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
        ray_segment_intersect(&ray.origin, &ray.direction, &self.start, &self.end)
    }
}
