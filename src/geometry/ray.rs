use crate::math::{Point2, Vector2};

/// A half-line `origin + t * direction`, `t >= 0`.
///
/// The direction is not normalized: visibility rays are cast with `direction = vertex - origin`
/// so that the vertex sits exactly at `t = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point2,
    pub direction: Vector2,
}

impl Ray {
    /// Creates a ray from an origin and direction.
    #[must_use]
    pub fn new(origin: Point2, direction: Vector2) -> Self {
        Self { origin, direction }
    }

    /// Creates the ray from `origin` through `through`.
    #[must_use]
    pub fn through(origin: Point2, through: Point2) -> Self {
        Self {
            origin,
            direction: through - origin,
        }
    }

    /// Evaluates the ray at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.origin + self.direction * t
    }
}
