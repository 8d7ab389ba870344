use crate::math::vector_2d::cross;
use crate::math::{Point2, Vector2, POINT_EPSILON, TOLERANCE};
use crate::scene::SurfaceId;

use super::source_point::SourcePoint;

/// The two edges of a windowed cone, with the points that define them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeBoundary {
    /// Clockwise-most edge point; the sweep starts here.
    pub right: SourcePoint,
    /// Counter-clockwise-most edge point; the sweep ends here.
    pub left: SourcePoint,
    /// Surface the window lies on; it is not an obstacle for this cone.
    pub surface: Option<SurfaceId>,
}

/// Angular restriction of a visibility computation around `origin`.
///
/// A cone without a boundary sees all around. A windowed cone only sees through the segment
/// between its boundary points, and only what lies beyond that segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cone {
    pub origin: Point2,
    pub boundary: Option<ConeBoundary>,
}

impl Cone {
    /// Full 360° visibility around `origin`.
    #[must_use]
    pub fn full(origin: Point2) -> Self {
        Self {
            origin,
            boundary: None,
        }
    }

    /// Visibility from `origin` through the window between `a` and `b`, in either order.
    #[must_use]
    pub fn through(origin: Point2, a: SourcePoint, b: SourcePoint, surface: Option<SurfaceId>) -> Self {
        let c = cross(&(a.compute_xy() - origin), &(b.compute_xy() - origin));
        let (right, left) = if c >= 0.0 { (a, b) } else { (b, a) };
        Self {
            origin,
            boundary: Some(ConeBoundary {
                right,
                left,
                surface,
            }),
        }
    }

    /// Returns true for a windowed cone with no angular width.
    ///
    /// That covers a zero-length window and an origin on the window's line.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let Some(boundary) = &self.boundary else {
            return false;
        };
        let r = boundary.right.compute_xy() - self.origin;
        let l = boundary.left.compute_xy() - self.origin;
        let (rn, ln) = (r.norm(), l.norm());
        if rn < POINT_EPSILON || ln < POINT_EPSILON {
            return true;
        }
        if (boundary.left.compute_xy() - boundary.right.compute_xy()).norm() < POINT_EPSILON {
            return true;
        }
        cross(&r, &l) <= TOLERANCE * rn * ln
    }

    /// Returns true if `direction` points strictly inside the cone.
    #[must_use]
    pub fn contains_direction(&self, direction: &Vector2) -> bool {
        let Some(boundary) = &self.boundary else {
            return true;
        };
        let r = boundary.right.compute_xy() - self.origin;
        let l = boundary.left.compute_xy() - self.origin;
        let scale = direction.norm();
        cross(&r, direction) > TOLERANCE * r.norm() * scale
            && cross(direction, &l) > TOLERANCE * l.norm() * scale
    }
}
