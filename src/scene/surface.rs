use crate::geometry::Segment;
use crate::math::vector_2d::{normalize_or_zero, perpendicular, reflect_direction, reflect_point_through_line};
use crate::math::{Point2, Vector2};

slotmap::new_key_type! {
    /// Unique identifier for a surface in the scene.
    pub struct SurfaceId;
}

/// Material of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// One-sided mirror: reflects rays arriving on its normal side, blocks the rest.
    Ricochet,
    /// Opaque: blocks every ray.
    Wall,
}

/// What happens to a projectile striking a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitResponse {
    /// Continue along the reflected direction.
    Reflect { direction: Vector2 },
    /// Stop at the hit point.
    Stick,
}

/// An oriented line-segment surface.
///
/// The reflective side is the left of `start → end`; [`Surface::normal`] points there.
#[derive(Debug, Clone)]
pub struct Surface {
    id: SurfaceId,
    segment: Segment,
    kind: SurfaceKind,
}

impl Surface {
    pub(crate) fn new(id: SurfaceId, segment: Segment, kind: SurfaceKind) -> Self {
        Self { id, segment, kind }
    }

    /// Returns the surface identifier.
    #[must_use]
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Returns the underlying segment.
    #[must_use]
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Returns the surface kind.
    #[must_use]
    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    /// Returns true for ricochet surfaces.
    #[must_use]
    pub fn is_reflective(&self) -> bool {
        self.kind == SurfaceKind::Ricochet
    }

    /// Unit normal pointing to the reflective side. Zero for a degenerate segment.
    #[must_use]
    pub fn normal(&self) -> Vector2 {
        normalize_or_zero(&perpendicular(&self.segment.direction()))
    }

    /// Whether a ray travelling along `direction` bounces off this surface.
    ///
    /// Every reflect-or-block decision in the crate goes through this method.
    #[must_use]
    pub fn can_reflect_from(&self, direction: &Vector2) -> bool {
        self.is_reflective() && direction.dot(&self.normal()) < 0.0
    }

    /// Resolves a projectile striking the surface at `point` with `velocity`.
    #[must_use]
    pub fn on_hit(&self, _point: &Point2, velocity: &Vector2) -> HitResponse {
        if self.can_reflect_from(velocity) {
            HitResponse::Reflect {
                direction: reflect_direction(velocity, &self.normal()),
            }
        } else {
            HitResponse::Stick
        }
    }

    /// Mirrors a point through the surface's infinite line.
    #[must_use]
    pub fn mirror_point(&self, point: &Point2) -> Point2 {
        reflect_point_through_line(point, &self.segment.start, &self.segment.end)
    }
}
