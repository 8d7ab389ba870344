//! Provenance-tagged vertices of visibility polygons.

use crate::geometry::{BoundarySide, Ray, RangeLimitHalf};
use crate::math::Point2;
use crate::scene::{ChainId, Junction, SurfaceId, SurfaceOrientations};

/// Anything a visibility ray can stop on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occluder {
    Surface(SurfaceId),
    Boundary(BoundarySide),
    RangeLimit(RangeLimitHalf),
}

/// Which end of an occluder's segment an [`Endpoint`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointSide {
    Start,
    End,
}

/// The viewpoint itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OriginPoint {
    pub position: Point2,
}

/// A free end of a surface, or a corner of the scene bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint {
    pub occluder: Occluder,
    pub side: EndpointSide,
    pub position: Point2,
}

/// Where a cast ray struck an occluder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitPoint {
    pub ray: Ray,
    pub occluder: Occluder,
    /// Ray parameter of the hit.
    pub t: f64,
    /// Parameter along the occluder's segment; zero for range-limit arcs.
    pub s: f64,
}

/// A shared vertex between two chained surfaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JunctionPoint {
    pub chain: ChainId,
    pub junction: Junction,
}

/// Where the two range-limit half-circles meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcJunctionPoint {
    pub position: Point2,
    pub halves: (RangeLimitHalf, RangeLimitHalf),
}

/// Stable identity of a [`SourcePoint`], used for deduplication and ordering pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKey {
    Origin(u64, u64),
    Endpoint(Occluder, EndpointSide),
    Hit(Occluder, u64, u64),
    Junction(ChainId, usize),
    ArcJunction(u64, u64),
}

/// A visibility-polygon vertex together with where it came from.
#[derive(Debug, Clone, Copy)]
pub enum SourcePoint {
    Origin(OriginPoint),
    Endpoint(Endpoint),
    Hit(HitPoint),
    Junction(JunctionPoint),
    ArcJunction(ArcJunctionPoint),
}

impl SourcePoint {
    /// Cartesian position of the point.
    #[must_use]
    pub fn compute_xy(&self) -> Point2 {
        match self {
            Self::Origin(p) => p.position,
            Self::Endpoint(p) => p.position,
            Self::Hit(p) => p.ray.point_at(p.t),
            Self::Junction(p) => p.junction.position,
            Self::ArcJunction(p) => p.position,
        }
    }

    /// Stable identity key.
    #[must_use]
    pub fn key(&self) -> SourceKey {
        match self {
            Self::Origin(p) => {
                let (x, y) = coordinate_bits(&p.position);
                SourceKey::Origin(x, y)
            }
            Self::Endpoint(p) => SourceKey::Endpoint(p.occluder, p.side),
            Self::Hit(p) => {
                let (x, y) = coordinate_bits(&self.compute_xy());
                SourceKey::Hit(p.occluder, x, y)
            }
            Self::Junction(p) => SourceKey::Junction(p.chain, p.junction.index),
            Self::ArcJunction(p) => {
                let (x, y) = coordinate_bits(&p.position);
                SourceKey::ArcJunction(x, y)
            }
        }
    }

    /// Whether a visibility ray reaching this point stops here.
    ///
    /// Origins and free endpoints never block, hits and arc junctions always do, and chain
    /// junctions decide from the surface orientations around the viewpoint.
    #[must_use]
    pub fn is_blocking(&self, orientations: &SurfaceOrientations) -> bool {
        match self {
            Self::Origin(_) | Self::Endpoint(_) => false,
            Self::Hit(_) | Self::ArcJunction(_) => true,
            Self::Junction(p) => p.junction.is_blocking(orientations),
        }
    }

    /// The occluder this point lies on, if it lies on exactly one.
    #[must_use]
    pub fn occluder(&self) -> Option<Occluder> {
        match self {
            Self::Endpoint(p) => Some(p.occluder),
            Self::Hit(p) => Some(p.occluder),
            Self::Origin(_) | Self::Junction(_) | Self::ArcJunction(_) => None,
        }
    }

    /// Whether this point lies on the given surface by provenance.
    #[must_use]
    pub fn is_on_surface(&self, surface: SurfaceId) -> bool {
        match self {
            Self::Endpoint(Endpoint { occluder, .. }) | Self::Hit(HitPoint { occluder, .. }) => {
                *occluder == Occluder::Surface(surface)
            }
            Self::Junction(p) => {
                p.junction.surface_before == surface || p.junction.surface_after == surface
            }
            Self::Origin(_) | Self::ArcJunction(_) => false,
        }
    }
}

impl PartialEq for SourcePoint {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for SourcePoint {}

fn coordinate_bits(p: &Point2) -> (u64, u64) {
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::Segment;
    use crate::math::Vector2;
    use crate::scene::{Scene, SurfaceKind};

    #[test]
    fn hit_position_is_computed_from_ray() {
        let hit = SourcePoint::Hit(HitPoint {
            ray: Ray::new(Point2::new(1.0, 1.0), Vector2::new(2.0, 0.0)),
            occluder: Occluder::Boundary(BoundarySide::Right),
            t: 1.5,
            s: 0.5,
        });
        let p = hit.compute_xy();
        assert_relative_eq!(p.x, 4.0);
        assert_relative_eq!(p.y, 1.0);
    }

    #[test]
    fn blocking_by_variant() {
        let orientations = SurfaceOrientations::empty(Point2::origin());
        let origin = SourcePoint::Origin(OriginPoint {
            position: Point2::origin(),
        });
        let corner = SourcePoint::Endpoint(Endpoint {
            occluder: Occluder::Boundary(BoundarySide::Top),
            side: EndpointSide::Start,
            position: Point2::new(5.0, 5.0),
        });
        let arc = SourcePoint::ArcJunction(ArcJunctionPoint {
            position: Point2::new(1.0, 0.0),
            halves: (RangeLimitHalf::Top, RangeLimitHalf::Bottom),
        });
        let hit = SourcePoint::Hit(HitPoint {
            ray: Ray::new(Point2::origin(), Vector2::new(1.0, 0.0)),
            occluder: Occluder::Boundary(BoundarySide::Right),
            t: 3.0,
            s: 0.1,
        });
        assert!(!origin.is_blocking(&orientations));
        assert!(!corner.is_blocking(&orientations));
        assert!(arc.is_blocking(&orientations));
        assert!(hit.is_blocking(&orientations));
        assert!(arc.occluder().is_none());
    }

    #[test]
    fn equality_follows_identity_key() {
        let a = SourcePoint::Hit(HitPoint {
            ray: Ray::new(Point2::origin(), Vector2::new(1.0, 0.0)),
            occluder: Occluder::Boundary(BoundarySide::Right),
            t: 3.0,
            s: 0.1,
        });
        // Same point reached by a different ray.
        let b = SourcePoint::Hit(HitPoint {
            ray: Ray::new(Point2::new(1.0, 0.0), Vector2::new(2.0, 0.0)),
            occluder: Occluder::Boundary(BoundarySide::Right),
            t: 1.0,
            s: 0.1,
        });
        let c = SourcePoint::Hit(HitPoint {
            ray: Ray::new(Point2::origin(), Vector2::new(1.0, 0.0)),
            occluder: Occluder::Boundary(BoundarySide::Top),
            t: 3.0,
            s: 0.1,
        });
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn junction_is_on_both_adjacent_surfaces() {
        let mut scene = Scene::new();
        let chain_id = scene.add_chain(
            &[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(1.0, 1.0)],
            false,
            SurfaceKind::Ricochet,
        );
        let chain = scene.chain(chain_id).unwrap();
        let junction = SourcePoint::Junction(JunctionPoint {
            chain: chain_id,
            junction: chain.junctions()[0],
        });
        assert!(junction.is_on_surface(chain.surfaces()[0]));
        assert!(junction.is_on_surface(chain.surfaces()[1]));

        let other = scene.add_surface(
            Segment::new(Point2::new(5.0, 5.0), Point2::new(6.0, 5.0)),
            SurfaceKind::Wall,
        );
        assert!(!junction.is_on_surface(other));
    }
}
