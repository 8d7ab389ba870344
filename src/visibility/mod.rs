//! Visibility polygons: what the player can see directly, and through each planned reflection.

mod angular;
mod cascade;
mod cone;
mod obstacles;
mod polygon;
mod projection;
mod source_point;

pub use angular::{AngularOrder, SweepEntry};
pub use cascade::{VisibilityCascade, MAX_CASCADE_WINDOWS};
pub use cone::{Cone, ConeBoundary};
pub use polygon::VisibilityPolygon;
pub use projection::ConeProjection;
pub use source_point::{
    ArcJunctionPoint, Endpoint, EndpointSide, HitPoint, JunctionPoint, Occluder, OriginPoint,
    SourceKey, SourcePoint,
};

use crate::error::Result;
use crate::geometry::SceneBounds;
use crate::math::Point2;
use crate::scene::{Scene, SurfaceId};

/// Computes a visibility polygon as plain coordinates.
///
/// Without a window this is the full view from `origin`. With a window the view is restricted
/// to what lies beyond that surface, seen through it.
///
/// # Errors
///
/// Returns `SceneError::SurfaceNotFound` if `window` is not in the scene.
pub fn visibility_polygon(
    origin: Point2,
    scene: &Scene,
    bounds: SceneBounds,
    window: Option<SurfaceId>,
) -> Result<Vec<Point2>> {
    let cone = match window {
        Some(id) => {
            let segment = *scene.surface(id)?.segment();
            let start = SourcePoint::Endpoint(Endpoint {
                occluder: Occluder::Surface(id),
                side: EndpointSide::Start,
                position: segment.start,
            });
            let end = SourcePoint::Endpoint(Endpoint {
                occluder: Occluder::Surface(id),
                side: EndpointSide::End,
                position: segment.end,
            });
            Cone::through(origin, start, end, Some(id))
        }
        None => Cone::full(origin),
    };
    Ok(ConeProjection::new(scene, bounds).project(&cone).positions())
}
