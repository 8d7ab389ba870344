use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::Segment;
use crate::math::Point2;
use crate::reflection_cache::{PointId, ReflectionCache};
use crate::scene::SurfaceId;

use super::cone::Cone;
use super::polygon::VisibilityPolygon;
use super::projection::ConeProjection;

/// Upper bound on windowed cones spawned by one cascade.
pub const MAX_CASCADE_WINDOWS: usize = 64;

/// A cone waiting to be projected.
struct WorkItem {
    origin: PointId,
    depth: usize,
    cone: Cone,
}

/// Multi-stage visibility through a planned sequence of reflective surfaces.
///
/// Stage 0 is the player's full view. Every stretch of a stage-`k` polygon lying on planned
/// surface `k` becomes a window; the next stage looks through that window from the mirror
/// image of the stage-`k` viewpoint.
#[derive(Debug, Clone)]
pub struct VisibilityCascade<'a> {
    projection: ConeProjection<'a>,
}

impl<'a> VisibilityCascade<'a> {
    #[must_use]
    pub fn new(projection: ConeProjection<'a>) -> Self {
        Self { projection }
    }

    /// Computes all stage polygons, in breadth-first order.
    ///
    /// Windows the viewpoint sees from the non-reflective side are skipped. Images are taken
    /// from `cache`, so a viewpoint reflected back through the same surface keeps its identity.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::SurfaceNotFound` if a planned surface is not in the scene.
    pub fn compute(
        &self,
        player: Point2,
        surfaces: &[SurfaceId],
        cache: &mut ReflectionCache,
    ) -> Result<Vec<VisibilityPolygon>> {
        let scene = self.projection.scene();
        let mut queue = VecDeque::from([WorkItem {
            origin: cache.intern(player),
            depth: 0,
            cone: Cone::full(player),
        }]);
        let mut spawned = 0;
        let mut polygons = Vec::new();

        while let Some(item) = queue.pop_front() {
            let mut polygon = self.projection.project(&item.cone);
            polygon.depth = item.depth;

            if let Some(&surface_id) = surfaces.get(item.depth) {
                let surface = scene.surface(surface_id)?;
                for window in polygon.windows_on(surface_id) {
                    let (a, b) = (window.right.compute_xy(), window.left.compute_xy());
                    let middle = Segment::new(a, b).midpoint();
                    if !surface.can_reflect_from(&(middle - polygon.origin)) {
                        debug!(depth = item.depth, ?surface_id, "window seen from behind");
                        continue;
                    }
                    if spawned == MAX_CASCADE_WINDOWS {
                        warn!(limit = MAX_CASCADE_WINDOWS, "visibility cascade truncated");
                        break;
                    }
                    spawned += 1;

                    let image = cache.reflect(item.origin, surface)?;
                    let image_position = cache.position(image)?;
                    debug!(
                        depth = item.depth + 1,
                        from = ?(a.x, a.y),
                        to = ?(b.x, b.y),
                        "opening reflection window"
                    );
                    queue.push_back(WorkItem {
                        origin: image,
                        depth: item.depth + 1,
                        cone: Cone::through(image_position, window.right, window.left, Some(surface_id)),
                    });
                }
            }
            polygons.push(polygon);
        }
        Ok(polygons)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::SceneBounds;
    use crate::scene::{Scene, SurfaceKind};

    fn bounds() -> SceneBounds {
        SceneBounds::from_size(0.0, 0.0, 100.0, 100.0)
    }

    /// Horizontal mirror at y = 80 facing down.
    fn mirror_scene() -> (Scene, SurfaceId) {
        let mut scene = Scene::new();
        let mirror = scene.add_surface(
            Segment::new(Point2::new(70.0, 80.0), Point2::new(30.0, 80.0)),
            SurfaceKind::Ricochet,
        );
        (scene, mirror)
    }

    #[test]
    fn empty_plan_yields_the_direct_view_only() {
        let (scene, _) = mirror_scene();
        let cascade = VisibilityCascade::new(ConeProjection::new(&scene, bounds()));
        let mut cache = ReflectionCache::new();
        let polygons = cascade.compute(Point2::new(50.0, 50.0), &[], &mut cache).unwrap();
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].depth, 0);
        assert!(polygons[0].window_surface.is_none());
    }

    #[test]
    fn mirror_opens_a_reflected_stage() {
        let (scene, mirror) = mirror_scene();
        let cascade = VisibilityCascade::new(ConeProjection::new(&scene, bounds()));
        let mut cache = ReflectionCache::new();
        let polygons = cascade
            .compute(Point2::new(50.0, 50.0), &[mirror], &mut cache)
            .unwrap();
        assert_eq!(polygons.len(), 2);

        let reflected = &polygons[1];
        assert_eq!(reflected.depth, 1);
        assert_eq!(reflected.window_surface, Some(mirror));
        assert_relative_eq!(reflected.origin.x, 50.0, epsilon = 1e-9);
        assert_relative_eq!(reflected.origin.y, 110.0, epsilon = 1e-9);
        assert!(reflected.is_simple());
        assert!(reflected.contains(&Point2::new(50.0, 60.0)));
        assert!(!reflected.contains(&Point2::new(50.0, 90.0)));
    }

    #[test]
    fn mirror_seen_from_behind_opens_nothing() {
        let (scene, mirror) = mirror_scene();
        let cascade = VisibilityCascade::new(ConeProjection::new(&scene, bounds()));
        let mut cache = ReflectionCache::new();
        let polygons = cascade
            .compute(Point2::new(50.0, 90.0), &[mirror], &mut cache)
            .unwrap();
        assert_eq!(polygons.len(), 1);
    }

    #[test]
    fn images_come_from_the_shared_cache() {
        let (scene, mirror) = mirror_scene();
        let cascade = VisibilityCascade::new(ConeProjection::new(&scene, bounds()));
        let mut cache = ReflectionCache::new();
        let player = Point2::new(50.0, 50.0);
        cascade.compute(player, &[mirror], &mut cache).unwrap();
        let player_id = cache.intern(player);
        assert!(cache.has(player_id, mirror));

        let before = cache.stats();
        cascade.compute(player, &[mirror], &mut cache).unwrap();
        assert_eq!(cache.stats().misses, before.misses);
        assert_eq!(cache.stats().hits, before.hits + 1);
    }
}
