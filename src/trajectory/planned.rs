use crate::error::Result;
use crate::geometry::Segment;
use crate::math::intersect_2d::line_line_intersect;
use crate::math::{Point2, POINT_EPSILON};
use crate::reflection_cache::ReflectionCache;
use crate::scene::{Scene, SurfaceId};

use super::{HitInfo, Termination, TrajectoryResult};

/// Planned hits that miss the finite segment are still kept as waypoints.
///
/// The plan then shows where the shot would go if the surface extended along its line. When
/// false, such hits are reported in `hits` but left out of the waypoints.
pub const PLANNED_PATH_KEEPS_OFF_SEGMENT_HITS: bool = true;

/// Builds the ideal path through the active surfaces using mirror images of the target.
#[derive(Debug, Clone, Copy)]
pub struct PlannedPathCalculator<'a> {
    scene: &'a Scene,
}

impl<'a> PlannedPathCalculator<'a> {
    #[must_use]
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }

    /// Computes the planned path from `player` to `target` via `surfaces`, in order.
    ///
    /// Each leg aims at the target's image through the remaining surfaces and meets the next
    /// surface on its infinite line. A leg parallel to its surface line produces no hit.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::SurfaceNotFound` if a surface is not in the scene.
    pub fn calculate(
        &self,
        player: Point2,
        target: Point2,
        surfaces: &[SurfaceId],
        cache: &mut ReflectionCache,
    ) -> Result<TrajectoryResult> {
        let resolved = surfaces
            .iter()
            .map(|&id| self.scene.surface(id))
            .collect::<Result<Vec<_>>>()?;

        // images[k] is the target reflected through surfaces k.. in reverse order.
        let mut images = vec![cache.intern(target); resolved.len() + 1];
        for k in (0..resolved.len()).rev() {
            images[k] = cache.reflect(images[k + 1], resolved[k])?;
        }

        let mut waypoints = vec![player];
        let mut hits = Vec::with_capacity(resolved.len());
        let mut origin = player;
        for (k, surface) in resolved.iter().enumerate() {
            let image = cache.position(images[k])?;
            let segment = surface.segment();
            let aim = image - origin;
            let Some((t, s)) = line_line_intersect(&origin, &aim, &segment.start, &segment.direction())
            else {
                continue;
            };
            let point = origin + aim * t;
            let on_segment = Segment::contains_param(s, POINT_EPSILON / segment.length());
            hits.push(HitInfo {
                surface: surface.id(),
                point,
                on_segment,
            });
            if on_segment || PLANNED_PATH_KEEPS_OFF_SEGMENT_HITS {
                waypoints.push(point);
            }
            origin = point;
        }
        waypoints.push(target);

        Ok(TrajectoryResult {
            waypoints,
            hits,
            termination: Termination::ReachedTarget,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::scene::SurfaceKind;

    #[test]
    fn empty_plan_is_a_straight_line() {
        let scene = Scene::new();
        let mut cache = ReflectionCache::new();
        let planned = PlannedPathCalculator::new(&scene)
            .calculate(Point2::new(0.0, 0.0), Point2::new(100.0, 0.0), &[], &mut cache)
            .unwrap();
        assert_eq!(planned.waypoints, vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)]);
        assert!(planned.hits.is_empty());
        assert!(planned.reached_target());
    }

    #[test]
    fn single_mirror_hits_where_the_image_line_crosses() {
        let mut scene = Scene::new();
        let mirror = scene.add_surface(
            Segment::new(Point2::new(200.0, 150.0), Point2::new(0.0, 150.0)),
            SurfaceKind::Ricochet,
        );
        let mut cache = ReflectionCache::new();
        let planned = PlannedPathCalculator::new(&scene)
            .calculate(Point2::new(50.0, 100.0), Point2::new(150.0, 100.0), &[mirror], &mut cache)
            .unwrap();

        assert_eq!(planned.waypoints.len(), 3);
        assert_relative_eq!(planned.waypoints[1].x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(planned.waypoints[1].y, 150.0, epsilon = 1e-9);
        assert!(planned.hits[0].on_segment);
    }

    #[test]
    fn off_segment_hit_is_flagged_but_kept() {
        let mut scene = Scene::new();
        let mirror = scene.add_surface(
            Segment::new(Point2::new(20.0, 150.0), Point2::new(0.0, 150.0)),
            SurfaceKind::Ricochet,
        );
        let mut cache = ReflectionCache::new();
        let planned = PlannedPathCalculator::new(&scene)
            .calculate(Point2::new(50.0, 100.0), Point2::new(150.0, 100.0), &[mirror], &mut cache)
            .unwrap();

        assert!(!planned.hits[0].on_segment);
        assert_eq!(planned.waypoints.len(), 3);
        assert_relative_eq!(planned.waypoints[1].x, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn images_are_shared_through_the_cache() {
        let mut scene = Scene::new();
        let mirror = scene.add_surface(
            Segment::new(Point2::new(200.0, 150.0), Point2::new(0.0, 150.0)),
            SurfaceKind::Ricochet,
        );
        let mut cache = ReflectionCache::new();
        let target = Point2::new(150.0, 100.0);
        PlannedPathCalculator::new(&scene)
            .calculate(Point2::new(50.0, 100.0), target, &[mirror], &mut cache)
            .unwrap();
        let target_id = cache.intern(target);
        let image = cache.get(target_id, mirror).unwrap();
        assert_eq!(cache.get(image, mirror), Some(target_id));
    }
}
