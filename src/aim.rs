//! One-call aiming pipeline: bypass, plan, trace, compare and light up the cursor.

use crate::error::Result;
use crate::geometry::SceneBounds;
use crate::math::Point2;
use crate::reflection_cache::ReflectionCache;
use crate::scene::{Scene, SurfaceId};
use crate::trajectory::{
    detect_divergence, AlignmentResult, BypassEvaluator, BypassResult, PhysicalPathTracer,
    PlannedPathCalculator, TraceConfig, TrajectoryResult,
};
use crate::visibility::{ConeProjection, VisibilityCascade, VisibilityPolygon};

/// Aiming over a scene inside fixed bounds.
#[derive(Debug, Clone, Copy)]
pub struct Aim<'a> {
    scene: &'a Scene,
    bounds: SceneBounds,
    config: TraceConfig,
}

impl<'a> Aim<'a> {
    #[must_use]
    pub fn new(scene: &'a Scene, bounds: SceneBounds) -> Self {
        Self {
            scene,
            bounds,
            config: TraceConfig::default(),
        }
    }

    /// Sets the tracing limits. A range limit also clips the visibility polygons.
    #[must_use]
    pub fn with_config(mut self, config: TraceConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs the full pipeline for one frame.
    ///
    /// All stages draw mirror images from `cache`, so a cache warmed by an earlier frame gives
    /// the same result as a fresh one.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::SurfaceNotFound` if a planned surface is not in the scene.
    pub fn compute(
        &self,
        player: Point2,
        target: Point2,
        plan: &[SurfaceId],
        cache: &mut ReflectionCache,
    ) -> Result<AimResult> {
        let bypass = BypassEvaluator::new(self.scene).evaluate(player, target, plan, cache)?;
        let planned =
            PlannedPathCalculator::new(self.scene).calculate(player, target, &bypass.active_surfaces, cache)?;
        let actual = PhysicalPathTracer::new(self.scene)
            .with_config(self.config)
            .trace(player, target, &planned);
        let alignment = detect_divergence(&planned, &actual);

        let mut projection = ConeProjection::new(self.scene, self.bounds);
        if let Some(limit) = self.config.range_limit {
            projection = projection.with_range_limit(limit);
        }
        let visibility = VisibilityCascade::new(projection).compute(player, &bypass.active_surfaces, cache)?;

        Ok(AimResult {
            target,
            bypass,
            planned,
            actual,
            alignment,
            visibility,
        })
    }
}

/// Everything computed for one aim.
#[derive(Debug, Clone)]
pub struct AimResult {
    target: Point2,
    bypass: BypassResult,
    planned: TrajectoryResult,
    actual: TrajectoryResult,
    alignment: AlignmentResult,
    visibility: Vec<VisibilityPolygon>,
}

impl AimResult {
    #[must_use]
    pub fn planned_path(&self) -> &TrajectoryResult {
        &self.planned
    }

    #[must_use]
    pub fn actual_path(&self) -> &TrajectoryResult {
        &self.actual
    }

    #[must_use]
    pub fn alignment(&self) -> &AlignmentResult {
        &self.alignment
    }

    #[must_use]
    pub fn bypass(&self) -> &BypassResult {
        &self.bypass
    }

    /// Visibility polygons of every cascade stage.
    #[must_use]
    pub fn visibility(&self) -> &[VisibilityPolygon] {
        &self.visibility
    }

    /// Polygons of the last stage, seen through every active surface.
    pub fn final_stage(&self) -> impl Iterator<Item = &VisibilityPolygon> {
        let depth = self.bypass.active_surfaces.len();
        self.visibility.iter().filter(move |p| p.depth == depth)
    }

    /// See [`is_cursor_lit`].
    #[must_use]
    pub fn is_cursor_lit(&self) -> bool {
        is_cursor_lit(&self.bypass, &self.planned, &self.visibility, &self.target)
    }
}

/// Whether the target is a valid shot: nothing in the plan was bypassed, every planned
/// reflection lands on its real segment, and the target is visible through all of them.
#[must_use]
pub fn is_cursor_lit(
    bypass: &BypassResult,
    planned: &TrajectoryResult,
    visibility: &[VisibilityPolygon],
    target: &Point2,
) -> bool {
    let depth = bypass.active_surfaces.len();
    !bypass.is_bypassed()
        && planned.hits.iter().all(|h| h.on_segment)
        && visibility
            .iter()
            .filter(|p| p.depth == depth)
            .any(|p| p.contains(target))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{RangeLimit, Segment};
    use crate::scene::SurfaceKind;
    use crate::trajectory::{BypassReason, Termination};

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

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn empty_plan_in_open_scene() {
        init_tracing();
        let scene = Scene::new();
        let mut cache = ReflectionCache::new();
        let result = Aim::new(&scene, SceneBounds::from_size(-10.0, -10.0, 200.0, 20.0))
            .compute(Point2::new(0.0, 0.0), Point2::new(100.0, 0.0), &[], &mut cache)
            .unwrap();

        assert_eq!(
            result.planned_path().waypoints,
            vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)]
        );
        assert!(result.alignment().is_fully_aligned);
        assert!(result.is_cursor_lit());
        assert_eq!(result.final_stage().count(), 1);
    }

    #[test]
    fn target_behind_wall_is_not_lit() {
        let mut scene = Scene::new();
        let wall = scene.add_surface(
            Segment::new(Point2::new(50.0, 10.0), Point2::new(50.0, 90.0)),
            SurfaceKind::Wall,
        );
        let mut cache = ReflectionCache::new();
        let result = Aim::new(&scene, bounds())
            .compute(Point2::new(20.0, 50.0), Point2::new(80.0, 50.0), &[], &mut cache)
            .unwrap();

        assert_eq!(result.actual_path().blocked_by(), Some(wall));
        assert!(!result.alignment().is_fully_aligned);
        assert!(!result.is_cursor_lit());
    }

    #[test]
    fn reflected_target_is_lit() {
        let (scene, mirror) = mirror_scene();
        let mut cache = ReflectionCache::new();
        let result = Aim::new(&scene, bounds())
            .compute(Point2::new(50.0, 50.0), Point2::new(40.0, 60.0), &[mirror], &mut cache)
            .unwrap();

        assert!(!result.bypass().is_bypassed());
        assert!(result.actual_path().reached_target());
        assert!(result.alignment().is_fully_aligned);
        assert_eq!(result.final_stage().count(), 1);
        assert!(result.is_cursor_lit());
    }

    #[test]
    fn bypassed_plan_is_not_lit() {
        let (scene, mirror) = mirror_scene();
        let mut cache = ReflectionCache::new();
        let result = Aim::new(&scene, bounds())
            .compute(Point2::new(50.0, 90.0), Point2::new(60.0, 95.0), &[mirror], &mut cache)
            .unwrap();

        assert_eq!(
            result.bypass().bypassed_surfaces[0].reason,
            BypassReason::PlayerOnWrongSide
        );
        assert!(result.bypass().active_surfaces.is_empty());
        // Directly visible, yet unlit because the plan was not honoured.
        assert!(result.visibility()[0].contains(&Point2::new(60.0, 95.0)));
        assert!(!result.is_cursor_lit());
    }

    #[test]
    fn cursor_lit_matches_its_definition() {
        let (mut scene, mirror) = mirror_scene();
        scene.add_surface(
            Segment::new(Point2::new(10.0, 30.0), Point2::new(25.0, 45.0)),
            SurfaceKind::Wall,
        );
        let player = Point2::new(50.0, 50.0);
        let aim = Aim::new(&scene, bounds());
        for (x, y) in [(40.0, 60.0), (10.0, 60.0), (90.0, 20.0), (40.0, 90.0), (5.0, 45.0)] {
            let target = Point2::new(x, y);
            let mut cache = ReflectionCache::new();
            let result = aim.compute(player, target, &[mirror], &mut cache).unwrap();
            let expected = !result.bypass().is_bypassed()
                && result.planned_path().hits.iter().all(|h| h.on_segment)
                && result.final_stage().any(|p| p.contains(&target));
            assert_eq!(result.is_cursor_lit(), expected, "target {target:?}");
        }
    }

    #[test]
    fn range_limited_target_in_reach_is_lit() {
        let scene = Scene::new();
        for (bounds, player) in [
            (SceneBounds::from_size(0.0, 0.0, 1000.0, 1000.0), Point2::new(500.0, 500.0)),
            (bounds(), Point2::new(10.0, 50.0)),
        ] {
            let aim = Aim::new(&scene, bounds).with_config(TraceConfig {
                range_limit: Some(RangeLimit::new(player, 30.0)),
                ..TraceConfig::default()
            });
            let near = player + crate::math::Vector2::new(10.0, 5.0);
            let mut cache = ReflectionCache::new();
            let result = aim.compute(player, near, &[], &mut cache).unwrap();
            assert!(result.actual_path().reached_target());
            assert!(result.visibility()[0].contains(&player));
            assert!(result.is_cursor_lit(), "player {player:?}");

            let far = player + crate::math::Vector2::new(35.0, 0.0);
            let result = aim.compute(player, far, &[], &mut cache).unwrap();
            assert_eq!(result.actual_path().termination, Termination::RangeLimited);
            assert!(!result.is_cursor_lit());
        }
    }

    #[test]
    fn warm_cache_gives_identical_results() {
        let (scene, mirror) = mirror_scene();
        let aim = Aim::new(&scene, bounds()).with_config(TraceConfig {
            range_limit: Some(RangeLimit::new(Point2::new(50.0, 50.0), 200.0)),
            ..TraceConfig::default()
        });
        let (player, target) = (Point2::new(50.0, 50.0), Point2::new(40.0, 60.0));

        let mut cold = ReflectionCache::new();
        let first = aim.compute(player, target, &[mirror], &mut cold).unwrap();

        let mut warm = ReflectionCache::new();
        VisibilityCascade::new(ConeProjection::new(&scene, bounds()))
            .compute(player, &[mirror], &mut warm)
            .unwrap();
        let second = aim.compute(player, target, &[mirror], &mut warm).unwrap();

        assert_eq!(first.planned_path(), second.planned_path());
        assert_eq!(first.actual_path(), second.actual_path());
        assert_eq!(first.alignment(), second.alignment());
        let positions = |r: &AimResult| r.visibility().iter().map(VisibilityPolygon::positions).collect::<Vec<_>>();
        assert_eq!(positions(&first), positions(&second));
    }
}
