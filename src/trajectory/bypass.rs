use tracing::debug;

use crate::error::Result;
use crate::geometry::Ray;
use crate::math::intersect_2d::line_line_intersect;
use crate::math::{Point2, POINT_EPSILON, TOLERANCE};
use crate::reflection_cache::{PointId, ReflectionCache};
use crate::scene::{Scene, Surface, SurfaceId};

/// Why a planned surface was dropped from the active plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BypassReason {
    /// The surface does not reflect at all.
    NonReflective,
    /// The approach reaches the surface from its back, or never reaches its line.
    PlayerOnWrongSide,
    /// The (effective) target lies behind the surface.
    CursorOnWrongSide,
    /// Another surface stands between the running origin and the planned hit.
    ObstructedApproach,
}

/// A planned surface that was dropped, with its position in the original plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BypassedSurface {
    pub surface: SurfaceId,
    pub index: usize,
    pub reason: BypassReason,
}

/// The plan split into surfaces that will be used and surfaces that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BypassResult {
    pub active_surfaces: Vec<SurfaceId>,
    pub bypassed_surfaces: Vec<BypassedSurface>,
}

impl BypassResult {
    /// Returns true if any planned surface was dropped.
    #[must_use]
    pub fn is_bypassed(&self) -> bool {
        !self.bypassed_surfaces.is_empty()
    }
}

enum Verdict {
    Pass(Point2),
    Bypass(BypassReason),
}

/// Checks each planned surface against the running shot and drops the ones it cannot use.
///
/// Evaluation never aborts on a bad surface: the surface is recorded as bypassed and the
/// remaining plan is evaluated without it.
#[derive(Debug, Clone, Copy)]
pub struct BypassEvaluator<'a> {
    scene: &'a Scene,
}

impl<'a> BypassEvaluator<'a> {
    #[must_use]
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }

    /// Evaluates `plan` for a shot from `player` at `target`.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::SurfaceNotFound` if a planned surface is not in the scene.
    pub fn evaluate(
        &self,
        player: Point2,
        target: Point2,
        plan: &[SurfaceId],
        cache: &mut ReflectionCache,
    ) -> Result<BypassResult> {
        let target_id = cache.intern(target);
        let mut active: Vec<(usize, SurfaceId)> = plan.iter().copied().enumerate().collect();
        let mut bypassed = Vec::new();
        let mut origin = player;
        let mut previous: Option<SurfaceId> = None;

        let mut i = 0;
        while i < active.len() {
            let (index, id) = active[i];
            let surface = self.scene.surface(id)?;
            let later = active[i + 1..]
                .iter()
                .rev()
                .map(|&(_, later_id)| self.scene.surface(later_id))
                .collect::<Result<Vec<_>>>()?;
            let effective = cache.reflect_through(target_id, later)?;

            match self.check(origin, previous, surface, effective, cache)? {
                Verdict::Pass(hit) => {
                    origin = hit;
                    previous = Some(id);
                    i += 1;
                }
                Verdict::Bypass(reason) => {
                    debug!(?id, index, ?reason, "bypassing planned surface");
                    bypassed.push(BypassedSurface {
                        surface: id,
                        index,
                        reason,
                    });
                    active.remove(i);
                }
            }
        }

        Ok(BypassResult {
            active_surfaces: active.into_iter().map(|(_, id)| id).collect(),
            bypassed_surfaces: bypassed,
        })
    }

    fn check(
        &self,
        origin: Point2,
        previous: Option<SurfaceId>,
        surface: &Surface,
        effective_target: PointId,
        cache: &mut ReflectionCache,
    ) -> Result<Verdict> {
        if !surface.is_reflective() {
            return Ok(Verdict::Bypass(BypassReason::NonReflective));
        }
        let effective = cache.position(effective_target)?;
        let image_id = cache.reflect(effective_target, surface)?;
        let image = cache.position(image_id)?;

        let segment = surface.segment();
        let aim = image - origin;
        let Some((t, _)) = line_line_intersect(&origin, &aim, &segment.start, &segment.direction()) else {
            return Ok(Verdict::Bypass(BypassReason::PlayerOnWrongSide));
        };
        if t <= TOLERANCE {
            return Ok(Verdict::Bypass(BypassReason::PlayerOnWrongSide));
        }
        let hit = origin + aim * t;
        if !surface.can_reflect_from(&(hit - origin)) {
            return Ok(Verdict::Bypass(BypassReason::PlayerOnWrongSide));
        }
        if !surface.can_reflect_from(&(hit - effective)) {
            return Ok(Verdict::Bypass(BypassReason::CursorOnWrongSide));
        }
        if self.is_obstructed(origin, hit, surface.id(), previous) {
            return Ok(Verdict::Bypass(BypassReason::ObstructedApproach));
        }
        Ok(Verdict::Pass(hit))
    }

    /// Whether an unrelated surface crosses `origin → hit` strictly between its ends.
    fn is_obstructed(&self, origin: Point2, hit: Point2, surface: SurfaceId, previous: Option<SurfaceId>) -> bool {
        let leg = Ray::through(origin, hit);
        let length = leg.direction.norm();
        if length < POINT_EPSILON {
            return false;
        }
        let eps_t = POINT_EPSILON / length;
        self.scene
            .surfaces()
            .filter(|s| s.id() != surface && Some(s.id()) != previous)
            .filter_map(|s| s.segment().intersect_ray(&leg))
            .any(|h| h.t > eps_t && h.t < 1.0 - eps_t)
    }
}
