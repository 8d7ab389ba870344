use tracing::{debug, trace};

use crate::geometry::{RangeLimit, Ray};
use crate::math::vector_2d::{distance, normalize_or_zero};
use crate::math::{Point2, Vector2, POINT_EPSILON, TOLERANCE};
use crate::scene::{HitResponse, Scene, Surface, SurfaceId};

use super::{HitInfo, Termination, TrajectoryResult};

/// When a traced ray passing through the target counts as having reached it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorPolicy {
    /// Stop at the target only once the surfaces hit so far are exactly the planned ones.
    /// Before that the ray flies through the cursor.
    #[default]
    StopWhenAligned,
    /// Stop the first time the ray passes through the target.
    AlwaysStop,
}

/// Limits and policies for [`PhysicalPathTracer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceConfig {
    pub max_reflections: usize,
    /// Total travel distance after which the ray is considered escaped.
    pub max_distance: f64,
    pub range_limit: Option<RangeLimit>,
    pub cursor_policy: CursorPolicy,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_reflections: 16,
            max_distance: 10_000.0,
            range_limit: None,
            cursor_policy: CursorPolicy::default(),
        }
    }
}

/// Ray-marches the real shot against the finite surfaces of a scene.
///
/// Any surface can stop or bounce the ray, planned or not.
#[derive(Debug, Clone, Copy)]
pub struct PhysicalPathTracer<'a> {
    scene: &'a Scene,
    config: TraceConfig,
}

impl<'a> PhysicalPathTracer<'a> {
    #[must_use]
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            config: TraceConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: TraceConfig) -> Self {
        self.config = config;
        self
    }

    /// Traces a shot from `player` along the first leg of `planned`.
    #[must_use]
    pub fn trace(&self, player: Point2, target: Point2, planned: &TrajectoryResult) -> TrajectoryResult {
        let direction = planned
            .first_direction()
            .map_or_else(Vector2::zeros, |d| normalize_or_zero(&d));
        if direction == Vector2::zeros() {
            return TrajectoryResult {
                waypoints: vec![player, target],
                hits: Vec::new(),
                termination: Termination::ReachedTarget,
            };
        }

        let mut waypoints = vec![player];
        let mut hits: Vec<HitInfo> = Vec::new();
        let mut ray = Ray::new(player, direction);
        let mut travelled = 0.0;
        let mut last: Option<SurfaceId> = None;

        let termination = loop {
            let remaining = self.config.max_distance - travelled;
            let (mut stop_t, mut stop) = (remaining, Termination::Escaped);
            if let Some(limit) = &self.config.range_limit {
                if let Some(exit) = limit.clip_ray(&ray) {
                    if exit.t < stop_t {
                        stop_t = exit.t;
                        stop = Termination::RangeLimited;
                    }
                }
            }
            let contact = self.nearest_surface(&ray, last).filter(|(_, t)| *t < stop_t);
            let surface_t = contact.map_or(stop_t, |(_, t)| t);

            if let Some(t) = target_parameter(&ray, &target) {
                if t <= surface_t + POINT_EPSILON && self.may_stop_at_target(&hits, planned) {
                    waypoints.push(target);
                    break Termination::ReachedTarget;
                }
            }

            let Some((surface, t)) = contact else {
                waypoints.push(ray.point_at(stop_t));
                break stop;
            };
            let point = ray.point_at(t);
            travelled += t;
            waypoints.push(point);
            hits.push(HitInfo {
                surface: surface.id(),
                point,
                on_segment: true,
            });
            trace!(surface = ?surface.id(), point = ?(point.x, point.y), "ray hit");

            match surface.on_hit(&point, &ray.direction) {
                HitResponse::Reflect { direction } => {
                    if hits.len() > self.config.max_reflections {
                        break Termination::MaxReflections;
                    }
                    ray = Ray::new(point, normalize_or_zero(&direction));
                    last = Some(surface.id());
                }
                HitResponse::Stick => break Termination::Blocked(surface.id()),
            }
        };

        debug!(?termination, waypoints = waypoints.len(), "traced physical path");
        TrajectoryResult {
            waypoints,
            hits,
            termination,
        }
    }

    /// Nearest finite-segment hit ahead of the ray. The surface just left is ignored at `t ≈ 0`.
    fn nearest_surface(&self, ray: &Ray, last: Option<SurfaceId>) -> Option<(&'a Surface, f64)> {
        self.scene
            .surfaces()
            .filter(|s| !s.segment().is_degenerate())
            .filter_map(|s| {
                let hit = s.segment().intersect_ray(ray)?;
                let min_t = if Some(s.id()) == last { POINT_EPSILON } else { TOLERANCE };
                (hit.t > min_t).then_some((s, hit.t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    fn may_stop_at_target(&self, hits: &[HitInfo], planned: &TrajectoryResult) -> bool {
        match self.config.cursor_policy {
            CursorPolicy::AlwaysStop => true,
            CursorPolicy::StopWhenAligned => {
                hits.len() == planned.hits.len()
                    && hits.iter().zip(&planned.hits).all(|(actual, plan)| {
                        actual.surface == plan.surface && distance(&actual.point, &plan.point) <= POINT_EPSILON
                    })
            }
        }
    }
}

/// Ray parameter at which the ray passes through `target`, if it does.
fn target_parameter(ray: &Ray, target: &Point2) -> Option<f64> {
    let offset = target - ray.origin;
    let t = offset.dot(&ray.direction) / ray.direction.norm_squared();
    let miss = (offset - ray.direction * t).norm();
    (t > 0.0 && miss <= POINT_EPSILON).then_some(t)
}
