use crate::geometry::{RangeLimit, Ray, SceneBounds, Segment};
use crate::math::polygon_2d::point_on_segment;
use crate::math::vector_2d::{cross, normalize_or_zero};
use crate::math::{Point2, Vector2, POINT_EPSILON};
use crate::scene::{Scene, SurfaceId};

use super::source_point::Occluder;

/// A segment that stops visibility rays.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Obstacle {
    pub occluder: Occluder,
    pub segment: Segment,
}

/// Where a cast ray first stops.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Contact {
    pub occluder: Occluder,
    pub t: f64,
    pub s: f64,
}

/// How the occluders meeting at a vertex sit around the ray that reached it.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CornerArms {
    /// Some arm leaves the vertex counter-clockwise of the ray.
    pub ccw: bool,
    /// Some arm leaves the vertex clockwise of the ray.
    pub cw: bool,
    /// An occluder passes through the vertex in its interior.
    pub through: bool,
}

impl CornerArms {
    /// A corner closed on both sides, or pierced, lets nothing past.
    pub fn is_closed(self) -> bool {
        self.through || (self.ccw && self.cw)
    }
}

/// Every segment occluder of a projection plus the optional range-limit circle.
#[derive(Debug)]
pub(crate) struct ObstacleSet {
    obstacles: Vec<Obstacle>,
    range_limit: Option<RangeLimit>,
}

impl ObstacleSet {
    /// Collects all scene surfaces except `exclude`, and the four bounds edges.
    pub fn build(
        scene: &Scene,
        bounds: &SceneBounds,
        range_limit: Option<RangeLimit>,
        exclude: Option<SurfaceId>,
    ) -> Self {
        let mut obstacles: Vec<Obstacle> = scene
            .surfaces()
            .filter(|s| Some(s.id()) != exclude && !s.segment().is_degenerate())
            .map(|s| Obstacle {
                occluder: Occluder::Surface(s.id()),
                segment: *s.segment(),
            })
            .collect();
        obstacles.extend(bounds.edges().into_iter().map(|(side, segment)| Obstacle {
            occluder: Occluder::Boundary(side),
            segment,
        }));
        Self {
            obstacles,
            range_limit,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn range_limit(&self) -> Option<&RangeLimit> {
        self.range_limit.as_ref()
    }

    /// Nearest contact with `t_min < t < t_max`, ignoring obstacles for which `skip` is true.
    ///
    /// The range limit is measured from `ray.point_at(t_min)`; a start outside the circle
    /// stops the ray right there.
    pub fn nearest_hit(
        &self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        skip: impl Fn(&Obstacle) -> bool,
    ) -> Option<Contact> {
        let mut best: Option<Contact> = None;
        for obstacle in &self.obstacles {
            if skip(obstacle) {
                continue;
            }
            let Some(hit) = obstacle.segment.intersect_ray(ray) else {
                continue;
            };
            if hit.t > t_min && hit.t < t_max && best.is_none_or(|b| hit.t < b.t) {
                best = Some(Contact {
                    occluder: obstacle.occluder,
                    t: hit.t,
                    s: hit.s,
                });
            }
        }

        if let Some(limit) = &self.range_limit {
            let start = ray.point_at(t_min.max(0.0));
            if let Some(exit) = limit.compute_range_limit_hit_point(&start, &ray.direction) {
                let t = t_min.max(0.0) + exit.t;
                if t < t_max && best.is_none_or(|b| t < b.t) {
                    best = Some(Contact {
                        occluder: Occluder::RangeLimit(exit.half),
                        t,
                        s: 0.0,
                    });
                }
            }
        }
        best
    }

    /// Classifies the occluders touching `vertex` relative to the ray direction reaching it.
    pub fn corner_arms(&self, vertex: &Point2, direction: &Vector2) -> CornerArms {
        let dir = normalize_or_zero(direction);
        let mut arms = CornerArms::default();
        for obstacle in &self.obstacles {
            let seg = &obstacle.segment;
            let other = if (seg.start - vertex).norm() <= POINT_EPSILON {
                seg.end
            } else if (seg.end - vertex).norm() <= POINT_EPSILON {
                seg.start
            } else if point_on_segment(vertex, &seg.start, &seg.end) {
                arms.through = true;
                continue;
            } else {
                continue;
            };
            let side = cross(&dir, &(other - vertex));
            if side > POINT_EPSILON {
                arms.ccw = true;
            } else if side < -POINT_EPSILON {
                arms.cw = true;
            }
        }
        arms
    }
}

/// Returns true if one of the obstacle's endpoints coincides with `vertex`.
pub(crate) fn touches(obstacle: &Obstacle, vertex: &Point2) -> bool {
    (obstacle.segment.start - vertex).norm() <= POINT_EPSILON
        || (obstacle.segment.end - vertex).norm() <= POINT_EPSILON
}
