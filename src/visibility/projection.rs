//! Radial-sweep visibility polygon construction.

use std::f64::consts::{PI, TAU};

use nalgebra::Rotation2;
use tracing::{debug, trace};

use crate::geometry::{RangeLimit, Ray, SceneBounds};
use crate::math::intersect_2d::{line_line_intersect, segment_circle_intersect};
use crate::math::vector_2d::cross;
use crate::math::{Point2, Vector2, POINT_EPSILON, TOLERANCE};
use crate::scene::{Scene, SurfaceOrientations};

use super::angular::{AngularOrder, SweepEntry};
use super::cone::Cone;
use super::obstacles::{touches, CornerArms, Obstacle, ObstacleSet};
use super::polygon::VisibilityPolygon;
use super::source_point::{
    ArcJunctionPoint, Endpoint, EndpointSide, HitPoint, JunctionPoint, Occluder, OriginPoint,
    SourcePoint,
};

/// Computes visibility polygons over a scene inside fixed bounds.
///
/// The sweep works in four steps:
///
/// 1. Collect candidate vertices (free surface ends, chain junctions, bounds corners, range-limit
///    arc junctions and rim crossings, and for windowed cones the points where obstacles cross
///    the window).
/// 2. Cast a ray through each candidate. Occluded candidates are dropped; visible non-blocking
///    ones also emit the continuation hit beyond them.
/// 3. Sort everything counter-clockwise, with each vertex/continuation pair pinned together.
/// 4. Walk the sorted points, merging coincident neighbours and folding zero-area spikes, then
///    trace the range-limit rim between consecutive rim points.
#[derive(Debug, Clone)]
pub struct ConeProjection<'a> {
    scene: &'a Scene,
    bounds: SceneBounds,
    range_limit: Option<RangeLimit>,
}

/// Largest angle, seen from the origin, spanned by one straight piece of a range-limit arc.
const ARC_STEP: f64 = PI / 32.0;

/// A candidate vertex and how it sits on the occluders around it.
struct Candidate {
    point: SourcePoint,
    placement: Placement,
}

#[derive(Clone, Copy)]
enum Placement {
    /// A scene, bounds or arc-junction vertex.
    Vertex,
    /// Where an obstacle crosses the window, with the direction it continues beyond it.
    Window(Occluder, Vector2),
    /// Where an obstacle crosses the range-limit rim.
    Rim(Occluder),
}

impl<'a> ConeProjection<'a> {
    /// Creates a projection over `scene`, clipped to `bounds`.
    #[must_use]
    pub fn new(scene: &'a Scene, bounds: SceneBounds) -> Self {
        Self {
            scene,
            bounds,
            range_limit: None,
        }
    }

    /// Additionally clips every ray to a range-limit circle.
    #[must_use]
    pub fn with_range_limit(mut self, range_limit: RangeLimit) -> Self {
        self.range_limit = Some(range_limit);
        self
    }

    /// The scene this projection reads from.
    #[must_use]
    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    /// Computes the visibility polygon of a cone.
    ///
    /// Degenerate input never fails; it yields a polygon holding only the origin. Degenerate
    /// input means empty bounds, a zero-width window, an origin on the window's line, or a
    /// full cone whose origin is outside the bounds or the range limit.
    #[must_use]
    pub fn project(&self, cone: &Cone) -> VisibilityPolygon {
        let origin = cone.origin;
        let window_surface = cone.boundary.and_then(|b| b.surface);
        let single_point = || VisibilityPolygon {
            origin,
            depth: 0,
            window_surface,
            points: vec![SourcePoint::Origin(OriginPoint { position: origin })],
        };

        if self.bounds.is_degenerate() || cone.is_degenerate() {
            return single_point();
        }
        if cone.boundary.is_none() {
            let outside_range = self
                .range_limit
                .is_some_and(|limit| !limit.is_inside_circle(&origin));
            if !self.bounds.contains(&origin) || outside_range {
                return single_point();
            }
        }

        let obstacles = ObstacleSet::build(self.scene, &self.bounds, self.range_limit, window_surface);
        let orientations = SurfaceOrientations::for_viewpoint(origin, self.scene);
        let reference = cone
            .boundary
            .map_or(Vector2::new(1.0, 0.0), |b| b.right.compute_xy() - origin);
        let mut order = AngularOrder::new(reference);
        let mut entries = Vec::new();

        for candidate in self.candidates(cone, &obstacles) {
            self.resolve(cone, &obstacles, &orientations, &mut order, &mut entries, &candidate);
        }
        order.sort(&mut entries);

        let mut walk: Vec<(SourcePoint, bool)> = Vec::with_capacity(entries.len() + 4);
        match &cone.boundary {
            Some(boundary) => {
                walk.push((boundary.right, true));
                if let Some(hit) = boundary_hit(origin, &boundary.right, &obstacles) {
                    walk.push((hit, false));
                }
                walk.extend(entries.iter().map(|e| (e.point, false)));
                if let Some(hit) = boundary_hit(origin, &boundary.left, &obstacles) {
                    walk.push((hit, false));
                }
                walk.push((boundary.left, true));
            }
            None => walk.extend(entries.iter().map(|e| (e.point, false))),
        }
        let points = fold_spikes(walk, cone.boundary.is_none());
        let points = self.trace_arcs(cone, &obstacles, points);

        debug!(
            origin = ?(origin.x, origin.y),
            windowed = cone.boundary.is_some(),
            pinned_pairs = order.pair_count(),
            vertices = points.len(),
            "projected visibility cone"
        );

        VisibilityPolygon {
            origin,
            depth: 0,
            window_surface,
            points,
        }
    }

    fn candidates(&self, cone: &Cone, obstacles: &ObstacleSet) -> Vec<Candidate> {
        let mut out = Vec::new();
        let mut push = |point: SourcePoint| {
            out.push(Candidate {
                point,
                placement: Placement::Vertex,
            });
        };

        for chain in self.scene.chains() {
            let surfaces = chain.surfaces();
            if !chain.is_closed() {
                if let (Some(&first), Some(&last)) = (surfaces.first(), surfaces.last()) {
                    if let Ok(surface) = self.scene.surface(first) {
                        push(SourcePoint::Endpoint(Endpoint {
                            occluder: Occluder::Surface(first),
                            side: EndpointSide::Start,
                            position: surface.segment().start,
                        }));
                    }
                    if let Ok(surface) = self.scene.surface(last) {
                        push(SourcePoint::Endpoint(Endpoint {
                            occluder: Occluder::Surface(last),
                            side: EndpointSide::End,
                            position: surface.segment().end,
                        }));
                    }
                }
            }
            for junction in chain.junctions() {
                push(SourcePoint::Junction(JunctionPoint {
                    chain: chain.id(),
                    junction: *junction,
                }));
            }
        }

        for (side, segment) in self.bounds.edges() {
            push(SourcePoint::Endpoint(Endpoint {
                occluder: Occluder::Boundary(side),
                side: EndpointSide::Start,
                position: segment.start,
            }));
        }

        if let Some(limit) = &self.range_limit {
            for (position, halves) in limit.arc_junctions() {
                push(SourcePoint::ArcJunction(ArcJunctionPoint { position, halves }));
            }
            for obstacle in obstacles.iter() {
                let seg = &obstacle.segment;
                for s in segment_circle_intersect(&seg.start, &seg.end, &limit.center, limit.radius) {
                    out.push(Candidate {
                        point: SourcePoint::Hit(HitPoint {
                            ray: Ray::through(cone.origin, seg.point_at(s)),
                            occluder: obstacle.occluder,
                            t: 1.0,
                            s,
                        }),
                        placement: Placement::Rim(obstacle.occluder),
                    });
                }
            }
        }

        if let Some(boundary) = &cone.boundary {
            let (a, b) = (boundary.right.compute_xy(), boundary.left.compute_xy());
            let window_dir = b - a;
            let origin_side = cross(&window_dir, &(cone.origin - a));
            for obstacle in obstacles.iter() {
                let seg = &obstacle.segment;
                let Some((u, s)) = line_line_intersect(&a, &window_dir, &seg.start, &seg.direction())
                else {
                    continue;
                };
                let slack = POINT_EPSILON / window_dir.norm();
                if u <= slack || u >= 1.0 - slack || !(0.0..=1.0).contains(&s) {
                    continue;
                }
                let crossing = a + window_dir * u;
                let beyond = [seg.start, seg.end]
                    .into_iter()
                    .find(|e| cross(&window_dir, &(e - a)) * origin_side < 0.0);
                let Some(far_end) = beyond else {
                    continue;
                };
                out.push(Candidate {
                    point: SourcePoint::Hit(HitPoint {
                        ray: Ray::through(cone.origin, crossing),
                        occluder: obstacle.occluder,
                        t: 1.0,
                        s,
                    }),
                    placement: Placement::Window(obstacle.occluder, far_end - crossing),
                });
            }
        }
        out
    }

    fn resolve(
        &self,
        cone: &Cone,
        obstacles: &ObstacleSet,
        orientations: &SurfaceOrientations,
        order: &mut AngularOrder,
        entries: &mut Vec<SweepEntry>,
        candidate: &Candidate,
    ) {
        let vertex = candidate.point;
        let position = vertex.compute_xy();
        let ray = Ray::through(cone.origin, position);
        let length = ray.direction.norm();
        if length < POINT_EPSILON || !cone.contains_direction(&ray.direction) {
            return;
        }
        let eps_t = POINT_EPSILON / length;

        let t_start = window_parameter(cone, &ray);
        let crossed = match candidate.placement {
            Placement::Window(occluder, _) | Placement::Rim(occluder) => Some(occluder),
            Placement::Vertex => None,
        };
        let on_window = matches!(candidate.placement, Placement::Window(..));
        if !on_window && t_start >= 1.0 - eps_t {
            trace!(?position, "candidate in front of window");
            return;
        }
        let on_rim = matches!(candidate.placement, Placement::Rim(_));
        if !on_rim
            && obstacles
                .range_limit()
                .is_some_and(|limit| !limit.is_inside_circle(&position))
        {
            trace!(?position, "candidate out of range");
            return;
        }
        let incident = |o: &Obstacle| touches(o, &position) || Some(o.occluder) == crossed;
        if obstacles
            .nearest_hit(&ray, t_start + eps_t, 1.0 - eps_t, incident)
            .is_some()
        {
            trace!(?position, "candidate occluded");
            return;
        }

        let mut vertex_entry = order.entry(vertex, ray.direction);
        let arms = match candidate.placement {
            Placement::Window(_, arm) => {
                let side = cross(&ray.direction, &arm);
                CornerArms {
                    ccw: side > 0.0,
                    cw: side < 0.0,
                    through: false,
                }
            }
            Placement::Rim(_) => CornerArms {
                through: true,
                ..CornerArms::default()
            },
            Placement::Vertex if vertex.is_blocking(orientations) => CornerArms {
                through: true,
                ..CornerArms::default()
            },
            Placement::Vertex => obstacles.corner_arms(&position, &ray.direction),
        };
        let contact = if arms.is_closed() {
            None
        } else {
            obstacles.nearest_hit(&ray, 1.0 + eps_t, f64::INFINITY, incident)
        };
        let Some(contact) = contact else {
            entries.push(vertex_entry);
            return;
        };
        let mut continuation = order.entry(
            SourcePoint::Hit(HitPoint {
                ray,
                occluder: contact.occluder,
                t: contact.t,
                s: contact.s,
            }),
            ray.direction,
        );
        // Sweeping counter-clockwise, an arm on the ccw side is entered after the far hit;
        // an arm on the cw side is left before it.
        if arms.ccw {
            order.register_pair(&mut continuation, &mut vertex_entry);
        } else {
            order.register_pair(&mut vertex_entry, &mut continuation);
        }
        entries.extend([vertex_entry, continuation]);
    }

    /// Replaces every edge running along the range-limit rim with a polyline on the rim.
    ///
    /// An edge runs along the rim when the ray through its angular middle stops on the limit.
    /// The closing window edge of a windowed polygon is never traced.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn trace_arcs(&self, cone: &Cone, obstacles: &ObstacleSet, points: Vec<SourcePoint>) -> Vec<SourcePoint> {
        if self.range_limit.is_none() || points.is_empty() {
            return points;
        }
        let origin = cone.origin;
        let n = points.len();
        let edge_count = if cone.boundary.is_none() { n } else { n - 1 };

        let mut out = Vec::with_capacity(n);
        for (i, point) in points.iter().enumerate() {
            out.push(*point);
            if i >= edge_count {
                continue;
            }
            let from = point.compute_xy() - origin;
            let to = points[(i + 1) % n].compute_xy() - origin;
            // A lone point closes on itself after a full turn.
            let mut gap = cross(&from, &to).atan2(from.dot(&to));
            if gap <= TOLERANCE {
                gap += TAU;
            }
            if gap >= TAU - TOLERANCE && n > 1 {
                continue;
            }
            let pieces = (gap / ARC_STEP).ceil().max(1.0) as usize;
            let middle = Rotation2::new(gap / 2.0) * from;
            if pieces < 2 || self.rim_point(cone, obstacles, middle).is_none() {
                continue;
            }
            let step = Rotation2::new(gap / pieces as f64);
            let mut direction = from;
            for _ in 1..pieces {
                direction = step * direction;
                if let Some(rim) = self.rim_point(cone, obstacles, direction) {
                    out.push(rim);
                }
            }
        }
        debug!(before = n, after = out.len(), "traced range-limit arcs");
        out
    }

    /// Where the ray from the origin along `direction` stops, if it stops on the range limit.
    fn rim_point(&self, cone: &Cone, obstacles: &ObstacleSet, direction: Vector2) -> Option<SourcePoint> {
        let ray = Ray::new(cone.origin, direction);
        let length = direction.norm();
        if length < POINT_EPSILON {
            return None;
        }
        let t_start = window_parameter(cone, &ray);
        let contact = obstacles.nearest_hit(&ray, t_start + POINT_EPSILON / length, f64::INFINITY, |_| false)?;
        matches!(contact.occluder, Occluder::RangeLimit(_)).then_some(SourcePoint::Hit(HitPoint {
            ray,
            occluder: contact.occluder,
            t: contact.t,
            s: contact.s,
        }))
    }
}

/// Ray parameter where a ray from the cone origin crosses the window line; 0 for full cones.
fn window_parameter(cone: &Cone, ray: &Ray) -> f64 {
    let Some(boundary) = &cone.boundary else {
        return 0.0;
    };
    let a = boundary.right.compute_xy();
    let b = boundary.left.compute_xy();
    line_line_intersect(&ray.origin, &ray.direction, &a, &(b - a)).map_or(0.0, |(t, _)| t.max(0.0))
}

/// First obstruction beyond a window boundary point, along the ray from the origin through it.
fn boundary_hit(origin: Point2, boundary: &SourcePoint, obstacles: &ObstacleSet) -> Option<SourcePoint> {
    let ray = Ray::through(origin, boundary.compute_xy());
    let length = ray.direction.norm();
    if length < POINT_EPSILON {
        return None;
    }
    let contact = obstacles.nearest_hit(&ray, 1.0 + POINT_EPSILON / length, f64::INFINITY, |_| false)?;
    Some(SourcePoint::Hit(HitPoint {
        ray,
        occluder: contact.occluder,
        t: contact.t,
        s: contact.s,
    }))
}

/// Drops points coinciding with their predecessor and folds zero-area spikes, where the
/// boundary runs out along a line and straight back.
///
/// A pinned point replaces a coincident predecessor instead of being dropped, and is never
/// folded away, so window boundaries keep their provenance.
fn fold_spikes(points: Vec<(SourcePoint, bool)>, cyclic: bool) -> Vec<SourcePoint> {
    let mut out: Vec<(SourcePoint, bool)> = Vec::with_capacity(points.len());
    for (point, pinned) in points {
        push_folding(&mut out, point, pinned);
    }
    if cyclic {
        // The seam: keep re-feeding the head past the tail until neither folds.
        while out.len() > 2 {
            let (head, head_pinned) = out[0];
            let len = out.len();
            let coincident = coincides(&out[len - 1].0, &head);
            let spike_at_tail = is_spike(&out[len - 2].0, &out[len - 1].0, &head);
            let spike_at_head = is_spike(&out[len - 1].0, &head, &out[1].0);
            if coincident || spike_at_tail {
                out.pop();
            } else if spike_at_head && !head_pinned {
                out.remove(0);
            } else {
                break;
            }
        }
        if out.len() == 2 && coincides(&out[0].0, &out[1].0) {
            out.pop();
        }
    }
    out.into_iter().map(|(point, _)| point).collect()
}

fn push_folding(out: &mut Vec<(SourcePoint, bool)>, point: SourcePoint, pinned: bool) {
    while let Some(&(last, last_pinned)) = out.last() {
        if coincides(&last, &point) {
            if pinned && !last_pinned {
                out.pop();
                continue;
            }
            return;
        }
        let len = out.len();
        if last_pinned || len < 2 || !is_spike(&out[len - 2].0, &last, &point) {
            break;
        }
        out.pop();
    }
    out.push((point, pinned));
}

fn coincides(a: &SourcePoint, b: &SourcePoint) -> bool {
    (a.compute_xy() - b.compute_xy()).norm() <= POINT_EPSILON
}

/// Returns true if the boundary turns straight back at `b`.
fn is_spike(a: &SourcePoint, b: &SourcePoint, c: &SourcePoint) -> bool {
    let (a, b, c) = (a.compute_xy(), b.compute_xy(), c.compute_xy());
    let (into, out) = (b - a, c - b);
    let scale = into.norm().max(out.norm());
    into.dot(&out) < 0.0 && cross(&into, &out).abs() <= POINT_EPSILON * scale
}
