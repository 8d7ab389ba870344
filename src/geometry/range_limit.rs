use crate::math::intersect_2d::ray_circle_exit;
use crate::math::{Point2, Vector2, TOLERANCE};

use super::Ray;

/// How the range-limit circle is split into two half-circles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HalfSplit {
    /// Split along the horizontal diameter into [`RangeLimitHalf::Top`] and [`RangeLimitHalf::Bottom`].
    #[default]
    Horizontal,
    /// Split along the vertical diameter into [`RangeLimitHalf::Left`] and [`RangeLimitHalf::Right`].
    Vertical,
}

/// One half-circle of the range limit.
///
/// `Top` is the half with `y >= center.y`, `Right` the half with `x >= center.x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeLimitHalf {
    Top,
    Bottom,
    Left,
    Right,
}

/// Where a ray leaves the range-limit circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeLimitHit {
    pub point: Point2,
    /// Ray parameter of the hit.
    pub t: f64,
    pub half: RangeLimitHalf,
}

/// Maximum-distance clip: a circle of `radius` around `center`, built from two half-circles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeLimit {
    pub center: Point2,
    pub radius: f64,
    pub split: HalfSplit,
}

impl RangeLimit {
    /// Creates a range limit split along the horizontal diameter.
    #[must_use]
    pub fn new(center: Point2, radius: f64) -> Self {
        Self {
            center,
            radius,
            split: HalfSplit::Horizontal,
        }
    }

    /// Returns the same limit split along the given diameter.
    #[must_use]
    pub fn with_split(mut self, split: HalfSplit) -> Self {
        self.split = split;
        self
    }

    /// Closed-disk membership: points on the rim count as inside.
    #[must_use]
    pub fn is_inside_circle(&self, p: &Point2) -> bool {
        (p - self.center).norm_squared() <= self.radius * self.radius + TOLERANCE
    }

    /// Which half-circle a point belongs to, by plain coordinate comparison.
    ///
    /// Points exactly on the splitting diameter belong to `Top` / `Right`.
    #[must_use]
    pub fn half_of(&self, p: &Point2) -> RangeLimitHalf {
        match self.split {
            HalfSplit::Horizontal => {
                if p.y >= self.center.y {
                    RangeLimitHalf::Top
                } else {
                    RangeLimitHalf::Bottom
                }
            }
            HalfSplit::Vertical => {
                if p.x >= self.center.x {
                    RangeLimitHalf::Right
                } else {
                    RangeLimitHalf::Left
                }
            }
        }
    }

    /// The two diameter endpoints where the half-circles meet, with the halves on either side.
    #[must_use]
    pub fn arc_junctions(&self) -> [(Point2, (RangeLimitHalf, RangeLimitHalf)); 2] {
        let (c, r) = (self.center, self.radius);
        match self.split {
            HalfSplit::Horizontal => {
                let halves = (RangeLimitHalf::Top, RangeLimitHalf::Bottom);
                [
                    (Point2::new(c.x + r, c.y), halves),
                    (Point2::new(c.x - r, c.y), halves),
                ]
            }
            HalfSplit::Vertical => {
                let halves = (RangeLimitHalf::Right, RangeLimitHalf::Left);
                [
                    (Point2::new(c.x, c.y + r), halves),
                    (Point2::new(c.x, c.y - r), halves),
                ]
            }
        }
    }

    /// Computes where a ray from `start` along `direction` is clipped by the limit.
    ///
    /// A start outside the circle is clipped immediately at the start; otherwise the hit lies
    /// on the rim, exactly `radius` from the center. Returns `None` for a zero direction.
    #[must_use]
    pub fn compute_range_limit_hit_point(&self, start: &Point2, direction: &Vector2) -> Option<RangeLimitHit> {
        if !self.is_inside_circle(start) {
            return Some(RangeLimitHit {
                point: *start,
                t: 0.0,
                half: self.half_of(start),
            });
        }
        let t = ray_circle_exit(start, direction, &self.center, self.radius)?;
        let point = start + direction * t;
        Some(RangeLimitHit {
            point,
            t,
            half: self.half_of(&point),
        })
    }

    /// [`Self::compute_range_limit_hit_point`] for a [`Ray`].
    #[must_use]
    pub fn clip_ray(&self, ray: &Ray) -> Option<RangeLimitHit> {
        self.compute_range_limit_hit_point(&ray.origin, &ray.direction)
    }
}
