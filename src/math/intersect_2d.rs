use super::vector_2d::cross;
use super::{Point2, Vector2, TOLERANCE};

/// Result of a ray hitting a bounded segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Intersection point.
    pub point: Point2,
    /// Ray parameter: `point = origin + t * direction`, always `>= 0`.
    pub t: f64,
    /// Segment parameter in `[0, 1]` from segment start to end.
    pub s: f64,
    /// Unit segment normal, oriented so that `normal · direction <= 0`.
    pub normal: Vector2,
}

/// Parametric 2D line-line intersection.
///
/// Given lines `p + t * d` and `q + u * e`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect(p: &Point2, d: &Vector2, q: &Point2, e: &Vector2) -> Option<(f64, f64)> {
    let denom = cross(d, e);
    if denom.abs() < TOLERANCE {
        return None;
    }
    let w = q - p;
    let t = cross(&w, e) / denom;
    let u = cross(&w, d) / denom;
    Some((t, u))
}

/// Intersects the ray `origin + t * direction` (`t >= 0`) with the segment `a → b`.
///
/// Returns `None` when the ray is parallel to the segment (zero denominator), when the hit
/// lies behind the ray origin (`t < 0`), or when it falls outside the segment (`s ∉ [0, 1]`).
#[must_use]
pub fn ray_segment_intersect(
    origin: &Point2,
    direction: &Vector2,
    a: &Point2,
    b: &Point2,
) -> Option<RayHit> {
    let seg = b - a;
    let denom = cross(direction, &seg);
    if denom == 0.0 {
        return None;
    }
    let w = a - origin;
    let t = cross(&w, &seg) / denom;
    let s = cross(&w, direction) / denom;
    if t < 0.0 || !(0.0..=1.0).contains(&s) {
        return None;
    }

    let len = seg.norm();
    let mut normal = Vector2::new(-seg.y / len, seg.x / len);
    if normal.dot(direction) > 0.0 {
        normal = -normal;
    }

    Some(RayHit {
        point: origin + direction * t,
        t,
        s,
        normal,
    })
}

/// Parameter `t >= 0` at which the ray `origin + t * direction` leaves the circle.
///
/// A ray starting outside (or exactly on the rim heading out) exits immediately at `t = 0`.
/// Returns `None` for a zero direction.
#[must_use]
pub fn ray_circle_exit(origin: &Point2, direction: &Vector2, center: &Point2, radius: f64) -> Option<f64> {
    let a = direction.norm_squared();
    if a < TOLERANCE * TOLERANCE {
        return None;
    }
    let f = origin - center;
    let c = f.norm_squared() - radius * radius;
    if c > 0.0 {
        return Some(0.0);
    }
    // Origin inside the closed disk: the larger root is the exit and is never negative.
    let b = 2.0 * f.dot(direction);
    let discriminant = (b * b - 4.0 * a * c).max(0.0);
    let t = (-b + discriminant.sqrt()) / (2.0 * a);
    Some(t.max(0.0))
}

/// Parameters `s` in `[0, 1]`, ascending, where the segment from `start` to `end` meets a circle.
///
/// A tangent touch is reported once.
#[must_use]
pub fn segment_circle_intersect(start: &Point2, end: &Point2, center: &Point2, radius: f64) -> Vec<f64> {
    let d = end - start;
    let a = d.norm_squared();
    if a < TOLERANCE * TOLERANCE {
        return Vec::new();
    }
    let f = start - center;
    let b = 2.0 * f.dot(&d);
    let c = f.norm_squared() - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }
    let root = discriminant.sqrt();
    let mut params: Vec<f64> = [(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)]
        .into_iter()
        .filter(|s| (0.0..=1.0).contains(s))
        .collect();
    params.dedup_by(|x, y| (*x - *y).abs() <= TOLERANCE);
    params
}
