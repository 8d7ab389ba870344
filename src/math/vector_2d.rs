//! 2D vector algebra on top of nalgebra: cross products, perpendiculars and reflections.

use super::{Point2, Vector2, TOLERANCE};

/// Scalar 2D cross product `a.x * b.y - a.y * b.x`.
///
/// Positive when `b` lies counter-clockwise of `a`.
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Left-pointing perpendicular of `v` (rotated 90° counter-clockwise).
#[must_use]
pub fn perpendicular(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// Returns `v / |v|`, or the zero vector when `v` is shorter than [`TOLERANCE`].
#[must_use]
pub fn normalize_or_zero(v: &Vector2) -> Vector2 {
    let len = v.norm();
    if len < TOLERANCE {
        Vector2::zeros()
    } else {
        v / len
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm()
}

/// Reflects a direction about a unit normal: `d - 2(d·n)n`.
#[must_use]
pub fn reflect_direction(direction: &Vector2, normal: &Vector2) -> Vector2 {
    direction - normal * (2.0 * direction.dot(normal))
}

/// Mirrors `point` through the infinite line passing through `line_a` and `line_b`.
///
/// The point is projected onto the line and the result is `2·projection − point`.
/// Coincident line points define no line; the input is returned unchanged.
#[must_use]
pub fn reflect_point_through_line(point: &Point2, line_a: &Point2, line_b: &Point2) -> Point2 {
    let d = line_b - line_a;
    let len_sq = d.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return *point;
    }
    let t = (point - line_a).dot(&d) / len_sq;
    let projection = line_a + d * t;
    Point2::from(projection.coords * 2.0 - point.coords)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn cross_sign_is_ccw_positive() {
        let x = Vector2::new(1.0, 0.0);
        let y = Vector2::new(0.0, 1.0);
        assert_relative_eq!(cross(&x, &y), 1.0);
        assert_relative_eq!(cross(&y, &x), -1.0);
        assert_relative_eq!(cross(&x, &(x * 3.0)), 0.0);
    }

    #[test]
    fn perpendicular_rotates_left() {
        let p = perpendicular(&Vector2::new(2.0, 0.0));
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 2.0);
    }

    #[test]
    fn normalize_zero_vector_stays_zero() {
        assert_eq!(normalize_or_zero(&Vector2::zeros()), Vector2::zeros());
        let n = normalize_or_zero(&Vector2::new(3.0, 4.0));
        assert_relative_eq!(n.x, 0.6);
        assert_relative_eq!(n.y, 0.8);
    }

    #[test]
    fn reflect_direction_off_floor() {
        let d = Vector2::new(1.0, -1.0);
        let r = reflect_direction(&d, &Vector2::new(0.0, 1.0));
        assert_relative_eq!(r.x, 1.0);
        assert_relative_eq!(r.y, 1.0);
    }

    #[test]
    fn reflect_point_through_horizontal_line() {
        let p = Point2::new(100.0, 100.0);
        let r = reflect_point_through_line(&p, &Point2::new(0.0, 150.0), &Point2::new(300.0, 150.0));
        assert_relative_eq!(r.x, 100.0);
        assert_relative_eq!(r.y, 200.0);
    }

    #[test]
    fn reflect_point_through_diagonal_line() {
        let p = Point2::new(1.0, 0.0);
        let r = reflect_point_through_line(&p, &Point2::new(0.0, 0.0), &Point2::new(2.0, 2.0));
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn reflect_point_degenerate_line_is_identity() {
        let p = Point2::new(4.0, -2.0);
        let a = Point2::new(1.0, 1.0);
        assert_eq!(reflect_point_through_line(&p, &a, &a), p);
    }
}
