use super::vector_2d::cross;
use super::{Point2, POINT_EPSILON};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns true if `p` lies within [`POINT_EPSILON`] of the segment `a → b`.
#[must_use]
pub fn point_on_segment(p: &Point2, a: &Point2, b: &Point2) -> bool {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < POINT_EPSILON * POINT_EPSILON {
        return (p - a).norm() <= POINT_EPSILON;
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm() <= POINT_EPSILON
}

/// Even-odd point-in-polygon test. Points on the boundary count as inside.
#[must_use]
pub fn point_in_polygon(p: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n == 0 {
        return false;
    }
    if n < 3 {
        return polygon
            .iter()
            .zip(polygon.iter().cycle().skip(1))
            .any(|(a, b)| point_on_segment(p, a, b));
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (&polygon[i], &polygon[j]);
        if point_on_segment(p, a, b) {
            return true;
        }
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Returns true if the closed segments `a0 → a1` and `b0 → b1` properly cross.
///
/// Touching at an endpoint or overlapping collinearly is not a proper crossing.
#[must_use]
pub fn segments_properly_cross(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let da = a1 - a0;
    let db = b1 - b0;
    let d1 = cross(&da, &(b0 - a0));
    let d2 = cross(&da, &(b1 - a0));
    let d3 = cross(&db, &(a0 - b0));
    let d4 = cross(&db, &(a1 - b0));
    let eps = POINT_EPSILON * (da.norm() + db.norm()).max(1.0);
    ((d1 > eps && d2 < -eps) || (d1 < -eps && d2 > eps))
        && ((d3 > eps && d4 < -eps) || (d3 < -eps && d4 > eps))
}

/// Checks that no two non-adjacent edges of a closed polygon cross.
///
/// Polygons with fewer than four vertices are trivially simple.
#[must_use]
pub fn is_simple_polygon(points: &[Point2]) -> bool {
    let n = points.len();
    if n < 4 {
        return true;
    }
    for i in 0..n {
        let a0 = &points[i];
        let a1 = &points[(i + 1) % n];
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let b0 = &points[j];
            let b1 = &points[(j + 1) % n];
            if segments_properly_cross(a0, a1, b0, b1) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert_relative_eq!(signed_area(&square()), 100.0);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = square();
        pts.reverse();
        assert_relative_eq!(signed_area(&pts), -100.0);
    }

    #[test]
    fn signed_area_degenerate() {
        assert_relative_eq!(signed_area(&[Point2::new(0.0, 0.0)]), 0.0);
        assert_relative_eq!(signed_area(&[]), 0.0);
    }

    #[test]
    fn point_in_square() {
        let sq = square();
        assert!(point_in_polygon(&Point2::new(5.0, 5.0), &sq));
        assert!(!point_in_polygon(&Point2::new(15.0, 5.0), &sq));
    }

    #[test]
    fn boundary_counts_as_inside() {
        let sq = square();
        assert!(point_in_polygon(&Point2::new(10.0, 5.0), &sq));
        assert!(point_in_polygon(&Point2::new(0.0, 0.0), &sq));
    }

    #[test]
    fn single_point_polygon_contains_only_itself() {
        let poly = [Point2::new(1.0, 1.0)];
        assert!(point_in_polygon(&Point2::new(1.0, 1.0), &poly));
        assert!(!point_in_polygon(&Point2::new(1.0, 2.0), &poly));
    }

    #[test]
    fn square_is_simple() {
        assert!(is_simple_polygon(&square()));
    }

    #[test]
    fn bowtie_is_not_simple() {
        let bowtie = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
        ];
        assert!(!is_simple_polygon(&bowtie));
    }

    #[test]
    fn shared_endpoint_is_not_a_crossing() {
        assert!(!segments_properly_cross(
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
            &Point2::new(10.0, 0.0),
            &Point2::new(10.0, 10.0),
        ));
    }
}
