use crate::error::{OperationError, Result};
use crate::geometry::Segment;
use crate::math::Point2;

/// Polyline a projectile follows before sticking at the last waypoint.
///
/// Positions are looked up by travelled distance, which keeps the follower frame-rate agnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointPath {
    points: Vec<Point2>,
    /// Distance from the first point to each point.
    cumulative: Vec<f64>,
}

impl WaypointPath {
    /// Creates a path through `points`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if fewer than two points are given.
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        if points.len() < 2 {
            return Err(OperationError::InvalidInput(format!(
                "a waypoint path needs at least 2 points, got {}",
                points.len()
            ))
            .into());
        }
        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cumulative.push(total);
        for pair in points.windows(2) {
            total += (pair[1] - pair[0]).norm();
            cumulative.push(total);
        }
        Ok(Self { points, cumulative })
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Total length of the polyline.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Position after travelling `distance` along the path, clamped to its ends.
    #[must_use]
    pub fn position_at(&self, distance: f64) -> Point2 {
        let d = distance.clamp(0.0, self.length());
        let i = self.cumulative.partition_point(|&c| c < d);
        if i == 0 {
            return self.points[0];
        }
        let span = self.cumulative[i] - self.cumulative[i - 1];
        if span <= 0.0 {
            return self.points[i];
        }
        let local = (d - self.cumulative[i - 1]) / span;
        Segment::new(self.points[i - 1], self.points[i]).point_at(local)
    }

    /// The legs of the path, in order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.windows(2).map(|pair| Segment::new(pair[0], pair[1]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::RicochetError;

    fn l_path() -> WaypointPath {
        WaypointPath::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(30.0, 0.0),
            Point2::new(30.0, 40.0),
        ])
        .unwrap()
    }

    #[test]
    fn too_few_points_is_invalid_input() {
        let err = WaypointPath::new(vec![Point2::origin()]).unwrap_err();
        assert!(matches!(err, RicochetError::Operation(OperationError::InvalidInput(_))));
        assert!(WaypointPath::new(Vec::new()).is_err());
    }

    #[test]
    fn length_sums_legs() {
        let path = l_path();
        assert_relative_eq!(path.length(), 70.0);
        assert_eq!(path.segments().count(), 2);
    }

    #[test]
    fn position_interpolates_along_legs() {
        let path = l_path();
        let p = path.position_at(15.0);
        assert_relative_eq!(p.x, 15.0);
        assert_relative_eq!(p.y, 0.0);
        let q = path.position_at(50.0);
        assert_relative_eq!(q.x, 30.0);
        assert_relative_eq!(q.y, 20.0);
    }

    #[test]
    fn position_is_clamped() {
        let path = l_path();
        assert_eq!(path.position_at(-5.0), Point2::new(0.0, 0.0));
        assert_eq!(path.position_at(1e9), Point2::new(30.0, 40.0));
    }
}
