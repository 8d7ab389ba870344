use crate::math::Point2;

use super::Segment;

/// One edge of the scene-bounds rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundarySide {
    Bottom,
    Right,
    Top,
    Left,
}

/// Axis-aligned scene rectangle. Every visibility ray terminates on it at the latest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub min: Point2,
    pub max: Point2,
}

impl SceneBounds {
    /// Creates bounds from two opposite corners in any order.
    #[must_use]
    pub fn new(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates bounds from an origin corner and a size.
    #[must_use]
    pub fn from_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Point2::new(x, y), Point2::new(x + width, y + height))
    }

    /// Returns true if the point is inside or on the rectangle.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Returns true if the rectangle has no area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// The four edges, counter-clockwise. Each edge starts at the corner it owns.
    #[must_use]
    pub fn edges(&self) -> [(BoundarySide, Segment); 4] {
        let bl = self.min;
        let br = Point2::new(self.max.x, self.min.y);
        let tr = self.max;
        let tl = Point2::new(self.min.x, self.max.y);
        [
            (BoundarySide::Bottom, Segment::new(bl, br)),
            (BoundarySide::Right, Segment::new(br, tr)),
            (BoundarySide::Top, Segment::new(tr, tl)),
            (BoundarySide::Left, Segment::new(tl, bl)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_normalized() {
        let b = SceneBounds::new(Point2::new(10.0, 0.0), Point2::new(0.0, 5.0));
        assert_eq!(b.min, Point2::new(0.0, 0.0));
        assert_eq!(b.max, Point2::new(10.0, 5.0));
    }

    #[test]
    fn contains_is_closed() {
        let b = SceneBounds::from_size(0.0, 0.0, 10.0, 10.0);
        assert!(b.contains(&Point2::new(10.0, 0.0)));
        assert!(!b.contains(&Point2::new(10.1, 0.0)));
    }

    #[test]
    fn edges_chain_counter_clockwise() {
        let edges = SceneBounds::from_size(0.0, 0.0, 4.0, 2.0).edges();
        for i in 0..4 {
            assert_eq!(edges[i].1.end, edges[(i + 1) % 4].1.start);
        }
    }
}
