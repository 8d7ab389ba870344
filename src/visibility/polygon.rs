use crate::math::polygon_2d::{is_simple_polygon, point_in_polygon, signed_area};
use crate::math::{Point2, POINT_EPSILON};
use crate::scene::SurfaceId;

use super::cone::ConeBoundary;
use super::source_point::SourcePoint;

/// Boundary of the region visible from a cone's origin, as provenance-tagged vertices.
#[derive(Debug, Clone)]
pub struct VisibilityPolygon {
    /// Viewpoint the polygon was computed from (a mirror image for reflected stages).
    pub origin: Point2,
    /// Number of reflections between the player and this polygon.
    pub depth: usize,
    /// Surface of the window this polygon was seen through, if any.
    pub window_surface: Option<SurfaceId>,
    pub points: Vec<SourcePoint>,
}

impl VisibilityPolygon {
    /// Cartesian vertices in sweep order.
    #[must_use]
    pub fn positions(&self) -> Vec<Point2> {
        self.points.iter().map(SourcePoint::compute_xy).collect()
    }

    /// Returns true if the polygon collapsed to fewer than three vertices.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    /// Returns true if `p` is inside or on the polygon. Degenerate polygons contain nothing.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        !self.is_degenerate() && point_in_polygon(p, &self.positions())
    }

    /// Enclosed area; positive for the counter-clockwise sweep order.
    #[must_use]
    pub fn area(&self) -> f64 {
        signed_area(&self.positions())
    }

    /// Returns true if no two non-adjacent edges cross.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        is_simple_polygon(&self.positions())
    }

    /// Maximal runs of boundary edges lying on `surface`, as windows for the next reflection.
    ///
    /// Edges are recognized by provenance: both endpoints must lie on the surface. The closing
    /// edge of a windowed polygon is its own window and is never reused.
    #[must_use]
    pub fn windows_on(&self, surface: SurfaceId) -> Vec<ConeBoundary> {
        let n = self.points.len();
        if n < 2 {
            return Vec::new();
        }
        let cyclic = self.window_surface.is_none();
        let edge_count = if cyclic { n } else { n - 1 };

        let on_surface: Vec<bool> = (0..edge_count)
            .map(|i| {
                let (a, b) = (&self.points[i], &self.points[(i + 1) % n]);
                a.is_on_surface(surface)
                    && b.is_on_surface(surface)
                    && (a.compute_xy() - b.compute_xy()).norm() > POINT_EPSILON
            })
            .collect();

        // Runs of consecutive edge indices.
        let mut runs: Vec<(usize, usize)> = Vec::new();
        for (i, &on) in on_surface.iter().enumerate() {
            if !on {
                continue;
            }
            match runs.last_mut() {
                Some((_, end)) if *end + 1 == i => *end = i,
                _ => runs.push((i, i)),
            }
        }
        if cyclic && runs.len() > 1 {
            if let (Some(&(first_start, first_end)), Some(&(last_start, last_end))) =
                (runs.first(), runs.last())
            {
                if first_start == 0 && last_end == edge_count - 1 {
                    runs.pop();
                    runs[0] = (last_start, first_end);
                }
            }
        }

        runs.into_iter()
            .map(|(start, end)| ConeBoundary {
                right: self.points[start],
                left: self.points[(end + 1) % n],
                surface: Some(surface),
            })
            .collect()
    }
}
