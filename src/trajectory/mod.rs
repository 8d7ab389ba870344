//! Trajectory engine: plan a shot through mirror images, then trace what the real ray does.

mod alignment;
mod bypass;
mod physical;
mod planned;
mod waypoints;

pub use alignment::{detect_divergence, AlignmentResult};
pub use bypass::{BypassEvaluator, BypassReason, BypassResult, BypassedSurface};
pub use physical::{CursorPolicy, PhysicalPathTracer, TraceConfig};
pub use planned::{PlannedPathCalculator, PLANNED_PATH_KEEPS_OFF_SEGMENT_HITS};
pub use waypoints::WaypointPath;

use crate::error::Result;
use crate::math::{Point2, Vector2};
use crate::scene::SurfaceId;

/// A surface contact along a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    pub surface: SurfaceId,
    pub point: Point2,
    /// Whether `point` lies on the finite segment. Always true for traced paths.
    pub on_segment: bool,
}

/// Why a path ended where it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The path ends at the target.
    ReachedTarget,
    /// The ray stuck to a surface it could not bounce off.
    Blocked(SurfaceId),
    /// The ray left the range-limit circle.
    RangeLimited,
    /// The reflection budget ran out.
    MaxReflections,
    /// Nothing was hit within the maximum travel distance.
    Escaped,
}

/// A planned or traced path as a polyline of waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryResult {
    /// Waypoints starting at the player.
    pub waypoints: Vec<Point2>,
    pub hits: Vec<HitInfo>,
    pub termination: Termination,
}

impl TrajectoryResult {
    #[must_use]
    pub fn reached_target(&self) -> bool {
        self.termination == Termination::ReachedTarget
    }

    /// The surface that stopped the ray, if any.
    #[must_use]
    pub fn blocked_by(&self) -> Option<SurfaceId> {
        match self.termination {
            Termination::Blocked(surface) => Some(surface),
            _ => None,
        }
    }

    /// Direction of the first leg, or `None` for a path with fewer than two waypoints.
    #[must_use]
    pub fn first_direction(&self) -> Option<Vector2> {
        match self.waypoints.as_slice() {
            [a, b, ..] => Some(b - a),
            _ => None,
        }
    }

    /// Hands the waypoints to a path follower.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the path has fewer than two waypoints.
    pub fn to_waypoint_path(&self) -> Result<WaypointPath> {
        WaypointPath::new(self.waypoints.clone())
    }
}
