use crate::math::vector_2d::distance;
use crate::math::{Point2, POINT_EPSILON};

use super::TrajectoryResult;

/// How far the traced path agrees with the planned one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentResult {
    pub is_fully_aligned: bool,
    /// First waypoint index at which the paths differ.
    pub divergence_index: Option<usize>,
    pub divergence_point: Option<Point2>,
    /// Number of leading segments both paths share.
    pub aligned_segment_count: usize,
}

/// Compares planned and actual waypoints in lockstep.
///
/// When both paths have a waypoint at the divergence index, the divergence point is the one
/// closer to the last shared waypoint. When only one does, it is that one.
#[must_use]
pub fn detect_divergence(planned: &TrajectoryResult, actual: &TrajectoryResult) -> AlignmentResult {
    let (p, a) = (&planned.waypoints, &actual.waypoints);
    let shared = p.len().min(a.len());
    let divergence_index = (0..shared)
        .find(|&i| distance(&p[i], &a[i]) > POINT_EPSILON)
        .or_else(|| (p.len() != a.len()).then_some(shared));

    let divergence_point = divergence_index.and_then(|i| match (p.get(i), a.get(i)) {
        (Some(&pp), Some(&ap)) => Some(match i.checked_sub(1).map(|j| p[j]) {
            Some(anchor) if distance(&anchor, &pp) < distance(&anchor, &ap) => pp,
            _ => ap,
        }),
        (Some(&only), None) | (None, Some(&only)) => Some(only),
        (None, None) => None,
    });

    let aligned_segment_count = divergence_index.unwrap_or(shared).saturating_sub(1);

    AlignmentResult {
        is_fully_aligned: divergence_index.is_none() && actual.reached_target(),
        divergence_index,
        divergence_point,
        aligned_segment_count,
    }
}
