//! Counter-clockwise angular ordering of sweep points without `atan2`.

use std::cmp::Ordering;

use crate::math::vector_2d::cross;
use crate::math::Vector2;

use super::source_point::{SourceKey, SourcePoint};

/// A point waiting to be placed in the sweep, with the direction of the ray that produced it.
///
/// A vertex and its continuation hit share the exact same `anchor`, so no floating-point noise
/// in their computed positions can pull them apart in the sort.
#[derive(Debug, Clone, Copy)]
pub struct SweepEntry {
    pub point: SourcePoint,
    pub key: SourceKey,
    pub anchor: Vector2,
    group: usize,
    rank: u8,
}

/// Orders sweep entries counter-clockwise, starting at `reference`.
///
/// Every entry belongs to a group: its own, or the one it shares with its registered partner.
/// Partners are compared by their registered order first; everything else by half-plane and
/// cross-product sign, with exactly collinear anchors falling back to the group. That keeps the
/// order total when several pairs sit on one ray. Distance never takes part.
#[derive(Debug, Clone)]
pub struct AngularOrder {
    reference: Vector2,
    next_group: usize,
    pairs: usize,
}

impl AngularOrder {
    /// Creates an ordering whose sweep starts at `reference`.
    #[must_use]
    pub fn new(reference: Vector2) -> Self {
        Self {
            reference,
            next_group: 0,
            pairs: 0,
        }
    }

    /// Creates an entry anchored on `anchor`, in a group of its own.
    pub fn entry(&mut self, point: SourcePoint, anchor: Vector2) -> SweepEntry {
        let group = self.next_group;
        self.next_group += 1;
        SweepEntry {
            key: point.key(),
            point,
            anchor,
            group,
            rank: 0,
        }
    }

    /// Pins `first` to come immediately before `second`. Both must share one anchor.
    pub fn register_pair(&mut self, first: &mut SweepEntry, second: &mut SweepEntry) {
        let group = first.group.min(second.group);
        (first.group, first.rank) = (group, 0);
        (second.group, second.rank) = (group, 1);
        self.pairs += 1;
    }

    /// Number of registered pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.pairs
    }

    /// Compares two entries.
    #[must_use]
    pub fn compare(&self, a: &SweepEntry, b: &SweepEntry) -> Ordering {
        if a.group == b.group {
            return a.rank.cmp(&b.rank);
        }
        self.compare_directions(&a.anchor, &b.anchor)
            .then(a.group.cmp(&b.group))
    }

    /// Compares two directions by counter-clockwise angle from the reference.
    #[must_use]
    pub fn compare_directions(&self, a: &Vector2, b: &Vector2) -> Ordering {
        let (ha, hb) = (self.half(a), self.half(b));
        if ha != hb {
            return ha.cmp(&hb);
        }
        let c = cross(a, b);
        if c > 0.0 {
            Ordering::Less
        } else if c < 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Sorts entries in place.
    pub fn sort(&self, entries: &mut [SweepEntry]) {
        entries.sort_by(|a, b| self.compare(a, b));
    }

    /// 0 for directions in `[reference, reference + π)`, 1 for the other half.
    fn half(&self, v: &Vector2) -> u8 {
        let c = cross(&self.reference, v);
        if c > 0.0 || (c == 0.0 && self.reference.dot(v) > 0.0) {
            0
        } else {
            1
        }
    }
}
