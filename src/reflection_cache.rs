//! Memoized, bidirectional point reflection shared between trajectory and visibility code.

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::error::{Result, SceneError};
use crate::math::Point2;
use crate::scene::{Surface, SurfaceId};

slotmap::new_key_type! {
    /// Identity of a point owned by a [`ReflectionCache`].
    pub struct PointId;
}

/// Hit/miss counters for a [`ReflectionCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Number of stored `(point, surface)` mappings, both directions counted.
    pub size: usize,
}

/// Memoizes point reflections through surface lines.
///
/// Every computed reflection is stored in both directions, so reflecting an image back through
/// the same surface returns the original [`PointId`] rather than a recomputed near-equal point.
/// The cache is plain mutable state owned by the caller; one instance may be shared by the
/// trajectory engine and the visibility cascade for a frame or longer.
#[derive(Debug, Default)]
pub struct ReflectionCache {
    points: SlotMap<PointId, Point2>,
    interned: HashMap<(u64, u64), PointId>,
    reflections: HashMap<(PointId, SurfaceId), PointId>,
    hits: u64,
    misses: u64,
}

impl ReflectionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ID for a caller-supplied point, reusing the ID of an identical earlier point.
    pub fn intern(&mut self, point: Point2) -> PointId {
        let key = coordinate_key(&point);
        if let Some(&id) = self.interned.get(&key) {
            return id;
        }
        let id = self.points.insert(point);
        self.interned.insert(key, id);
        id
    }

    /// Returns the position of a point owned by this cache.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::UnknownPoint` if the ID was not produced by this cache.
    pub fn position(&self, id: PointId) -> Result<Point2> {
        self.points
            .get(id)
            .copied()
            .ok_or_else(|| SceneError::UnknownPoint(id).into())
    }

    /// Reflects a point through a surface's infinite line.
    ///
    /// On a miss both `(point, surface) → image` and `(image, surface) → point` are stored.
    /// Images always receive a fresh ID, so the reverse mapping never aliases another point.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::UnknownPoint` if the ID was not produced by this cache.
    pub fn reflect(&mut self, point: PointId, surface: &Surface) -> Result<PointId> {
        if let Some(&image) = self.reflections.get(&(point, surface.id())) {
            self.hits += 1;
            return Ok(image);
        }
        self.misses += 1;
        let position = self.position(point)?;
        let image = self.points.insert(surface.mirror_point(&position));
        self.reflections.insert((point, surface.id()), image);
        self.reflections.insert((image, surface.id()), point);
        Ok(image)
    }

    /// Reflects a point through several surfaces in order, returning the final image.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::UnknownPoint` if the ID was not produced by this cache.
    pub fn reflect_through<'a>(
        &mut self,
        point: PointId,
        surfaces: impl IntoIterator<Item = &'a Surface>,
    ) -> Result<PointId> {
        surfaces
            .into_iter()
            .try_fold(point, |current, surface| self.reflect(current, surface))
    }

    /// Returns true if the reflection of `point` through `surface` is cached.
    #[must_use]
    pub fn has(&self, point: PointId, surface: SurfaceId) -> bool {
        self.reflections.contains_key(&(point, surface))
    }

    /// Returns the cached reflection without computing or counting anything.
    #[must_use]
    pub fn get(&self, point: PointId, surface: SurfaceId) -> Option<PointId> {
        self.reflections.get(&(point, surface)).copied()
    }

    /// Drops all points, mappings and counters. Previously issued IDs become unknown.
    pub fn clear(&mut self) {
        self.points.clear();
        self.interned.clear();
        self.reflections.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Returns the hit/miss counters and mapping count.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.reflections.len(),
        }
    }
}

/// Exact-coordinate key; `-0.0` and `0.0` map to the same key.
fn coordinate_key(p: &Point2) -> (u64, u64) {
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}
