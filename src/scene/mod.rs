mod chain;
mod surface;

pub use chain::{ChainId, Junction, Orientation, SurfaceChain, SurfaceOrientations};
pub use surface::{HitResponse, Surface, SurfaceId, SurfaceKind};

use crate::error::{Result, SceneError};
use crate::geometry::Segment;
use crate::math::Point2;
use slotmap::{SecondaryMap, SlotMap};

/// Central arena that owns all surfaces and the chains connecting them.
///
/// Surfaces and chains reference each other via typed IDs (generational indices). Removing a
/// chain invalidates its IDs; a re-added surface always gets a fresh ID, so anything keyed on
/// the old one (such as reflection cache entries) simply stops matching.
#[derive(Debug, Default)]
pub struct Scene {
    surfaces: SlotMap<SurfaceId, Surface>,
    chains: SlotMap<ChainId, SurfaceChain>,
    surface_chain: SecondaryMap<SurfaceId, ChainId>,
}

impl Scene {
    /// Creates a new, empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a standalone surface, wrapped in its own one-surface chain.
    pub fn add_surface(&mut self, segment: Segment, kind: SurfaceKind) -> SurfaceId {
        let chain = self.insert_chain(&[segment.start, segment.end], false, |_| kind);
        self.chains[chain].surfaces()[0]
    }

    /// Adds a chain of surfaces through `vertices`, all of the same kind.
    ///
    /// A closed chain also connects the last vertex back to the first; closing needs at least
    /// three vertices and is ignored otherwise. Fewer than two vertices yields an empty chain.
    pub fn add_chain(&mut self, vertices: &[Point2], closed: bool, kind: SurfaceKind) -> ChainId {
        self.insert_chain(vertices, closed, |_| kind)
    }

    /// Adds a chain whose surfaces each carry their own kind, in chain order.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::KindCountMismatch` if `kinds` does not have one entry per segment.
    pub fn add_chain_with_kinds(
        &mut self,
        vertices: &[Point2],
        closed: bool,
        kinds: &[SurfaceKind],
    ) -> Result<ChainId> {
        let segments = segment_count(vertices.len(), closed);
        if kinds.len() != segments {
            return Err(SceneError::KindCountMismatch {
                segments,
                kinds: kinds.len(),
            }
            .into());
        }
        Ok(self.insert_chain(vertices, closed, |i| kinds[i]))
    }

    /// Removes a chain and all of its surfaces.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::ChainNotFound` if the chain is not in this scene.
    pub fn remove_chain(&mut self, id: ChainId) -> Result<()> {
        let chain = self.chains.remove(id).ok_or(SceneError::ChainNotFound(id))?;
        for surface in chain.surfaces() {
            self.surfaces.remove(*surface);
            self.surface_chain.remove(*surface);
        }
        Ok(())
    }

    /// Returns a surface by ID.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::SurfaceNotFound` if the surface is not in this scene.
    pub fn surface(&self, id: SurfaceId) -> Result<&Surface> {
        self.surfaces
            .get(id)
            .ok_or_else(|| SceneError::SurfaceNotFound(id).into())
    }

    /// Returns a chain by ID.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::ChainNotFound` if the chain is not in this scene.
    pub fn chain(&self, id: ChainId) -> Result<&SurfaceChain> {
        self.chains
            .get(id)
            .ok_or_else(|| SceneError::ChainNotFound(id).into())
    }

    /// Returns the chain owning a surface.
    #[must_use]
    pub fn chain_of(&self, surface: SurfaceId) -> Option<ChainId> {
        self.surface_chain.get(surface).copied()
    }

    /// Returns the junction at `index` of a chain, or `None` past the last junction.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::ChainNotFound` if the chain is not in this scene.
    pub fn junction_at(&self, chain: ChainId, index: usize) -> Result<Option<&Junction>> {
        Ok(self.chain(chain)?.junctions().get(index))
    }

    /// Iterates over all surfaces.
    pub fn surfaces(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.values()
    }

    /// Iterates over all chains.
    pub fn chains(&self) -> impl Iterator<Item = &SurfaceChain> {
        self.chains.values()
    }

    /// Returns the number of surfaces.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    fn insert_chain(
        &mut self,
        vertices: &[Point2],
        closed: bool,
        kind_of: impl Fn(usize) -> SurfaceKind,
    ) -> ChainId {
        let closed = closed && vertices.len() >= 3;
        let segments = segment_count(vertices.len(), closed);
        let mut ids = Vec::with_capacity(segments);
        for i in 0..segments {
            let segment = Segment::new(vertices[i], vertices[(i + 1) % vertices.len()]);
            let kind = kind_of(i);
            ids.push(
                self.surfaces
                    .insert_with_key(|id| Surface::new(id, segment, kind)),
            );
        }
        let chain = self
            .chains
            .insert_with_key(|id| SurfaceChain::new(id, ids.clone(), vertices, closed));
        for id in ids {
            self.surface_chain.insert(id, chain);
        }
        chain
    }
}

/// Number of segments a chain through `vertex_count` vertices has.
fn segment_count(vertex_count: usize, closed: bool) -> usize {
    match vertex_count {
        0 | 1 => 0,
        n if closed && n >= 3 => n,
        n => n - 1,
    }
}
