use std::collections::HashMap;

use crate::math::vector_2d::cross;
use crate::math::{Point2, TOLERANCE};

use super::{Scene, SurfaceId};

slotmap::new_key_type! {
    /// Unique identifier for a surface chain in the scene.
    pub struct ChainId;
}

/// Connection vertex between two consecutive surfaces of a chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Junction {
    /// Position in the chain's junction list.
    pub index: usize,
    pub position: Point2,
    /// Surface ending at this vertex.
    pub surface_before: SurfaceId,
    /// Surface starting at this vertex.
    pub surface_after: SurfaceId,
}

impl Junction {
    /// Whether this junction stops a visibility ray cast from the viewpoint the
    /// orientations were computed for.
    ///
    /// When both adjacent surfaces wind the same way around the viewpoint the chain sweeps
    /// across the vertex and the corner is solid. Opposite windings leave a notch that light
    /// grazes through. Missing or collinear data counts as blocking.
    #[must_use]
    pub fn is_blocking(&self, orientations: &SurfaceOrientations) -> bool {
        match (
            orientations.get(self.surface_before),
            orientations.get(self.surface_after),
        ) {
            (Some(before), Some(after))
                if before != Orientation::Collinear && after != Orientation::Collinear =>
            {
                before == after
            }
            _ => true,
        }
    }
}

/// An ordered run of surfaces joined end to start, optionally closed.
#[derive(Debug, Clone)]
pub struct SurfaceChain {
    id: ChainId,
    surfaces: Vec<SurfaceId>,
    junctions: Vec<Junction>,
    closed: bool,
}

impl SurfaceChain {
    pub(crate) fn new(id: ChainId, surfaces: Vec<SurfaceId>, vertices: &[Point2], closed: bool) -> Self {
        let n = surfaces.len();
        let mut junctions = Vec::new();
        for i in 1..n {
            junctions.push(Junction {
                index: junctions.len(),
                position: vertices[i],
                surface_before: surfaces[i - 1],
                surface_after: surfaces[i],
            });
        }
        if closed && n >= 2 {
            junctions.push(Junction {
                index: junctions.len(),
                position: vertices[0],
                surface_before: surfaces[n - 1],
                surface_after: surfaces[0],
            });
        }
        Self {
            id,
            surfaces,
            junctions,
            closed,
        }
    }

    /// Returns the chain identifier.
    #[must_use]
    pub fn id(&self) -> ChainId {
        self.id
    }

    /// Surfaces in chain order.
    #[must_use]
    pub fn surfaces(&self) -> &[SurfaceId] {
        &self.surfaces
    }

    /// Shared vertices between consecutive surfaces.
    #[must_use]
    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    /// Whether the last surface connects back to the first.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns true if the chain has no surfaces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

/// Winding of a surface as seen from a viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// `start → end` turns counter-clockwise around the viewpoint.
    Ccw,
    /// `start → end` turns clockwise around the viewpoint.
    Cw,
    /// The viewpoint lies on the surface's line.
    Collinear,
}

/// Per-surface [`Orientation`] for one viewpoint.
#[derive(Debug, Clone)]
pub struct SurfaceOrientations {
    viewpoint: Point2,
    orientations: HashMap<SurfaceId, Orientation>,
}

impl SurfaceOrientations {
    /// Creates an orientation map with no entries; every junction looked up in it blocks.
    #[must_use]
    pub fn empty(viewpoint: Point2) -> Self {
        Self {
            viewpoint,
            orientations: HashMap::new(),
        }
    }

    /// Computes the orientation of every surface in the scene around `viewpoint`.
    #[must_use]
    pub fn for_viewpoint(viewpoint: Point2, scene: &Scene) -> Self {
        let orientations = scene
            .surfaces()
            .map(|surface| {
                let seg = surface.segment();
                let c = cross(&(seg.start - viewpoint), &(seg.end - viewpoint));
                let scale = (seg.start - viewpoint).norm() * (seg.end - viewpoint).norm();
                let orientation = if c.abs() <= TOLERANCE * scale.max(1.0) {
                    Orientation::Collinear
                } else if c > 0.0 {
                    Orientation::Ccw
                } else {
                    Orientation::Cw
                };
                (surface.id(), orientation)
            })
            .collect();
        Self {
            viewpoint,
            orientations,
        }
    }

    /// The viewpoint these orientations were computed for.
    #[must_use]
    pub fn viewpoint(&self) -> Point2 {
        self.viewpoint
    }

    /// Orientation of one surface, if known.
    #[must_use]
    pub fn get(&self, surface: SurfaceId) -> Option<Orientation> {
        self.orientations.get(&surface).copied()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::scene::SurfaceKind;

    /// V-shaped chain (10,10) → (20,0) → (30,10) with its junction at (20,0).
    fn v_scene() -> (Scene, ChainId) {
        let mut scene = Scene::new();
        let chain = scene.add_chain(
            &[Point2::new(10.0, 10.0), Point2::new(20.0, 0.0), Point2::new(30.0, 10.0)],
            false,
            SurfaceKind::Ricochet,
        );
        (scene, chain)
    }

    #[test]
    fn open_chain_has_interior_junctions_only() {
        let (scene, chain) = v_scene();
        let chain = scene.chain(chain).unwrap();
        assert_eq!(chain.surfaces().len(), 2);
        assert_eq!(chain.junctions().len(), 1);
        assert_eq!(chain.junctions()[0].position, Point2::new(20.0, 0.0));
    }

    #[test]
    fn closed_chain_wraps_around() {
        let mut scene = Scene::new();
        let id = scene.add_chain(
            &[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)],
            true,
            SurfaceKind::Wall,
        );
        let chain = scene.chain(id).unwrap();
        assert_eq!(chain.surfaces().len(), 3);
        assert_eq!(chain.junctions().len(), 3);
        let last = chain.junctions()[2];
        assert_eq!(last.position, Point2::new(0.0, 0.0));
        assert_eq!(last.surface_after, chain.surfaces()[0]);
    }

    #[test]
    fn v_junction_matching_signs_blocks() {
        // Viewed from straight below, the chain sweeps across the junction: a solid corner.
        let (scene, chain) = v_scene();
        let junction = scene.chain(chain).unwrap().junctions()[0];
        let below = SurfaceOrientations::for_viewpoint(Point2::new(20.0, -50.0), &scene);
        assert_eq!(
            below.get(junction.surface_before),
            below.get(junction.surface_after)
        );
        assert!(junction.is_blocking(&below));
    }

    #[test]
    fn v_junction_opposite_signs_does_not_block() {
        // Viewed from the side, level with the tip, both arms rise above the junction ray.
        let (scene, chain) = v_scene();
        let junction = scene.chain(chain).unwrap().junctions()[0];
        let side = SurfaceOrientations::for_viewpoint(Point2::new(60.0, 0.0), &scene);
        assert_ne!(
            side.get(junction.surface_before),
            side.get(junction.surface_after)
        );
        assert!(!junction.is_blocking(&side));
    }

    #[test]
    fn missing_orientation_defaults_to_blocking() {
        let (scene, chain) = v_scene();
        let junction = scene.chain(chain).unwrap().junctions()[0];
        assert!(junction.is_blocking(&SurfaceOrientations::empty(Point2::new(20.0, -50.0))));
    }

    #[test]
    fn collinear_viewpoint_is_blocking() {
        let (scene, chain) = v_scene();
        let junction = scene.chain(chain).unwrap().junctions()[0];
        // On the extension of the first arm.
        let on_line = SurfaceOrientations::for_viewpoint(Point2::new(0.0, 20.0), &scene);
        assert_eq!(on_line.get(junction.surface_before), Some(Orientation::Collinear));
        assert!(junction.is_blocking(&on_line));
    }
}
