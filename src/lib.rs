//! Ricochet aiming core: mirror-image trajectory planning, physical ray tracing and
//! visibility polygons for a 2D scene of reflective and opaque line-segment surfaces.

pub mod aim;
pub mod error;
pub mod geometry;
pub mod math;
pub mod reflection_cache;
pub mod scene;
pub mod trajectory;
pub mod visibility;

pub use aim::{is_cursor_lit, Aim, AimResult};
pub use error::{OperationError, RicochetError, SceneError, Result};
pub use reflection_cache::{CacheStats, PointId, ReflectionCache};
pub use scene::{Scene, Surface, SurfaceChain, SurfaceId, SurfaceKind};
