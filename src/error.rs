use thiserror::Error;

use crate::reflection_cache::PointId;
use crate::scene::{ChainId, SurfaceId};

/// Top-level error type for the ricochet aiming core.
#[derive(Debug, Error)]
pub enum RicochetError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors raised when a handle does not resolve against the scene or cache it was used with.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("surface not found: {0:?}")]
    SurfaceNotFound(SurfaceId),

    #[error("chain not found: {0:?}")]
    ChainNotFound(ChainId),

    #[error("point is not owned by this reflection cache: {0:?}")]
    UnknownPoint(PointId),

    #[error("chain has {segments} segments but {kinds} surface kinds were given")]
    KindCountMismatch { segments: usize, kinds: usize },
}

/// Errors related to operations invoked with invalid preconditions.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`RicochetError`].
pub type Result<T> = std::result::Result<T, RicochetError>;
