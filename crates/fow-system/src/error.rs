use fow_core::{AgentId, FowError, GridDims, ProfileId};
use fow_raycast::RaycastError;
use fow_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("unknown view profile {0}")]
    UnknownProfile(ProfileId),

    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),

    #[error("vision system configuration error: {0}")]
    Config(String),

    #[error("grid is {got} but the vision system was built for {expected}")]
    GridMismatch { expected: GridDims, got: GridDims },

    #[error("raycast error: {0}")]
    Raycast(#[from] RaycastError),

    #[error("spatial partition error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("core error: {0}")]
    Core(#[from] FowError),
}

pub type VisionResult<T> = Result<T, VisionError>;
