//! Ray-casting error type.

use thiserror::Error;

/// Errors produced by `fow-raycast`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RaycastError {
    #[error("view radius must be at least 1, got {0}")]
    InvalidRadius(u32),

    #[error("view radius {radius} exceeds the supported maximum {max}")]
    RadiusTooLarge { radius: u32, max: u32 },

    #[error("profile registry is full ({0} profiles)")]
    TooManyProfiles(usize),

    #[error("view needs {needed} tiles but the result slot holds {capacity}")]
    CapacityExceeded { needed: usize, capacity: usize },
}

pub type RaycastResult<T> = Result<T, RaycastError>;
