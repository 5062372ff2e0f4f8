//! Spatial-partition error type.

use thiserror::Error;

/// Errors produced by `fow-spatial`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpatialError {
    #[error("cannot split a {width}x{height} grid into {zones_x}x{zones_y} zones")]
    ZoneLayout {
        width:   u32,
        height:  u32,
        zones_x: u32,
        zones_y: u32,
    },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
