//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `FowError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors produced by `fow-core`.
#[derive(Debug, Error)]
pub enum FowError {
    #[error("invalid grid {width}x{height}: {reason}")]
    InvalidGrid {
        width:  u32,
        height: u32,
        reason: &'static str,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `fow-core`.
pub type FowResult<T> = Result<T, FowError>;
