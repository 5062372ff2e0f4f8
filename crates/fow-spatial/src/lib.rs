//! `fow-spatial` — which agents must be re-merged when a neighbour's view
//! changes.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`partition`] | `SpatialPartition` trait — the affected-agent collaborator |
//! | [`zones`]     | `ZoneGrid` — built-in arithmetic zone partition            |
//! | [`expander`]  | `ImpactExpander` — dirty set → affected set                |
//! | [`error`]     | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Pluggability
//!
//! The vision driver talks to the partition only through
//! [`SpatialPartition`], so hosts that already track zone membership (trigger
//! volumes, a physics broad phase) can plug in their own index.  [`ZoneGrid`]
//! is a ready-made implementation for hosts that do not.

pub mod error;
pub mod expander;
pub mod partition;
pub mod zones;


pub use error::{SpatialError, SpatialResult};
pub use expander::ImpactExpander;
pub use partition::SpatialPartition;
pub use zones::ZoneGrid;
