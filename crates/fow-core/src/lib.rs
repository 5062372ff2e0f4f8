//! `fow-core` — foundational types for the fog-of-war visibility engine.
//!
//! This crate is a dependency of every other `fow-*` crate.  It has no
//! `fow-*` dependencies and a single required external one (`thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `AgentId`, `TileIndex`, `ProfileId`, `ZoneId`           |
//! | [`grid`]      | `TileCoord`, `GridDims` (clamping + row-major indexing) |
//! | [`terrain`]   | `Terrain`, `Occupancy`, `GridSnapshot`, `TileGrid`      |
//! | [`config`]    | `FowConfig`                                             |
//! | [`error`]     | `FowError`, `FowResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod config;
pub mod error;
pub mod grid;
pub mod ids;
pub mod terrain;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::FowConfig;
pub use error::{FowError, FowResult};
pub use grid::{GridDims, TileCoord};
pub use ids::{AgentId, ProfileId, TileIndex, ZoneId};
pub use terrain::{GridSnapshot, Occupancy, Terrain, TileGrid};
