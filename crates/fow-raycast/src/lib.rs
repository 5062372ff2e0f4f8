//! `fow-raycast` — per-agent visibility by discretized ray casting.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`profile`]  | `ViewProfile` (boundary ray deltas, slot capacity), `ProfileSet` |
//! | [`dda`]      | `walk_line` — the octant-agnostic DDA primitive              |
//! | [`snapshot`] | `ObstructionSnapshot` — bounded read-only copy of the grid   |
//! | [`walker`]   | `RayWalker`, `ViewWindow` — see-through budget and packing   |
//! | [`error`]    | `RaycastError`, `RaycastResult<T>`                           |
//!
//! # Pipeline for one agent
//!
//! ```text
//! for (dx, dy) in profile.ray_deltas():
//!     trace origin → clamp(origin + (dx, dy))              // boundary pass
//!     trace origin → clamp(one step back along major axis) // interior pass
//! pack marked tiles with dx² + dy² ≤ r² into the agent's slot
//! ```
//!
//! The interior pass fills the gaps a single straight ray per boundary point
//! leaves at some angles.

pub mod dda;
pub mod error;
pub mod profile;
pub mod snapshot;
pub mod walker;

#[cfg(test)]
mod tests;

pub use dda::{round_tile, walk_line};
pub use error::{RaycastError, RaycastResult};
pub use profile::{MAX_VIEW_RADIUS, ProfileSet, RAY_TOLERANCE, ViewProfile};
pub use snapshot::ObstructionSnapshot;
pub use walker::{RayWalker, ViewWindow};
