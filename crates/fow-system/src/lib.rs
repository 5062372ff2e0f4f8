//! `fow-system` — the driver-facing fog-of-war engine.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`agents`]  | `ViewSet`, `AgentVisibility`, `AgentTable`                      |
//! | [`batch`]   | `VisibilityBatch` — per-profile grouping, snapshot, fan-out     |
//! | [`buffer`]  | `VisibilityBuffer`, `Coverage` — two-pass merge                 |
//! | [`system`]  | `VisionSystem` — registration, dirty tracking, `run_cycle`      |
//! | [`builder`] | `VisionSystemBuilder`                                           |
//! | [`report`]  | `CycleReport`                                                   |
//! | [`error`]   | `VisionError`, `VisionResult<T>`                                |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                       |
//! |------------|--------------------------------------------------------------|
//! | `parallel` | (default) per-agent ray casting and merge passes on Rayon.   |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public value types.     |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fow_core::{GridDims, ProfileId, TileCoord, TileGrid};
//! use fow_spatial::ZoneGrid;
//! use fow_system::VisionSystemBuilder;
//!
//! let grid = TileGrid::new(64, 64)?;
//! let dims = grid.dims();
//! let mut vision = VisionSystemBuilder::new(dims, ZoneGrid::new(dims, 8, 8)?)
//!     .profile(5, 0)
//!     .build()?;
//! let agent = vision.register_agent(ProfileId(0), TileCoord::new(10, 10))?;
//! vision.run_cycle(&grid)?;
//! vision.mark_dirty(agent, TileCoord::new(11, 10))?;
//! let report = vision.run_cycle(&grid)?;
//! ```

pub mod agents;
pub mod batch;
pub mod buffer;
pub mod builder;
pub mod error;
pub mod report;
pub mod system;

mod workers;


pub use agents::{AgentTable, AgentVisibility, ViewSet};
pub use batch::{BatchOutcome, BatchRequest, ProfileGroup, VisibilityBatch};
pub use buffer::{Coverage, VisibilityBuffer};
pub use builder::VisionSystemBuilder;
pub use error::{VisionError, VisionResult};
pub use report::CycleReport;
pub use system::VisionSystem;
