//! Fluent builder for constructing a [`VisionSystem`].

use fow_core::{FowConfig, GridDims};
use fow_raycast::ProfileSet;
use fow_spatial::SpatialPartition;

use crate::workers::Workers;
use crate::{VisionResult, VisionSystem};

/// Fluent builder for [`VisionSystem<P>`].
///
/// # Required inputs
///
/// - [`GridDims`] — the grid every `run_cycle` call must match
/// - `P: SpatialPartition` — the affected-agent collaborator (e.g.
///   [`fow_spatial::ZoneGrid`])
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                 |
/// |--------------------|-------------------------|
/// | `.config(c)`       | `FowConfig::default()`  |
/// | `.profile(r, k)`   | no profiles             |
///
/// Profiles declared here get ids `0, 1, …` in call order.  Declaring the
/// same `(radius, see_through)` pair twice yields a single profile.
///
/// # Example
///
/// ```rust,ignore
/// let dims = GridDims::new(64, 64)?;
/// let mut vision = VisionSystemBuilder::new(dims, ZoneGrid::new(dims, 8, 8)?)
///     .profile(5, 0)
///     .profile(7, 1)
///     .build()?;
/// let scout = vision.register_agent(ProfileId(1), TileCoord::new(3, 4))?;
/// let report = vision.run_cycle(&grid)?;
/// ```
pub struct VisionSystemBuilder<P: SpatialPartition> {
    dims:      GridDims,
    partition: P,
    config:    FowConfig,
    profiles:  Vec<(u32, u32)>,
}

impl<P: SpatialPartition> VisionSystemBuilder<P> {
    pub fn new(dims: GridDims, partition: P) -> Self {
        Self {
            dims,
            partition,
            config:   FowConfig::default(),
            profiles: Vec::new(),
        }
    }

    pub fn config(mut self, config: FowConfig) -> Self {
        self.config = config;
        self
    }

    /// Declare a view profile with `radius` tiles and a see-through budget.
    pub fn profile(mut self, radius: u32, see_through: u32) -> Self {
        self.profiles.push((radius, see_through));
        self
    }

    /// Validate the configuration, build every profile and return a system
    /// with an all-hidden buffer and no agents.
    pub fn build(self) -> VisionResult<VisionSystem<P>> {
        self.config.validate()?;

        let mut profiles = ProfileSet::new();
        for (radius, see_through) in self.profiles {
            profiles.insert(radius, see_through, self.config.slot_padding)?;
        }
        let workers = Workers::new(self.config.num_threads)?;

        log::debug!(
            "vision system {}: {} profiles, {} worker threads",
            self.dims,
            profiles.len(),
            workers.thread_count(),
        );

        Ok(VisionSystem::from_parts(self.dims, self.config, profiles, self.partition, workers))
    }
}
