//! Terrain and occupancy classes, and the read-only grid interface the
//! visibility engine consumes.
//!
//! The host game owns its terrain storage.  The engine only needs O(1)
//! per-tile lookups through [`GridSnapshot`]; [`TileGrid`] is a plain
//! `Vec`-backed implementation used by tests and demos.

use crate::{FowResult, GridDims, TileCoord, TileIndex};

// ── Terrain / Occupancy ───────────────────────────────────────────────────────

/// Static ground type of a tile.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    #[default]
    Open,
    Wall,
}

/// What currently stands on a tile.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Occupancy {
    #[default]
    None,
    /// Harvestable resource (tree, ore vein…).  Blocks sight.
    Resource,
    /// Player or neutral structure.  Blocks sight.
    Building,
    /// Mobile unit.  Does not block sight.
    Unit,
}

impl Terrain {
    pub fn as_str(self) -> &'static str {
        match self {
            Terrain::Open => "open",
            Terrain::Wall => "wall",
        }
    }
}

impl Occupancy {
    pub fn as_str(self) -> &'static str {
        match self {
            Occupancy::None     => "none",
            Occupancy::Resource => "resource",
            Occupancy::Building => "building",
            Occupancy::Unit     => "unit",
        }
    }
}

impl std::fmt::Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Occupancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `true` if a tile with this terrain and occupancy blocks line of sight.
#[inline]
pub fn obstructs_view(terrain: Terrain, occupancy: Occupancy) -> bool {
    terrain == Terrain::Wall || matches!(occupancy, Occupancy::Resource | Occupancy::Building)
}

// ── GridSnapshot ──────────────────────────────────────────────────────────────

/// Read-only access to the host grid.
///
/// Implementations must answer every lookup in O(1).  The engine only calls
/// them with in-range indices.  It never mutates the grid, and it reads it
/// only while a cycle holds the shared borrow passed to `run_cycle`.
///
/// The trait is deliberately not `Sync`-bound: the engine copies what it
/// needs into its own snapshot before fanning out to worker threads.
pub trait GridSnapshot {
    fn dims(&self) -> GridDims;

    fn terrain(&self, index: TileIndex) -> Terrain;

    fn occupancy(&self, index: TileIndex) -> Occupancy;

    /// Combined obstruction test.  Override if the host can answer it faster
    /// than two separate lookups.
    #[inline]
    fn obstructs(&self, index: TileIndex) -> bool {
        obstructs_view(self.terrain(index), self.occupancy(index))
    }
}

// ── TileGrid ──────────────────────────────────────────────────────────────────

/// Dense `Vec`-backed grid.  All tiles start `Open` and unoccupied.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileGrid {
    dims:      GridDims,
    terrain:   Vec<Terrain>,
    occupancy: Vec<Occupancy>,
}

impl TileGrid {
    /// An all-open grid of `width × height` tiles.
    pub fn new(width: u32, height: u32) -> FowResult<Self> {
        let dims = GridDims::new(width, height)?;
        Ok(Self::with_dims(dims))
    }

    pub fn with_dims(dims: GridDims) -> Self {
        Self {
            dims,
            terrain:   vec![Terrain::Open; dims.tile_count()],
            occupancy: vec![Occupancy::None; dims.tile_count()],
        }
    }

    /// Set the terrain at `coord`.  Out-of-grid coordinates are ignored.
    pub fn set_terrain(&mut self, coord: TileCoord, terrain: Terrain) {
        if self.dims.contains(coord) {
            self.terrain[self.dims.index_of(coord).index()] = terrain;
        }
    }

    /// Set the occupancy at `coord`.  Out-of-grid coordinates are ignored.
    pub fn set_occupancy(&mut self, coord: TileCoord, occupancy: Occupancy) {
        if self.dims.contains(coord) {
            self.occupancy[self.dims.index_of(coord).index()] = occupancy;
        }
    }

    /// Shorthand for `set_terrain(coord, Terrain::Wall)`.
    pub fn wall(&mut self, coord: TileCoord) {
        self.set_terrain(coord, Terrain::Wall);
    }
}

impl GridSnapshot for TileGrid {
    #[inline]
    fn dims(&self) -> GridDims {
        self.dims
    }

    #[inline]
    fn terrain(&self, index: TileIndex) -> Terrain {
        self.terrain[index.index()]
    }

    #[inline]
    fn occupancy(&self, index: TileIndex) -> Occupancy {
        self.occupancy[index.index()]
    }
}
