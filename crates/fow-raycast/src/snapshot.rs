//! Bounded, read-only copy of the obstruction layer.
//!
//! Before a batch fans out, the scheduler copies "does this tile block
//! sight" for the square `[x − reach, x + reach] × [y − reach, y + reach]`
//! around every agent in the batch, where `reach = radius + padding`.
//! Workers then read only this copy, so the host's [`GridSnapshot`] is
//! touched on one thread and never needs to be `Sync`.
//!
//! Cells outside every captured square stay `NOT_CAPTURED` and read as
//! obstructing.  Ray walks never leave the radius square around their origin,
//! so they never read one.
//!
//! A snapshot remembers which cells it captured, so [`reset`] costs the
//! captured area, not the grid size.  The scheduler keeps spent snapshots
//! and reuses them in later cycles.
//!
//! [`reset`]: ObstructionSnapshot::reset

use fow_core::{GridDims, GridSnapshot, TileCoord};

const NOT_CAPTURED: u8 = 0;
const CLEAR:        u8 = 1;
const BLOCKED:      u8 = 2;

/// Obstruction flags for the captured part of the grid.
#[derive(Clone, Debug)]
pub struct ObstructionSnapshot {
    dims:     GridDims,
    cells:    Vec<u8>,
    /// Indices of the cells copied since the last reset.
    captured: Vec<u32>,
}

impl ObstructionSnapshot {
    /// An empty snapshot with nothing captured.
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            cells: vec![NOT_CAPTURED; dims.tile_count()],
            captured: Vec::new(),
        }
    }

    /// Snapshot of the entire grid.
    pub fn full<G: GridSnapshot + ?Sized>(grid: &G) -> Self {
        let dims = grid.dims();
        let mut snap = Self::new(dims);
        let reach = dims.width().max(dims.height());
        snap.capture(grid, TileCoord::new(0, 0), reach);
        snap
    }

    /// Copy the square of half-width `reach` around `center` (clamped to the
    /// grid).  Cells captured by an earlier call are not read again.
    pub fn capture<G: GridSnapshot + ?Sized>(&mut self, grid: &G, center: TileCoord, reach: u32) {
        debug_assert_eq!(grid.dims(), self.dims, "snapshot and grid dimensions differ");
        let reach = reach.min(i32::MAX as u32 / 2) as i32;
        let lo = self.dims.clamp(center.offset(-reach, -reach));
        let hi = self.dims.clamp(center.offset(reach, reach));

        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                let idx = self.dims.index_of(TileCoord::new(x, y));
                let cell = &mut self.cells[idx.index()];
                if *cell == NOT_CAPTURED {
                    *cell = if grid.obstructs(idx) { BLOCKED } else { CLEAR };
                    self.captured.push(idx.0);
                }
            }
        }
    }

    #[inline]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Forget every captured cell.
    pub fn reset(&mut self) {
        for i in self.captured.drain(..) {
            self.cells[i as usize] = NOT_CAPTURED;
        }
    }

    /// `true` if the tile at `coord` blocks sight.  `coord` is clamped into
    /// the grid; a tile outside every captured square blocks.
    #[inline]
    pub fn obstructs(&self, coord: TileCoord) -> bool {
        self.cells[self.dims.index_of(coord).index()] != CLEAR
    }

    #[inline]
    pub fn is_captured(&self, coord: TileCoord) -> bool {
        self.dims.contains(coord) && self.cells[self.dims.index_of(coord).index()] != NOT_CAPTURED
    }

    /// Number of tiles copied from the host grid.
    pub fn captured_count(&self) -> usize {
        self.captured.len()
    }
}
