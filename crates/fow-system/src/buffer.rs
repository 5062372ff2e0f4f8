//! Shared coverage buffer and the two-pass merge.
//!
//! # Merge discipline
//!
//! ```text
//! pass 1: for view in previous views: for tile in view: cell[tile] = hidden
//!         ── join ──
//! pass 2: for view in current views:  for tile in view: cell[tile] = visible
//! ```
//!
//! Each pass may run across workers.  Every write is a single relaxed store
//! to one cell, and all writes of a pass store the same value, so the only
//! ordering that matters is pass 1 completing before pass 2 starts.  The
//! join at the end of pass 1 provides it.

use std::sync::atomic::{AtomicBool, Ordering};

use fow_core::{GridDims, TileCoord, TileIndex};

use crate::ViewSet;

/// Visibility state of one tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Coverage {
    Hidden,
    Visible,
}

impl Coverage {
    #[inline]
    pub fn is_visible(self) -> bool {
        self == Coverage::Visible
    }
}

impl From<bool> for Coverage {
    fn from(visible: bool) -> Self {
        if visible { Coverage::Visible } else { Coverage::Hidden }
    }
}

/// One coverage cell per tile, row-major.
#[derive(Debug)]
pub struct VisibilityBuffer {
    dims:  GridDims,
    cells: Vec<AtomicBool>,
}

impl VisibilityBuffer {
    /// All tiles hidden.
    pub fn new(dims: GridDims) -> Self {
        let cells = (0..dims.tile_count()).map(|_| AtomicBool::new(false)).collect();
        Self { dims, cells }
    }

    #[inline]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Coverage of `tile`.  Indices outside the grid report `Hidden`.
    #[inline]
    pub fn coverage_of(&self, tile: TileIndex) -> Coverage {
        self.cells
            .get(tile.index())
            .map_or(Coverage::Hidden, |c| c.load(Ordering::Relaxed).into())
    }

    /// `true` if `coord` is inside the grid and visible.
    pub fn is_visible(&self, coord: TileCoord) -> bool {
        self.dims.contains(coord) && self.coverage_of(self.dims.index_of(coord)).is_visible()
    }

    pub fn visible_count(&self) -> usize {
        self.cells.iter().filter(|c| c.load(Ordering::Relaxed)).count()
    }

    /// Row-major copy of the buffer, `true` for visible tiles.
    pub fn to_mask(&self) -> Vec<bool> {
        self.cells.iter().map(|c| c.load(Ordering::Relaxed)).collect()
    }

    /// Hide every tile of `hide`, then show every tile of `show`.
    ///
    /// Returns the tiles whose coverage differs from before the merge, in
    /// ascending order.
    pub(crate) fn merge(&mut self, hide: &[ViewSet], show: &[ViewSet]) -> Vec<TileIndex> {
        let mut touched: Vec<TileIndex> = hide
            .iter()
            .chain(show)
            .flat_map(|view| view.iter())
            .collect();
        touched.sort_unstable();
        touched.dedup();
        let before: Vec<Coverage> = touched.iter().map(|&t| self.coverage_of(t)).collect();

        paint(&self.cells, hide, false);
        paint(&self.cells, show, true);

        touched
            .into_iter()
            .zip(before)
            .filter(|&(tile, was)| self.coverage_of(tile) != was)
            .map(|(tile, _)| tile)
            .collect()
    }
}

/// Store `value` into every cell named by `views`.  Returns once all writes
/// are done.
fn paint(cells: &[AtomicBool], views: &[ViewSet], value: bool) {
    let store = |view: &ViewSet| {
        for tile in view.iter() {
            if let Some(cell) = cells.get(tile.index()) {
                cell.store(value, Ordering::Relaxed);
            }
        }
    };

    #[cfg(not(feature = "parallel"))]
    {
        views.iter().for_each(store);
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        views.par_iter().for_each(store);
    }
}
