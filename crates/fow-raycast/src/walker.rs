//! Per-agent ray walking with a see-through budget, and packing of the
//! resulting view into a fixed-capacity slot.

use fow_core::{GridDims, TileCoord, TileIndex};

use crate::{ObstructionSnapshot, RaycastError, RaycastResult, ViewProfile, walk_line};

// ── ViewWindow ────────────────────────────────────────────────────────────────

/// Visited-tile marks for one agent, limited to the `(2r + 1)²` square
/// around its tile.
///
/// Every boundary point lies within `r` tiles of the origin on each axis, and
/// clamping only pulls targets towards the origin, so no ray leaves the
/// window.
#[derive(Clone, Debug)]
pub struct ViewWindow {
    center: TileCoord,
    radius: i32,
    side:   usize,
    marks:  Vec<bool>,
}

impl ViewWindow {
    pub fn new(center: TileCoord, radius: u32) -> Self {
        let side = 2 * radius as usize + 1;
        Self {
            center,
            radius: radius as i32,
            side,
            marks: vec![false; side * side],
        }
    }

    #[inline]
    fn slot(&self, coord: TileCoord) -> Option<usize> {
        let lx = coord.x - self.center.x + self.radius;
        let ly = coord.y - self.center.y + self.radius;
        if lx < 0 || ly < 0 || lx as usize >= self.side || ly as usize >= self.side {
            return None;
        }
        Some(ly as usize * self.side + lx as usize)
    }

    /// Mark `coord` visible.  Coordinates outside the window are ignored.
    #[inline]
    pub fn mark(&mut self, coord: TileCoord) {
        match self.slot(coord) {
            Some(i) => self.marks[i] = true,
            None => debug_assert!(false, "ray left its view window at {coord}"),
        }
    }

    #[inline]
    pub fn is_marked(&self, coord: TileCoord) -> bool {
        self.slot(coord).is_some_and(|i| self.marks[i])
    }

    /// Marked tiles inside both the grid and the radius disk, in ascending
    /// tile-index order.
    pub fn tiles(&self, dims: GridDims) -> impl Iterator<Item = TileIndex> + '_ {
        let r = self.radius;
        let r_sq = (r as i64) * (r as i64);
        let c = self.center;
        (-r..=r).flat_map(move |dy| {
            (-r..=r).filter_map(move |dx| {
                let coord = c.offset(dx, dy);
                let inside = dims.contains(coord)
                    && (dx as i64 * dx as i64 + dy as i64 * dy as i64) <= r_sq
                    && self.is_marked(coord);
                inside.then(|| dims.index_of(coord))
            })
        })
    }

    /// Write [`tiles`](Self::tiles) into `slot`, padding the rest with
    /// `TileIndex::INVALID`.  Returns the number of tiles written.
    ///
    /// If the view does not fit, nothing past the slot is touched and
    /// `CapacityExceeded` reports the full count.
    pub fn pack(&self, dims: GridDims, slot: &mut [TileIndex]) -> RaycastResult<usize> {
        let mut count = 0;
        for tile in self.tiles(dims) {
            if let Some(cell) = slot.get_mut(count) {
                *cell = tile;
            }
            count += 1;
        }
        if count > slot.len() {
            return Err(RaycastError::CapacityExceeded { needed: count, capacity: slot.len() });
        }
        slot[count..].fill(TileIndex::INVALID);
        Ok(count)
    }
}

// ── RayWalker ─────────────────────────────────────────────────────────────────

/// Traces a profile's rays over an [`ObstructionSnapshot`].
///
/// `RayWalker` is `Copy` and holds only shared references, so one instance
/// can be handed to every worker of a batch.
#[derive(Copy, Clone, Debug)]
pub struct RayWalker<'a> {
    profile:  &'a ViewProfile,
    snapshot: &'a ObstructionSnapshot,
}

impl<'a> RayWalker<'a> {
    pub fn new(profile: &'a ViewProfile, snapshot: &'a ObstructionSnapshot) -> Self {
        Self { profile, snapshot }
    }

    #[inline]
    pub fn profile(&self) -> &'a ViewProfile {
        self.profile
    }

    /// Trace a single ray from `origin` to `target`, marking every tile it
    /// enters until an obstruction stops it.
    ///
    /// An obstructing tile is always marked: the obstruction itself is seen.
    /// While fewer than `see_through` obstructions have been passed, the ray
    /// continues past it.  Clear tiles never stop a ray and never refund
    /// budget.
    pub fn trace(&self, origin: TileCoord, target: TileCoord, window: &mut ViewWindow) {
        let budget = self.profile.see_through();
        let mut passed = 0u32;
        walk_line(origin, target, |tile| {
            window.mark(tile);
            if !self.snapshot.obstructs(tile) {
                return true;
            }
            if passed < budget {
                passed += 1;
                true
            } else {
                false
            }
        });
    }

    /// Both passes for one boundary delta: to the clamped boundary point,
    /// then to its interior neighbour.
    pub fn trace_boundary(&self, origin: TileCoord, delta: (i32, i32), window: &mut ViewWindow) {
        let dims = self.snapshot.dims();
        let edge = dims.clamp(origin.offset(delta.0, delta.1));
        if edge == origin {
            return;
        }
        self.trace(origin, edge, window);

        let inner = dims.clamp(interior_neighbour(origin, edge));
        if inner != origin {
            self.trace(origin, inner, window);
        }
    }

    /// Marks for the full view from `origin`, which must be inside the grid.
    /// The origin tile itself is always visible.
    pub fn view_window(&self, origin: TileCoord) -> ViewWindow {
        let mut window = ViewWindow::new(origin, self.profile.radius());
        window.mark(origin);
        for &delta in self.profile.ray_deltas() {
            self.trace_boundary(origin, delta, &mut window);
        }
        window
    }

    /// Compute the view from `origin` and pack it into `slot`.
    pub fn fill_slot(&self, origin: TileCoord, slot: &mut [TileIndex]) -> RaycastResult<usize> {
        self.view_window(origin).pack(self.snapshot.dims(), slot)
    }

    /// Compute the view from `origin` as an owned, ascending tile list.
    pub fn visible_tiles(&self, origin: TileCoord) -> Vec<TileIndex> {
        self.view_window(origin).tiles(self.snapshot.dims()).collect()
    }
}

/// One step back from `edge` towards `origin` along the axis with the
/// larger absolute delta.  Ties retreat along x.
fn interior_neighbour(origin: TileCoord, edge: TileCoord) -> TileCoord {
    let dx = edge.x - origin.x;
    let dy = edge.y - origin.y;
    if dx * dx >= dy * dy {
        TileCoord::new(if dx > 0 { edge.x - 1 } else { edge.x + 1 }, edge.y)
    } else {
        TileCoord::new(edge.x, if dy > 0 { edge.y - 1 } else { edge.y + 1 })
    }
}
