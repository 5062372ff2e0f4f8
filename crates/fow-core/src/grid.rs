//! Tile-grid geometry: coordinates, dimensions, clamping and indexing.
//!
//! # Index layout
//!
//! Tiles are addressed row-major:
//!
//! ```text
//! index = y * width + x
//! ```
//!
//! Every conversion from a coordinate to a [`TileIndex`] goes through
//! [`GridDims::clamp`] first, so no negative or out-of-range index is ever
//! produced.  Coordinates are signed so that driver input lying outside the
//! grid can be represented and clamped instead of wrapping.

use std::fmt;

use crate::{FowError, FowResult, TileIndex};

// ── TileCoord ─────────────────────────────────────────────────────────────────

/// A tile position.  May lie outside the grid until clamped.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Coordinate shifted by `(dx, dy)`.  No clamping.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Squared Euclidean distance in tiles.
    #[inline]
    pub fn distance_sq(self, other: TileCoord) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for TileCoord {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

// ── GridDims ──────────────────────────────────────────────────────────────────

/// Longest supported grid side.  Ray tracing walks absolute coordinates in
/// `f32`, which represents every integer exactly only up to 2^24.
pub const MAX_SIDE: u32 = 1 << 24;

/// Width and height of the tile grid.
///
/// Construct via [`GridDims::new`], which guarantees both sides are non-zero
/// and that the tile count leaves `u32::MAX` free for the
/// [`TileIndex::INVALID`] sentinel.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridDims {
    width:  u32,
    height: u32,
}

impl GridDims {
    /// Validate and construct grid dimensions.
    pub fn new(width: u32, height: u32) -> FowResult<Self> {
        if width == 0 || height == 0 {
            return Err(FowError::InvalidGrid { width, height, reason: "zero-sized side" });
        }
        if width > MAX_SIDE || height > MAX_SIDE {
            return Err(FowError::InvalidGrid { width, height, reason: "side exceeds 2^24 tiles" });
        }
        if (width as u64) * (height as u64) >= u32::MAX as u64 {
            return Err(FowError::InvalidGrid { width, height, reason: "tile count must stay below u32::MAX" });
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn width(self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(self) -> u32 {
        self.height
    }

    /// Total number of tiles (`width * height`).
    #[inline]
    pub fn tile_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// `true` if `coord` lies inside the grid.
    #[inline]
    pub fn contains(self, coord: TileCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as u32) < self.width
            && (coord.y as u32) < self.height
    }

    /// Clamp `x` into `[0, width)`.
    #[inline]
    pub fn clamp_x(self, x: i32) -> i32 {
        x.clamp(0, self.width as i32 - 1)
    }

    /// Clamp `y` into `[0, height)`.
    #[inline]
    pub fn clamp_y(self, y: i32) -> i32 {
        y.clamp(0, self.height as i32 - 1)
    }

    /// Nearest in-grid coordinate to `coord`.
    #[inline]
    pub fn clamp(self, coord: TileCoord) -> TileCoord {
        TileCoord::new(self.clamp_x(coord.x), self.clamp_y(coord.y))
    }

    /// Row-major index of `coord` after clamping it into the grid.
    #[inline]
    pub fn index_of(self, coord: TileCoord) -> TileIndex {
        let c = self.clamp(coord);
        TileIndex(c.y as u32 * self.width + c.x as u32)
    }

    /// Inverse of [`index_of`](Self::index_of).
    ///
    /// Returns `None` for `TileIndex::INVALID` and any index past the end of
    /// the grid.
    #[inline]
    pub fn coord_of(self, index: TileIndex) -> Option<TileCoord> {
        if index.index() >= self.tile_count() {
            return None;
        }
        Some(TileCoord::new(
            (index.0 % self.width) as i32,
            (index.0 / self.width) as i32,
        ))
    }
}

impl fmt::Display for GridDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
