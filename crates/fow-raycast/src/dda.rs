//! Digital differential analyzer line walk.
//!
//! The walk advances one whole tile per step along the major axis and
//! accumulates the minor axis in `f32`:
//!
//! | Case                  | Per step                                  |
//! |-----------------------|-------------------------------------------|
//! | vertical (`dx == 0`)  | `y += sign(dy)`                           |
//! | steep (`|dy/dx| > 1`) | `y += sign(dy)`, `x += sign(dx) / slope`  |
//! | otherwise             | `x += sign(dx)`, `y += sign(dy) * slope`  |
//!
//! Each step is rounded to a tile with [`round_tile`] and handed to the
//! visitor.  The start tile is never visited.  The same code path serves all
//! eight octants; only the signs differ.
//!
//! The arithmetic (single precision, additive accumulation, 0.4 rounding
//! threshold) decides which tiles a ray touches near a rounding boundary and
//! is kept exactly as is.

use fow_core::TileCoord;

/// Round a non-negative tile coordinate: truncate, then add one if the
/// remainder is strictly above `0.4`.
#[inline]
pub fn round_tile(v: f32) -> i32 {
    let t = v as i32;
    if v - t as f32 > 0.4_f32 {
        t + 1
    } else {
        t
    }
}

/// Step direction for a delta.  Zero counts as positive.
#[inline]
fn step_sign(d: i32) -> i32 {
    if d < 0 { -1 } else { 1 }
}

/// Walk the discrete line from `from` (exclusive) to `to` (inclusive).
///
/// `visit` is called with every tile the line enters and returns `false` to
/// stop the walk early.  Coordinates are assumed to be inside the grid (the
/// caller clamps `to`).  Every intermediate tile then lies inside the
/// bounding box of the two endpoints.
pub fn walk_line<F>(from: TileCoord, to: TileCoord, mut visit: F)
where
    F: FnMut(TileCoord) -> bool,
{
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let sx = step_sign(dx);
    let sy = step_sign(dy);

    if dx == 0 {
        let mut y = from.y;
        for _ in 0..dy.abs() {
            y += sy;
            if !visit(TileCoord::new(from.x, y)) {
                return;
            }
        }
        return;
    }

    let slope = (dy as f32 / dx as f32).abs();
    let mut x = from.x as f32;
    let mut y = from.y as f32;

    if slope > 1.0 {
        let run = 1.0 / slope;
        for _ in 0..dy.abs() {
            x += run * sx as f32;
            y += sy as f32;
            if !visit(TileCoord::new(round_tile(x), round_tile(y))) {
                return;
            }
        }
    } else {
        for _ in 0..dx.abs() {
            x += sx as f32;
            y += slope * sy as f32;
            if !visit(TileCoord::new(round_tile(x), round_tile(y))) {
                return;
            }
        }
    }
}
