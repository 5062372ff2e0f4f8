//! View profiles: precomputed boundary rays for one (radius, see-through)
//! pair.
//!
//! # Boundary generation
//!
//! One octant is scanned midpoint-circle style, starting at `(0, r)`:
//!
//! ```text
//! while dy >= dx:
//!     if dx² + dy² <= (r + 0.25)²:  emit (dx, dy); dx += 1
//!     else:                         dy -= 1
//! ```
//!
//! The other seven octants are sign/axis-swap reflections of the first,
//! emitted block by block in a fixed order.  Points on the axes and diagonals
//! are produced by more than one reflection; only their first occurrence is
//! kept.  The result has O(r) rays, not O(r²) tiles.

use std::f64::consts::PI;

use fow_core::ProfileId;
use rustc_hash::FxHashSet;

use crate::{RaycastError, RaycastResult};

/// Slack added to the radius when admitting boundary points, so the scan
/// keeps points that round onto the circle.
pub const RAY_TOLERANCE: f32 = 0.25;

/// Largest accepted view radius.  With the default slot padding the
/// `⌈π·r²⌉ + padding` capacity bounds the disk's lattice-point count for
/// every radius up to here.
pub const MAX_VIEW_RADIUS: u32 = 1024;

// ── ViewProfile ───────────────────────────────────────────────────────────────

/// Immutable geometry shared by every agent with the same view radius and
/// see-through budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewProfile {
    radius:      u32,
    see_through: u32,
    ray_deltas:  Box<[(i32, i32)]>,
    capacity:    usize,
}

impl ViewProfile {
    /// Build the profile for `radius` tiles and a see-through budget.
    ///
    /// `slot_padding` is added to `⌈π·r²⌉` to size each agent's result slot.
    pub fn new(radius: u32, see_through: u32, slot_padding: usize) -> RaycastResult<Self> {
        if radius == 0 {
            return Err(RaycastError::InvalidRadius(radius));
        }
        if radius > MAX_VIEW_RADIUS {
            return Err(RaycastError::RadiusTooLarge { radius, max: MAX_VIEW_RADIUS });
        }

        let ray_deltas = boundary_deltas(radius).into_boxed_slice();
        let capacity = capacity_for(radius, slot_padding);
        log::debug!(
            "view profile r={radius} see_through={see_through}: {} rays, slot capacity {capacity}",
            ray_deltas.len(),
        );

        Ok(Self { radius, see_through, ray_deltas, capacity })
    }

    #[inline]
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Obstructions a single ray may pass before the next one stops it.
    #[inline]
    pub fn see_through(&self) -> u32 {
        self.see_through
    }

    /// Boundary points relative to the agent's tile.
    #[inline]
    pub fn ray_deltas(&self) -> &[(i32, i32)] {
        &self.ray_deltas
    }

    /// Size of one agent's packed result slot.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// `⌈π·r²⌉ + padding`.
pub fn capacity_for(radius: u32, padding: usize) -> usize {
    let r = radius as f64;
    (PI * r * r).ceil() as usize + padding
}

/// First-octant boundary points, from `(0, r)` towards the diagonal.
fn octant(radius: u32) -> Vec<(i32, i32)> {
    let r = radius as i32;
    let limit = (radius as f32 + RAY_TOLERANCE) * (radius as f32 + RAY_TOLERANCE);

    let mut points = Vec::with_capacity(radius as usize);
    let (mut dx, mut dy) = (0i32, r);
    while dy >= dx {
        if ((dx * dx + dy * dy) as f32) <= limit {
            points.push((dx, dy));
            dx += 1;
        } else {
            dy -= 1;
        }
    }
    points
}

/// All boundary points of a radius, in octant block order, without repeats.
pub fn boundary_deltas(radius: u32) -> Vec<(i32, i32)> {
    let first = octant(radius);

    let reflections: [fn((i32, i32)) -> (i32, i32); 8] = [
        |(x, y)| (x, y),
        |(x, y)| (y, x),
        |(x, y)| (-x, y),
        |(x, y)| (-y, x),
        |(x, y)| (-y, -x),
        |(x, y)| (y, -x),
        |(x, y)| (-x, -y),
        |(x, y)| (x, -y),
    ];

    let mut seen = FxHashSet::default();
    let mut out = Vec::with_capacity(first.len() * 8);
    for reflect in reflections {
        for &p in &first {
            let q = reflect(p);
            if seen.insert(q) {
                out.push(q);
            }
        }
    }
    out
}

// ── ProfileSet ────────────────────────────────────────────────────────────────

/// Registry of view profiles, indexed by [`ProfileId`] in insertion order.
///
/// Inserting a (radius, see-through) pair that already exists returns the
/// existing id, so each distinct combination is built exactly once.
#[derive(Clone, Debug, Default)]
pub struct ProfileSet {
    profiles: Vec<ViewProfile>,
}

impl ProfileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile, or return the id of an identical one.
    pub fn insert(
        &mut self,
        radius:       u32,
        see_through:  u32,
        slot_padding: usize,
    ) -> RaycastResult<ProfileId> {
        if let Some(pos) = self
            .profiles
            .iter()
            .position(|p| p.radius == radius && p.see_through == see_through)
        {
            return Ok(ProfileId(pos as u16));
        }

        let id = ProfileId::from_index(self.profiles.len())
            .ok_or(RaycastError::TooManyProfiles(self.profiles.len()))?;
        let profile = ViewProfile::new(radius, see_through, slot_padding)?;
        self.profiles.push(profile);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, id: ProfileId) -> Option<&ViewProfile> {
        self.profiles.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// All profiles with their ids, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ProfileId, &ViewProfile)> + '_ {
        self.profiles
            .iter()
            .enumerate()
            .map(|(i, p)| (ProfileId(i as u16), p))
    }
}
