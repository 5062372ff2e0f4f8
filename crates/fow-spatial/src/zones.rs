//! Arithmetic zone partition over the tile grid.
//!
//! The grid is cut into `zones_x × zones_y` rectangles of
//! `⌈width / zones_x⌉ × ⌈height / zones_y⌉` tiles.  Zone sizes round up, so
//! the last row/column of zones may be narrower and the effective zone count
//! may be smaller than requested.  Zone ids are row-major.
//!
//! An agent belongs to every zone overlapped by the square of half-width
//! `reach` around its tile, clamped to the grid.  With `reach` set to the
//! agent's view radius, two agents whose views can share a tile always share
//! at least one zone.

use fow_core::{AgentId, GridDims, TileCoord, ZoneId};
use rustc_hash::FxHashMap;

use crate::{SpatialError, SpatialPartition, SpatialResult};

/// Built-in [`SpatialPartition`] computing membership from tile positions.
#[derive(Clone, Debug)]
pub struct ZoneGrid {
    dims:        GridDims,
    zone_width:  u32,
    zone_height: u32,
    zones_x:     u32,
    zones_y:     u32,

    /// Agents of each zone, indexed by zone id.
    members:     Vec<Vec<AgentId>>,

    /// Zones of each placed agent, ascending.
    agent_zones: FxHashMap<AgentId, Vec<ZoneId>>,
}

impl ZoneGrid {
    /// Split `dims` into (at most) `zones_x × zones_y` zones.
    ///
    /// Fails if either count is zero or exceeds the matching grid side.
    pub fn new(dims: GridDims, zones_x: u32, zones_y: u32) -> SpatialResult<Self> {
        if zones_x == 0 || zones_y == 0 || zones_x > dims.width() || zones_y > dims.height() {
            return Err(SpatialError::ZoneLayout {
                width: dims.width(),
                height: dims.height(),
                zones_x,
                zones_y,
            });
        }

        let zone_width = dims.width().div_ceil(zones_x);
        let zone_height = dims.height().div_ceil(zones_y);
        let zones_x = dims.width().div_ceil(zone_width);
        let zones_y = dims.height().div_ceil(zone_height);

        log::debug!(
            "zone grid {dims}: {zones_x}x{zones_y} zones of {zone_width}x{zone_height} tiles",
        );

        Ok(Self {
            dims,
            zone_width,
            zone_height,
            zones_x,
            zones_y,
            members: vec![Vec::new(); (zones_x * zones_y) as usize],
            agent_zones: FxHashMap::default(),
        })
    }

    #[inline]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Effective zone count per axis, after rounding the zone size up.
    pub fn layout(&self) -> (u32, u32) {
        (self.zones_x, self.zones_y)
    }

    pub fn zone_count(&self) -> usize {
        self.members.len()
    }

    /// Number of agents with a zone assignment.
    pub fn placed_count(&self) -> usize {
        self.agent_zones.len()
    }

    /// Zone containing `coord` (clamped into the grid first).
    pub fn zone_at(&self, coord: TileCoord) -> ZoneId {
        let c = self.dims.clamp(coord);
        let zx = c.x as u32 / self.zone_width;
        let zy = c.y as u32 / self.zone_height;
        ZoneId(zy * self.zones_x + zx)
    }

    /// Zones overlapped by the clamped square of half-width `reach` around
    /// `center`, ascending.
    pub fn zones_covering(&self, center: TileCoord, reach: u32) -> Vec<ZoneId> {
        let reach = reach.min(i32::MAX as u32 / 2) as i32;
        let lo = self.dims.clamp(center.offset(-reach, -reach));
        let hi = self.dims.clamp(center.offset(reach, reach));

        let (zx0, zy0) = (lo.x as u32 / self.zone_width, lo.y as u32 / self.zone_height);
        let (zx1, zy1) = (hi.x as u32 / self.zone_width, hi.y as u32 / self.zone_height);

        let mut out = Vec::with_capacity(((zx1 - zx0 + 1) * (zy1 - zy0 + 1)) as usize);
        for zy in zy0..=zy1 {
            for zx in zx0..=zx1 {
                out.push(ZoneId(zy * self.zones_x + zx));
            }
        }
        out
    }

    fn detach(&mut self, agent: AgentId, zones: &[ZoneId]) {
        for zone in zones {
            let list = &mut self.members[zone.index()];
            if let Some(pos) = list.iter().position(|&a| a == agent) {
                list.swap_remove(pos);
            }
        }
    }
}

impl SpatialPartition for ZoneGrid {
    fn zones_of(&self, agent: AgentId) -> &[ZoneId] {
        match self.agent_zones.get(&agent) {
            Some(zones) => zones,
            None => &[],
        }
    }

    fn members_of(&self, zone: ZoneId) -> &[AgentId] {
        match self.members.get(zone.index()) {
            Some(agents) => agents,
            None => &[],
        }
    }

    fn relocate(&mut self, agent: AgentId, tile: TileCoord, reach: u32) {
        let zones = self.zones_covering(tile, reach);
        if let Some(old) = self.agent_zones.remove(&agent) {
            if old == zones {
                self.agent_zones.insert(agent, old);
                return;
            }
            self.detach(agent, &old);
        }
        for zone in &zones {
            self.members[zone.index()].push(agent);
        }
        self.agent_zones.insert(agent, zones);
    }

    fn remove(&mut self, agent: AgentId) {
        if let Some(old) = self.agent_zones.remove(&agent) {
            self.detach(agent, &old);
        }
    }
}
