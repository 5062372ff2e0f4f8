//! Expansion of the dirty-agent set into the affected-agent set.
//!
//! ```text
//! affected = seeds
//! for zone in zones_of(seed) for every seed, plus any extra zones:
//!     if zone not visited:
//!         visited += zone
//!         affected += members_of(zone)
//! ```
//!
//! Extra zones let the caller include the zones an agent occupied before it
//! moved, so stationary agents around the old position are re-merged too.

use fow_core::{AgentId, ZoneId};
use rustc_hash::FxHashSet;

use crate::SpatialPartition;

/// Reusable scratch state for affected-agent expansion.
#[derive(Clone, Debug, Default)]
pub struct ImpactExpander {
    visited:  FxHashSet<ZoneId>,
    affected: FxHashSet<AgentId>,
}

impl ImpactExpander {
    pub fn new() -> Self {
        Self::default()
    }

    /// Affected agents for `seeds`, ascending by id.
    ///
    /// The result always contains every seed.  Members reported by the
    /// partition are included as-is; filtering unknown agents is the
    /// caller's concern.
    pub fn expand<P, S, Z>(&mut self, partition: &P, seeds: S, extra_zones: Z) -> Vec<AgentId>
    where
        P: SpatialPartition + ?Sized,
        S: IntoIterator<Item = AgentId>,
        Z: IntoIterator<Item = ZoneId>,
    {
        self.visited.clear();
        self.affected.clear();

        let mut frontier: Vec<ZoneId> = extra_zones.into_iter().collect();
        for agent in seeds {
            self.affected.insert(agent);
            frontier.extend_from_slice(partition.zones_of(agent));
        }

        for zone in frontier {
            if !self.visited.insert(zone) {
                continue;
            }
            self.affected.extend(partition.members_of(zone).iter().copied());
        }

        let mut out: Vec<AgentId> = self.affected.iter().copied().collect();
        out.sort_unstable();
        out
    }

    /// Zones visited by the last [`expand`](Self::expand).
    pub fn zones_visited(&self) -> usize {
        self.visited.len()
    }
}
