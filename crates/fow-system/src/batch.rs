//! Per-profile batch scheduling of view recomputes.
//!
//! # Two stages
//!
//! | Stage       | Thread   | Work                                                       |
//! |-------------|----------|------------------------------------------------------------|
//! | [`prepare`] | caller   | group requests by profile, copy each group's obstruction snapshot |
//! | [`compute`] | workers  | trace every agent of every group into its own result slot |
//!
//! Only `prepare` reads the host grid, so the grid need not be `Sync`.
//! `compute` reads nothing but the prepared groups and profiles.
//!
//! Snapshots are grid-sized.  [`prepare_reusing`] draws them from a spare
//! list and [`ProfileGroup::into_snapshot`] hands them back cleared, so a
//! long-running driver allocates them once and each cycle only pays for the
//! tiles it captures.
//!
//! [`prepare`]: VisibilityBatch::prepare
//! [`compute`]: VisibilityBatch::compute
//! [`prepare_reusing`]: VisibilityBatch::prepare_reusing
//!
//! # Result table
//!
//! Each group owns one flat `Vec<TileIndex>` of `agents × capacity` entries.
//! Agent `i` of the group (its slot) writes only
//! `table[i * capacity .. (i + 1) * capacity]`, and unused entries keep the
//! `TileIndex::INVALID` sentinel.

use fow_core::{AgentId, FowConfig, GridSnapshot, ProfileId, TileCoord, TileIndex};
use fow_raycast::{ObstructionSnapshot, ProfileSet, RayWalker, RaycastResult, ViewProfile};
use rustc_hash::FxHashMap;

use crate::ViewSet;

/// One agent to recompute.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BatchRequest {
    pub agent:   AgentId,
    pub profile: ProfileId,
    pub tile:    TileCoord,
}

/// Result for one agent.  On error the agent keeps its previous view.
#[derive(Clone, Debug)]
pub struct BatchOutcome {
    pub agent:  AgentId,
    pub result: RaycastResult<ViewSet>,
}

/// Agents sharing one profile, in encounter order, with the obstruction
/// data they need.
#[derive(Clone, Debug)]
pub struct ProfileGroup {
    pub profile: ProfileId,
    pub agents:  Vec<AgentId>,
    pub tiles:   Vec<TileCoord>,
    snapshot:    ObstructionSnapshot,
}

impl ProfileGroup {
    pub fn snapshot(&self) -> &ObstructionSnapshot {
        &self.snapshot
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Release the group, keeping its snapshot buffer for another batch.
    pub fn into_snapshot(self) -> ObstructionSnapshot {
        let mut snapshot = self.snapshot;
        snapshot.reset();
        snapshot
    }
}

/// Scheduler for one cycle's recomputes.
#[derive(Copy, Clone, Debug)]
pub struct VisibilityBatch<'a> {
    profiles: &'a ProfileSet,
    config:   &'a FowConfig,
}

impl<'a> VisibilityBatch<'a> {
    pub fn new(profiles: &'a ProfileSet, config: &'a FowConfig) -> Self {
        Self { profiles, config }
    }

    /// Group `requests` by profile (groups in first-encounter order, agents
    /// in request order) and capture each group's snapshot from `grid`.
    ///
    /// Requests naming an unknown profile are dropped.
    pub fn prepare<G>(&self, grid: &G, requests: &[BatchRequest]) -> Vec<ProfileGroup>
    where
        G: GridSnapshot + ?Sized,
    {
        self.prepare_reusing(grid, requests, &mut Vec::new())
    }

    /// [`prepare`](Self::prepare), taking snapshot buffers from `spare`
    /// before allocating new ones.  Spares that still hold captures, or that
    /// were sized for other dimensions, are dropped.
    pub fn prepare_reusing<G>(
        &self,
        grid:     &G,
        requests: &[BatchRequest],
        spare:    &mut Vec<ObstructionSnapshot>,
    ) -> Vec<ProfileGroup>
    where
        G: GridSnapshot + ?Sized,
    {
        let dims = grid.dims();
        let mut groups: Vec<ProfileGroup> = Vec::new();
        let mut by_profile: FxHashMap<ProfileId, usize> = FxHashMap::default();

        for req in requests {
            let Some(profile) = self.profiles.get(req.profile) else {
                log::warn!("{}: unknown {}; skipped", req.agent, req.profile);
                continue;
            };
            let slot = *by_profile.entry(req.profile).or_insert_with(|| {
                let snapshot = std::iter::from_fn(|| spare.pop())
                    .find(|s| s.dims() == dims && s.captured_count() == 0)
                    .unwrap_or_else(|| ObstructionSnapshot::new(dims));
                groups.push(ProfileGroup {
                    profile:  req.profile,
                    agents:   Vec::new(),
                    tiles:    Vec::new(),
                    snapshot,
                });
                groups.len() - 1
            });

            let group = &mut groups[slot];
            let reach = profile.radius().saturating_add(self.config.snapshot_padding);
            group.snapshot.capture(grid, req.tile, reach);
            group.agents.push(req.agent);
            group.tiles.push(req.tile);
        }
        groups
    }

    /// Trace every prepared agent.  Outcomes follow group order, then slot
    /// order.
    pub fn compute(&self, groups: &[ProfileGroup]) -> Vec<BatchOutcome> {
        let mut outcomes = Vec::with_capacity(groups.iter().map(ProfileGroup::len).sum());
        for group in groups {
            let Some(profile) = self.profiles.get(group.profile) else {
                continue;
            };
            log::trace!(
                "{}: {} agents, {} snapshot tiles, slot capacity {}",
                group.profile,
                group.len(),
                group.snapshot.captured_count(),
                profile.capacity(),
            );
            outcomes.extend(self.compute_group(profile, group));
        }
        outcomes
    }

    /// [`prepare`](Self::prepare) then [`compute`](Self::compute).
    pub fn run<G>(&self, grid: &G, requests: &[BatchRequest]) -> Vec<BatchOutcome>
    where
        G: GridSnapshot + ?Sized,
    {
        self.compute(&self.prepare(grid, requests))
    }

    fn compute_group(&self, profile: &ViewProfile, group: &ProfileGroup) -> Vec<BatchOutcome> {
        let capacity = profile.capacity();
        let walker = RayWalker::new(profile, &group.snapshot);
        let mut table = vec![TileIndex::INVALID; capacity * group.len()];
        let counts = fill_slots(walker, &group.tiles, &mut table, capacity, self.config.batch_size);

        group
            .agents
            .iter()
            .zip(table.chunks(capacity))
            .zip(counts)
            .map(|((&agent, slot), count)| BatchOutcome {
                agent,
                result: count.map(|_| ViewSet::from_slot(slot)),
            })
            .collect()
    }
}

/// Fill one slot per tile of `tiles`.  Returns the per-slot tile counts.
fn fill_slots(
    walker:     RayWalker<'_>,
    tiles:      &[TileCoord],
    table:      &mut [TileIndex],
    capacity:   usize,
    batch_size: usize,
) -> Vec<RaycastResult<usize>> {
    #[cfg(not(feature = "parallel"))]
    {
        let _ = batch_size;
        table
            .chunks_mut(capacity)
            .zip(tiles)
            .map(|(slot, &tile)| walker.fill_slot(tile, slot))
            .collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        table
            .par_chunks_mut(capacity)
            .zip(tiles.par_iter())
            .with_min_len(batch_size)
            .map(|(slot, &tile)| walker.fill_slot(tile, slot))
            .collect()
    }
}
