//! The `VisionSystem` driver and its update cycle.

use fow_core::{AgentId, FowConfig, GridDims, GridSnapshot, ProfileId, TileCoord, TileIndex, ZoneId};
use fow_raycast::{ObstructionSnapshot, ProfileSet, ViewProfile};
use fow_spatial::{ImpactExpander, SpatialPartition};
use rustc_hash::FxHashSet;

use crate::workers::Workers;
use crate::{
    AgentTable, AgentVisibility, BatchRequest, Coverage, CycleReport, ProfileGroup, ViewSet,
    VisibilityBatch, VisibilityBuffer, VisionError, VisionResult,
};

/// A deregistered agent whose view is retracted at the next cycle.
#[derive(Clone, Debug)]
struct Departure {
    agent: AgentId,
    view:  ViewSet,
    zones: Vec<ZoneId>,
}

// ── VisionSystem ──────────────────────────────────────────────────────────────

/// Agent registry, profile registry and coverage buffer, advanced in
/// discrete cycles.
///
/// # Cycle
///
/// ```text
/// run_cycle(grid):
///   ① Collect   — note the zones each dirty agent's current view lies in.
///   ② Recompute — VisibilityBatch over the dirty agents (parallel per agent),
///                 then move each agent whose view was replaced in the partition.
///   ③ Expand    — dirty + departed agents, their old and new zones → affected.
///   ④ Merge     — hide previous/departed views, then show current views.
///   ⑤ Retire    — clear previous views and dirty flags.
/// ```
///
/// Agents marked dirty between cycles accumulate for the next one.  The
/// buffer only changes inside `run_cycle`.
///
/// An agent whose recompute fails keeps its view, and stays in the partition
/// at the tile that view was traced from.  Later cycles then re-merge the
/// neighbours of the tiles it actually covers.
///
/// Create via [`VisionSystemBuilder`][crate::VisionSystemBuilder].
pub struct VisionSystem<P: SpatialPartition> {
    dims:      GridDims,
    config:    FowConfig,
    profiles:  ProfileSet,
    agents:    AgentTable,
    partition: P,
    buffer:    VisibilityBuffer,
    expander:  ImpactExpander,
    workers:   Workers,
    /// Cleared snapshot buffers kept between cycles.
    snapshots: Vec<ObstructionSnapshot>,

    /// Dirty agents in the order they were first marked.
    pending:   Vec<AgentId>,
    departed:  Vec<Departure>,
    clamped:   Vec<AgentId>,
    cycles:    u64,
}

impl<P: SpatialPartition> VisionSystem<P> {
    pub(crate) fn from_parts(
        dims:      GridDims,
        config:    FowConfig,
        profiles:  ProfileSet,
        partition: P,
        workers:   Workers,
    ) -> Self {
        Self {
            dims,
            config,
            profiles,
            agents: AgentTable::new(),
            partition,
            buffer: VisibilityBuffer::new(dims),
            expander: ImpactExpander::new(),
            workers,
            snapshots: Vec::new(),
            pending: Vec::new(),
            departed: Vec::new(),
            clamped: Vec::new(),
            cycles: 0,
        }
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Register a view profile after construction.  An identical
    /// `(radius, see_through)` pair returns the existing id.
    pub fn add_profile(&mut self, radius: u32, see_through: u32) -> VisionResult<ProfileId> {
        Ok(self.profiles.insert(radius, see_through, self.config.slot_padding)?)
    }

    /// Register an agent standing on `tile`.  It is dirty until the next
    /// cycle computes its first view.
    ///
    /// A tile outside the grid is clamped and reported in the next
    /// [`CycleReport::clamped`].
    pub fn register_agent(&mut self, profile: ProfileId, tile: TileCoord) -> VisionResult<AgentId> {
        if self.profiles.get(profile).is_none() {
            return Err(VisionError::UnknownProfile(profile));
        }

        let placed = self.dims.clamp(tile);
        let mut agent = AgentVisibility::new(profile, placed);
        agent.pending = true;
        let id = self
            .agents
            .insert(agent)
            .ok_or_else(|| VisionError::Config("agent id space exhausted".into()))?;
        self.pending.push(id);

        if placed != tile {
            log::warn!("{id} registered at {tile}, outside {}; clamped to {placed}", self.dims);
            self.clamped.push(id);
        }
        Ok(id)
    }

    /// Remove an agent.  Its view is retracted from the buffer at the next
    /// cycle, and its id is never handed out again.
    pub fn deregister_agent(&mut self, id: AgentId) -> VisionResult<()> {
        let agent = self.agents.remove(id).ok_or(VisionError::UnknownAgent(id))?;
        if agent.pending {
            self.pending.retain(|&p| p != id);
        }
        self.clamped.retain(|&c| c != id);

        let zones = self.partition.zones_of(id).to_vec();
        self.partition.remove(id);
        self.departed.push(Departure { agent: id, view: agent.current_view, zones });
        Ok(())
    }

    /// Move `id` to `tile` and schedule it for recompute.
    ///
    /// Marking an already dirty agent again only updates its tile.
    pub fn mark_dirty(&mut self, id: AgentId, tile: TileCoord) -> VisionResult<()> {
        let dims = self.dims;
        let agent = self.agents.get_mut(id).ok_or(VisionError::UnknownAgent(id))?;

        let placed = dims.clamp(tile);
        agent.tile = placed;
        if !agent.pending {
            agent.pending = true;
            self.pending.push(id);
        }

        if placed != tile {
            log::warn!("{id} moved to {tile}, outside {dims}; clamped to {placed}");
            self.clamped.push(id);
        }
        Ok(())
    }

    // ── Cycle ─────────────────────────────────────────────────────────────

    /// Recompute every dirty agent against `grid` and fold the results into
    /// the coverage buffer.
    ///
    /// `grid` must have the dimensions the system was built with, and must
    /// not change while the call runs.  A cycle with no dirty or departed
    /// agents leaves the buffer untouched and returns an idle report.
    pub fn run_cycle<G>(&mut self, grid: &G) -> VisionResult<CycleReport>
    where
        G: GridSnapshot + ?Sized,
    {
        let got = grid.dims();
        if got != self.dims {
            return Err(VisionError::GridMismatch { expected: self.dims, got });
        }
        if self.pending.is_empty() && self.departed.is_empty() {
            return Ok(CycleReport::default());
        }
        self.cycles += 1;

        let pending = std::mem::take(&mut self.pending);
        let departed = std::mem::take(&mut self.departed);
        let mut report = CycleReport::default();

        // ── ① Collect ─────────────────────────────────────────────────────
        let mut extra_zones: Vec<ZoneId> =
            departed.iter().flat_map(|d| d.zones.iter().copied()).collect();
        let mut requests = Vec::with_capacity(pending.len());
        for &id in &pending {
            let Some(agent) = self.agents.get(id) else {
                continue;
            };
            extra_zones.extend_from_slice(self.partition.zones_of(id));
            requests.push(BatchRequest { agent: id, profile: agent.profile, tile: agent.tile });
        }

        // ── ② Recompute ───────────────────────────────────────────────────
        let batch = VisibilityBatch::new(&self.profiles, &self.config);
        let groups = batch.prepare_reusing(grid, &requests, &mut self.snapshots);
        let outcomes = self.workers.install(|| batch.compute(&groups));
        self.snapshots.extend(groups.into_iter().map(ProfileGroup::into_snapshot));

        for outcome in outcomes {
            let Some(agent) = self.agents.get_mut(outcome.agent) else {
                continue;
            };
            match outcome.result {
                Ok(view) => {
                    agent.replace_view(view, agent.tile);
                    let reach = self.profiles.get(agent.profile).map_or(0, ViewProfile::radius);
                    self.partition.relocate(outcome.agent, agent.tile, reach);
                }
                Err(err) => {
                    log::warn!("{}: view not updated: {err}", outcome.agent);
                    report.failures.push((outcome.agent, err));
                }
            }
        }

        // ── ③ Expand ──────────────────────────────────────────────────────
        let departed_ids: FxHashSet<AgentId> = departed.iter().map(|d| d.agent).collect();
        let seeds = requests.iter().map(|r| r.agent).chain(departed_ids.iter().copied());
        let candidates = self.expander.expand(&self.partition, seeds, extra_zones);

        let mut unknown = 0usize;
        let affected: Vec<AgentId> = candidates
            .into_iter()
            .filter(|&id| {
                let known = self.agents.contains(id);
                if !known && !departed_ids.contains(&id) {
                    unknown += 1;
                }
                known
            })
            .collect();
        if unknown > 0 {
            log::warn!("{unknown} agents reported by the spatial partition are not registered; ignored");
        }

        // ── ④ Merge ───────────────────────────────────────────────────────
        let mut hide: Vec<ViewSet> = departed.iter().map(|d| d.view.clone()).collect();
        let mut show: Vec<ViewSet> = Vec::with_capacity(affected.len());
        for agent in affected.iter().filter_map(|&id| self.agents.get(id)) {
            if !agent.previous_view.is_empty() {
                hide.push(agent.previous_view.clone());
            }
            show.push(agent.current_view.clone());
        }
        let buffer = &mut self.buffer;
        report.changed = self.workers.install(|| buffer.merge(&hide, &show));

        // ── ⑤ Retire ──────────────────────────────────────────────────────
        for &id in &pending {
            if let Some(agent) = self.agents.get_mut(id) {
                agent.retire_previous();
                agent.pending = false;
            }
        }

        report.recomputed = requests.iter().map(|r| r.agent).collect();
        report.recomputed.sort_unstable();
        report.retracted = departed_ids.into_iter().collect();
        report.retracted.sort_unstable();
        report.affected = affected;
        report.failures.sort_unstable_by_key(|&(id, _)| id);
        report.clamped = std::mem::take(&mut self.clamped);
        report.clamped.sort_unstable();
        report.clamped.dedup();

        log::debug!(
            "cycle {}: {} recomputed, {} retracted, {} affected, {} tiles changed, {} failures",
            self.cycles,
            report.recomputed.len(),
            report.retracted.len(),
            report.affected.len(),
            report.changed.len(),
            report.failures.len(),
        );
        Ok(report)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Coverage of `tile`.  Indices outside the grid report `Hidden`.
    #[inline]
    pub fn coverage_of(&self, tile: TileIndex) -> Coverage {
        self.buffer.coverage_of(tile)
    }

    pub fn agent(&self, id: AgentId) -> Option<&AgentVisibility> {
        self.agents.get(id)
    }

    pub fn agents(&self) -> &AgentTable {
        &self.agents
    }

    pub fn profile(&self, id: ProfileId) -> Option<&ViewProfile> {
        self.profiles.get(id)
    }

    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    pub fn buffer(&self) -> &VisibilityBuffer {
        &self.buffer
    }

    pub fn partition(&self) -> &P {
        &self.partition
    }

    pub fn config(&self) -> &FowConfig {
        &self.config
    }

    #[inline]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Number of registered agents.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Agents waiting for the next cycle.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Cycles that did work since construction.
    pub fn cycles_run(&self) -> u64 {
        self.cycles
    }
}
