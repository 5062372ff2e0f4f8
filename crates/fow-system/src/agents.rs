//! Per-agent visibility state and the agent table.

use std::sync::Arc;

use fow_core::{AgentId, ProfileId, TileCoord, TileIndex};

// ── ViewSet ───────────────────────────────────────────────────────────────────

/// Immutable, ascending set of visible tiles.
///
/// Views are replaced wholesale on recompute and never edited in place, so a
/// clone held by a reader stays consistent.  Cloning shares the allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewSet(Arc<[TileIndex]>);

impl Default for ViewSet {
    fn default() -> Self {
        Self(Arc::from(Vec::new()))
    }
}

impl ViewSet {
    /// Wrap an ascending, duplicate-free tile list.
    pub fn from_sorted(tiles: Vec<TileIndex>) -> Self {
        debug_assert!(tiles.windows(2).all(|w| w[0] < w[1]), "view tiles must be strictly ascending");
        Self(Arc::from(tiles))
    }

    /// Valid entries of a packed result slot.
    pub fn from_slot(slot: &[TileIndex]) -> Self {
        Self::from_sorted(slot.iter().copied().filter(|t| t.is_valid()).collect())
    }

    #[inline]
    pub fn as_slice(&self) -> &[TileIndex] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = TileIndex> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, tile: TileIndex) -> bool {
        self.0.binary_search(&tile).is_ok()
    }
}

// ── AgentVisibility ───────────────────────────────────────────────────────────

/// Visibility state of one registered agent.
///
/// | Field           | Meaning                                              |
/// |-----------------|------------------------------------------------------|
/// | `profile`       | view profile shared with every agent of that kind    |
/// | `tile`          | current tile, always inside the grid                 |
/// | `view_tile`     | tile `current_view` was traced from                  |
/// | `current_view`  | tiles seen after the last successful recompute       |
/// | `previous_view` | tiles to hide at the next merge; empty between cycles |
///
/// `tile` and `view_tile` differ while a move is pending, and after a
/// recompute that failed.  The spatial partition always places the agent at
/// `view_tile`, where its current view actually lies.
#[derive(Clone, Debug)]
pub struct AgentVisibility {
    pub(crate) profile:       ProfileId,
    pub(crate) tile:          TileCoord,
    pub(crate) view_tile:     TileCoord,
    pub(crate) current_view:  ViewSet,
    pub(crate) previous_view: ViewSet,
    pub(crate) pending:       bool,
}

impl AgentVisibility {
    pub(crate) fn new(profile: ProfileId, tile: TileCoord) -> Self {
        Self {
            profile,
            tile,
            view_tile:     tile,
            current_view:  ViewSet::default(),
            previous_view: ViewSet::default(),
            pending:       false,
        }
    }

    #[inline]
    pub fn profile(&self) -> ProfileId {
        self.profile
    }

    #[inline]
    pub fn tile(&self) -> TileCoord {
        self.tile
    }

    /// Tile the current view was traced from.
    #[inline]
    pub fn view_tile(&self) -> TileCoord {
        self.view_tile
    }

    pub fn current_view(&self) -> &ViewSet {
        &self.current_view
    }

    pub fn previous_view(&self) -> &ViewSet {
        &self.previous_view
    }

    /// `true` if the agent will be recomputed at the next cycle.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Install a view freshly traced from `from`, keeping the old one for
    /// the merge.
    pub(crate) fn replace_view(&mut self, view: ViewSet, from: TileCoord) {
        self.previous_view = std::mem::replace(&mut self.current_view, view);
        self.view_tile = from;
    }

    pub(crate) fn retire_previous(&mut self) {
        self.previous_view = ViewSet::default();
    }
}

// ── AgentTable ────────────────────────────────────────────────────────────────

/// Registered agents indexed by [`AgentId`].  Ids are handed out in order and
/// never reused, so a stale id can't alias a newer agent.
#[derive(Clone, Debug, Default)]
pub struct AgentTable {
    slots: Vec<Option<AgentVisibility>>,
    live:  usize,
}

impl AgentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `agent` under the next id.  `None` once the id space is spent.
    pub(crate) fn insert(&mut self, agent: AgentVisibility) -> Option<AgentId> {
        let id = AgentId::from_index(self.slots.len())?;
        self.slots.push(Some(agent));
        self.live += 1;
        Some(id)
    }

    pub(crate) fn remove(&mut self, id: AgentId) -> Option<AgentVisibility> {
        let removed = self.slots.get_mut(id.index()).and_then(Option::take);
        if removed.is_some() {
            self.live -= 1;
        }
        removed
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&AgentVisibility> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: AgentId) -> Option<&mut AgentVisibility> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.get(id).is_some()
    }

    /// Number of registered agents.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Registered agents in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &AgentVisibility)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|a| (AgentId(i as u32), a)))
    }
}
