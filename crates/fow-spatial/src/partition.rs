//! The affected-agent collaborator.

use fow_core::{AgentId, TileCoord, ZoneId};

/// Coarse spatial index used to find agents whose view may overlap a
/// neighbour's.
///
/// Membership only has to be conservative: listing an agent in a zone it
/// does not touch costs a redundant merge, while omitting one can leave a
/// tile hidden that a stationary agent still sees.
///
/// # Membership maintenance
///
/// The vision driver calls [`relocate`](Self::relocate) each time an agent's
/// view is replaced, with the tile that view was traced from, and
/// [`remove`](Self::remove) when the agent deregisters.  An agent therefore
/// sits where its current view lies, even while a move is pending or after a
/// failed recompute.  Both hooks default to no-ops for partitions whose
/// membership is maintained by the host.
pub trait SpatialPartition: Send {
    /// Zones `agent` currently occupies.  Unknown agents occupy none.
    fn zones_of(&self, agent: AgentId) -> &[ZoneId];

    /// Agents registered in `zone`.  Unknown zones are empty.
    fn members_of(&self, zone: ZoneId) -> &[AgentId];

    /// `agent` now stands on `tile` and sees up to `reach` tiles away.
    fn relocate(&mut self, _agent: AgentId, _tile: TileCoord, _reach: u32) {}

    /// `agent` has left the system.
    fn remove(&mut self, _agent: AgentId) {}
}
