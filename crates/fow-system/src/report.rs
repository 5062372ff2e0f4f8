//! What one cycle did.

use fow_core::{AgentId, TileIndex};
use fow_raycast::RaycastError;

/// Summary returned by [`VisionSystem::run_cycle`](crate::VisionSystem::run_cycle).
///
/// All agent lists are ascending by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Tiles whose coverage flipped this cycle, ascending.
    pub changed: Vec<TileIndex>,

    /// Agents whose view was recomputed (the dirty set).
    pub recomputed: Vec<AgentId>,

    /// Deregistered agents whose view was retracted.
    pub retracted: Vec<AgentId>,

    /// Registered agents whose views were merged into the buffer.
    pub affected: Vec<AgentId>,

    /// Agents whose recompute failed.  They keep their previous view.
    pub failures: Vec<(AgentId, RaycastError)>,

    /// Agents whose requested tile lay outside the grid and was clamped.
    pub clamped: Vec<AgentId>,
}

impl CycleReport {
    /// `true` if the cycle had nothing to do.
    pub fn is_idle(&self) -> bool {
        self.recomputed.is_empty() && self.retracted.is_empty()
    }
}
