//! Engine configuration.
//!
//! Every tunable the batch scheduler needs lives here as a plain field.
//! Applications typically fill it from their own settings file and hand
//! it to the system builder.

use crate::{FowError, FowResult};

/// Tunables for the visibility batch scheduler.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FowConfig {
    /// Minimum number of agents handed to one worker at a time.  Small
    /// values spread work more evenly; large values cut scheduling overhead.
    /// Default: 8.
    pub batch_size: usize,

    /// Fixed padding added to `⌈π·r²⌉` when sizing an agent's result slot.
    /// Default: 50.
    pub slot_padding: usize,

    /// Extra tiles beyond the view radius copied into the per-profile
    /// obstruction snapshot.  Default: 10.
    pub snapshot_padding: u32,

    /// Worker thread count for a dedicated Rayon pool.  `None` runs on
    /// Rayon's global pool.
    pub num_threads: Option<usize>,
}

impl Default for FowConfig {
    fn default() -> Self {
        Self {
            batch_size:       8,
            slot_padding:     50,
            snapshot_padding: 10,
            num_threads:      None,
        }
    }
}

impl FowConfig {
    /// Reject settings that would make the scheduler misbehave.
    pub fn validate(&self) -> FowResult<()> {
        if self.batch_size == 0 {
            return Err(FowError::Config("batch_size must be at least 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(FowError::Config("num_threads must be at least 1 when set".into()));
        }
        Ok(())
    }
}
