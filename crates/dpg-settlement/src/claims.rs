use dpg_types::{Address, DpgError, EpochIndex, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Last settled epoch per beneficiary; at most one settlement per epoch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimBook {
    last_claimed: BTreeMap<Address, EpochIndex>,
}

impl ClaimBook {
    pub fn last_claimed(&self, who: &Address) -> Option<EpochIndex> {
        self.last_claimed.get(who).copied()
    }

    /// Fail with `AlreadyClaimed` if `who` settled in `epoch`
    pub fn ensure_unclaimed(&self, who: &Address, epoch: EpochIndex) -> Result<()> {
        match self.last_claimed(who) {
            Some(last) if last == epoch => Err(DpgError::AlreadyClaimed {
                caller: *who,
                epoch,
            }),
            _ => Ok(()),
        }
    }

    pub fn record(&mut self, who: Address, epoch: EpochIndex) {
        self.last_claimed.insert(who, epoch);
    }
}
