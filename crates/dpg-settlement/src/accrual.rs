use dpg_actors::Authorizer;
use dpg_types::{Amount, Call, DpgError, EpochIndex, Result, Role};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::engine::{Engine, Variant};
use crate::events::Event;

/// Cross-epoch running balance fed by destruction reports and drawn down by settlements.
/// Rollovers never reset it.
///
/// Shares paid in one epoch are all cut from the same basis: the balance at the
/// epoch's first settlement plus whatever accrued after it. Claim order within
/// an epoch therefore does not change anyone's share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualPool {
    balance: Amount,
    basis: Option<(EpochIndex, Amount)>,
}

impl AccrualPool {
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Settlement basis for `epoch`, fixed at the first call in that epoch
    pub fn basis_for(&mut self, epoch: EpochIndex) -> Amount {
        match self.basis {
            Some((basis_epoch, amount)) if basis_epoch == epoch => amount,
            _ => {
                self.basis = Some((epoch, self.balance));
                self.balance
            }
        }
    }

    /// Credit `share_bps / 10_000` of the released deposits; returns the credited amount
    pub fn accrue(&mut self, released: Amount, share_bps: u32) -> Result<Amount> {
        let accrued = released.bps(share_bps)?;
        self.balance = self.balance.checked_add(accrued)?;
        if let Some((_, basis)) = self.basis.as_mut() {
            *basis = basis.checked_add(accrued)?;
        }
        Ok(accrued)
    }

    pub fn draw(&mut self, amount: Amount) -> Result<()> {
        self.balance = self.balance.checked_sub(amount)?;
        Ok(())
    }
}

/// Variant with a pool fed by garbage reports
pub trait AccruingVariant: Variant {
    fn pool(&self) -> &AccrualPool;

    fn pool_mut(&mut self) -> &mut AccrualPool;

    /// Fraction of a destroyed unit's deposit this variant's pool receives
    fn share_bps(config: &EngineConfig) -> u32;
}

impl<S: AccruingVariant, A: Authorizer> Engine<S, A> {
    /// Collector report of `count` destroyed (thrown-away) units.
    ///
    /// Their deposits leave the deposit pool and the variant's share of them
    /// moves into its pool. The rest stays in escrow unallocated.
    pub fn report_destroyed(&mut self, call: &Call, count: u64) -> Result<Amount> {
        self.atomically(|engine| {
            engine.authorizer.require(Role::Collector, &call.sender)?;
            if count < 1 {
                return Err(DpgError::InvalidCount(count));
            }
            let released = engine.release_deposits(count)?;
            engine.advance_if_due(call.now);

            engine.record_destroyed(count)?;
            let share_bps = S::share_bps(&engine.config);
            let accrued = engine.variant.pool_mut().accrue(released, share_bps)?;

            tracing::debug!(collector = %call.sender, count, %accrued, "destroyed units reported");
            engine.emit(
                call.now,
                Event::DestroyedReported {
                    collector: call.sender,
                    count,
                    accrued,
                },
            );
            Ok(accrued)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accrue_and_draw() {
        let mut pool = AccrualPool::default();
        assert_eq!(pool.accrue(Amount::from_ether(2), 5_000).unwrap(), Amount::from_ether(1));
        assert_eq!(
            pool.accrue(Amount::from_ether(13), 5_000).unwrap(),
            Amount::from_wei(6_500_000_000_000_000_000)
        );
        assert_eq!(pool.balance(), Amount::from_wei(7_500_000_000_000_000_000));

        pool.draw(Amount::from_ether(7)).unwrap();
        assert_eq!(pool.balance(), Amount::from_wei(500_000_000_000_000_000));
        assert!(pool.draw(Amount::from_ether(1)).is_err());
    }

    #[test]
    fn test_basis_is_fixed_within_epoch() {
        let mut pool = AccrualPool::default();
        let half = Amount::from_wei(500_000_000_000_000_000);
        pool.accrue(Amount::from_ether(2), 5_000).unwrap();

        assert_eq!(pool.basis_for(2), Amount::from_ether(1));
        pool.draw(half).unwrap();
        assert_eq!(pool.basis_for(2), Amount::from_ether(1));

        // Late accruals join the basis of the running epoch
        pool.accrue(Amount::from_ether(2), 5_000).unwrap();
        assert_eq!(pool.basis_for(2), Amount::from_ether(2));

        // A new epoch re-reads the balance
        assert_eq!(pool.basis_for(3), Amount::from_wei(1_500_000_000_000_000_000));
    }
}
