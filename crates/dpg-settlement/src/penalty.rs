use dpg_actors::Authorizer;
use dpg_types::{Address, Amount, Call, DpgError, Result, Role, Rollover, UnitId, BPS_DENOMINATOR};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::engine::{Engine, Variant};
use crate::events::Event;
use crate::units::{UnitRecord, UnitRegistry};

/// Per-consumer unit statistics and penalty balances
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerUnitStats {
    pub purchased: u64,
    pub self_returned: u64,
    pub foreign_returned: u64,
    pub thrown_away: u64,
    /// Withheld surcharges not yet seized or withdrawn
    pub owed_penalty: Amount,
    /// Part of `owed_penalty` still attached to units the consumer owns
    pub locked_penalty: Amount,
    /// Surcharges forfeited because the consumer's units were thrown away
    pub seized_penalty: Amount,
}

impl ConsumerUnitStats {
    /// A consumer with at least one throw-away report whose self-return ratio
    /// is below `threshold_bps` pays the surcharge on further purchases
    pub fn is_penalized(&self, threshold_bps: u32) -> bool {
        if self.thrown_away == 0 {
            return false;
        }
        (self.self_returned as u128) * BPS_DENOMINATOR
            < (self.purchased as u128) * (threshold_bps as u128)
    }

    /// Owed surcharges no longer attached to an outstanding unit
    pub fn withdrawable_penalty(&self) -> Amount {
        Amount::from_wei(self.owed_penalty.wei().saturating_sub(self.locked_penalty.wei()))
    }

    fn unlock(&mut self, withheld: Amount) -> Result<()> {
        self.locked_penalty = self.locked_penalty.checked_sub(withheld)?;
        Ok(())
    }
}

/// Penalty variant: one-way units tracked by identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyState {
    pub units: UnitRegistry,
    pub consumers: BTreeMap<Address, ConsumerUnitStats>,
    pub seized_pool: Amount,
}

impl PenaltyState {
    fn stats_mut(&mut self, consumer: Address) -> &mut ConsumerUnitStats {
        self.consumers.entry(consumer).or_default()
    }

    fn stats(&self, consumer: &Address) -> ConsumerUnitStats {
        self.consumers.get(consumer).copied().unwrap_or_default()
    }
}

impl Variant for PenaltyState {
    const NAME: &'static str = "penalty";

    fn on_rollover(&mut self, _rollover: Rollover) {}
}

pub type PenaltyEngine<A> = Engine<PenaltyState, A>;

impl<A: Authorizer> Engine<PenaltyState, A> {
    /// Record the purchase of units `ids` by `to`.
    ///
    /// Unknown identifiers are registered and must come with their deposit;
    /// known ones change hands for free. A penalized buyer additionally owes
    /// the surcharge for every unit in the call, which stays withheld on the
    /// unit until it is returned, changes hands or is thrown away.
    pub fn buy_units(&mut self, call: &Call, ids: &[UnitId], to: Address) -> Result<()> {
        self.atomically(|engine| {
            if ids.is_empty() {
                return Err(DpgError::InvalidCount(0));
            }
            if to.is_zero() {
                return Err(DpgError::ZeroAddress);
            }
            let mut seen = BTreeSet::new();
            for id in ids {
                if !seen.insert(*id) {
                    return Err(DpgError::DuplicateUnit(*id));
                }
            }

            let new_units = ids
                .iter()
                .filter(|id| !engine.variant.units.exists(**id))
                .count() as u64;
            let per_unit = engine.penalty_of(&to)?;
            let surcharge = per_unit.checked_mul_count(ids.len() as u64)?;
            let deposits = engine.config.unit_price.checked_mul_count(new_units)?;
            let expected = deposits.checked_add(surcharge)?;
            if call.value != expected {
                return Err(DpgError::ValueMismatch {
                    expected,
                    attached: call.value,
                });
            }

            engine.receive(call)?;
            engine.core.deposit_pool = engine.core.deposit_pool.checked_add(deposits)?;

            for id in ids {
                let withheld = match engine.variant.units.get(*id).copied() {
                    Some(UnitRecord { owner, withheld }) if owner == to => {
                        withheld.checked_add(per_unit)?
                    }
                    Some(UnitRecord { owner, withheld }) => {
                        // The previous owner's surcharge detaches with the unit
                        engine.variant.stats_mut(owner).unlock(withheld)?;
                        per_unit
                    }
                    None => per_unit,
                };
                engine.variant.units.register_or_transfer(*id, to, withheld);
            }

            let stats = engine.variant.stats_mut(to);
            stats.purchased += ids.len() as u64;
            stats.owed_penalty = stats.owed_penalty.checked_add(surcharge)?;
            stats.locked_penalty = stats.locked_penalty.checked_add(surcharge)?;

            tracing::debug!(%to, units = ids.len(), new_units, %surcharge, "units bought");
            engine.emit(
                call.now,
                Event::UnitsBought {
                    to,
                    ids: ids.to_vec(),
                    new_units,
                    surcharge,
                },
            );
            Ok(())
        })
    }

    /// Retailer report of units handed back at its take-back point by `returned_by`.
    /// Unregistered identifiers are ignored. Returns how many units were deregistered.
    pub fn return_units(&mut self, call: &Call, ids: &[UnitId], returned_by: Address) -> Result<usize> {
        self.atomically(|engine| {
            engine.authorizer.require(Role::Retailer, &call.sender)?;
            let mut returned = Vec::new();
            for id in ids {
                let Some(unit) = engine.variant.units.deregister(*id) else {
                    continue;
                };
                let stats = engine.variant.stats_mut(unit.owner);
                stats.unlock(unit.withheld)?;
                if unit.owner == returned_by {
                    stats.self_returned += 1;
                } else {
                    stats.foreign_returned += 1;
                }
                returned.push(*id);
            }

            if returned.is_empty() {
                tracing::debug!(%returned_by, requested = ids.len(), "no registered units in return report");
                return Ok(0);
            }

            let count = returned.len();
            tracing::debug!(%returned_by, count, "units returned");
            engine.emit(
                call.now,
                Event::UnitsReturned {
                    returned_by,
                    ids: returned,
                },
            );
            Ok(count)
        })
    }

    /// Collector report of units found in the garbage. Each registered unit is
    /// deregistered and counted against its owner, its deposit leaves the
    /// deposit pool and a surcharge withheld on it is seized. Returns the
    /// amount seized.
    pub fn report_thrown_away(&mut self, call: &Call, ids: &[UnitId]) -> Result<Amount> {
        self.atomically(|engine| {
            engine.authorizer.require(Role::Collector, &call.sender)?;
            if ids.is_empty() {
                return Err(DpgError::InvalidCount(0));
            }
            engine.advance_if_due(call.now);

            let mut thrown = Vec::new();
            let mut seized_total = Amount::ZERO;
            for id in ids {
                let Some(unit) = engine.variant.units.deregister(*id) else {
                    continue;
                };

                let stats = engine.variant.stats_mut(unit.owner);
                stats.thrown_away += 1;
                stats.unlock(unit.withheld)?;
                let seized = unit.withheld.min(stats.owed_penalty);
                stats.owed_penalty = stats.owed_penalty.checked_sub(seized)?;
                stats.seized_penalty = stats.seized_penalty.checked_add(seized)?;

                seized_total = seized_total.checked_add(seized)?;
                thrown.push(*id);
            }

            engine.release_deposits(thrown.len() as u64)?;
            engine.record_destroyed(thrown.len() as u64)?;
            engine.variant.seized_pool = engine.variant.seized_pool.checked_add(seized_total)?;

            tracing::debug!(collector = %call.sender, count = thrown.len(), seized = %seized_total, "thrown-away units reported");
            engine.emit(
                call.now,
                Event::UnitsThrownAway {
                    collector: call.sender,
                    ids: thrown,
                    seized: seized_total,
                },
            );
            Ok(seized_total)
        })
    }

    /// Pay the caller its owed surcharges whose units were returned or passed
    /// on. Surcharges on units it still owns stay withheld until their fate is known.
    pub fn withdraw_penalty(&mut self, call: &Call) -> Result<Amount> {
        self.atomically(|engine| {
            let consumer = call.sender;
            let owed = engine.variant.stats(&consumer).withdrawable_penalty();
            if owed.is_zero() {
                return Err(DpgError::NothingToClaim(consumer));
            }

            let stats = engine.variant.stats_mut(consumer);
            stats.owed_penalty = stats.owed_penalty.checked_sub(owed)?;
            engine.pay(&consumer, owed)?;

            tracing::info!(%consumer, amount = %owed, "penalty withdrawn");
            engine.emit(call.now, Event::PenaltyWithdrawn { consumer, amount: owed });
            Ok(owed)
        })
    }

    /// Sweep the seized penalty pool to the owner
    pub fn withdraw_seized_penalties(&mut self, call: &Call) -> Result<Amount> {
        self.atomically(|engine| {
            let owner = call.sender;
            engine.authorizer.require(Role::Owner, &owner)?;
            let amount = engine.variant.seized_pool;
            if amount.is_zero() {
                return Err(DpgError::NothingToClaim(owner));
            }

            engine.variant.seized_pool = Amount::ZERO;
            engine.pay(&owner, amount)?;

            tracing::info!(%owner, %amount, "seized penalties withdrawn");
            engine.emit(call.now, Event::SeizedPenaltiesWithdrawn { owner, amount });
            Ok(amount)
        })
    }

    /// Surcharge per unit `consumer` currently owes on purchases (zero when not penalized)
    pub fn penalty_of(&self, consumer: &Address) -> Result<Amount> {
        let stats = self.variant.stats(consumer);
        if stats.is_penalized(self.config.penalty_return_threshold_bps) {
            self.config.penalty_surcharge()
        } else {
            Ok(Amount::ZERO)
        }
    }

    pub fn consumer_stats(&self, consumer: &Address) -> ConsumerUnitStats {
        self.variant.stats(consumer)
    }

    pub fn self_returned(&self, consumer: &Address) -> u64 {
        self.variant.stats(consumer).self_returned
    }

    pub fn foreign_returned(&self, consumer: &Address) -> u64 {
        self.variant.stats(consumer).foreign_returned
    }

    pub fn thrown_away_by(&self, consumer: &Address) -> u64 {
        self.variant.stats(consumer).thrown_away
    }

    pub fn owed_penalty(&self, consumer: &Address) -> Amount {
        self.variant.stats(consumer).owed_penalty
    }

    /// What [`withdraw_penalty`](Self::withdraw_penalty) would pay `consumer` now
    pub fn withdrawable_penalty(&self, consumer: &Address) -> Amount {
        self.variant.stats(consumer).withdrawable_penalty()
    }

    pub fn seized_penalties(&self) -> Amount {
        self.variant.seized_pool
    }

    pub fn units(&self) -> &UnitRegistry {
        &self.variant.units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalty_condition() {
        let mut stats = ConsumerUnitStats {
            purchased: 4,
            ..Default::default()
        };
        // No throw-away report yet
        assert!(!stats.is_penalized(5_000));

        stats.thrown_away = 1;
        assert!(stats.is_penalized(5_000));

        stats.self_returned = 2;
        assert!(!stats.is_penalized(5_000));

        stats.purchased = 5;
        assert!(stats.is_penalized(5_000));
    }

    #[test]
    fn test_locked_surcharge_is_not_withdrawable() {
        let mut stats = ConsumerUnitStats {
            owed_penalty: Amount::from_wei(600),
            locked_penalty: Amount::from_wei(400),
            ..Default::default()
        };
        assert_eq!(stats.withdrawable_penalty(), Amount::from_wei(200));

        stats.unlock(Amount::from_wei(400)).unwrap();
        assert_eq!(stats.withdrawable_penalty(), Amount::from_wei(600));
        assert!(stats.unlock(Amount::from_wei(1)).is_err());
    }
}
