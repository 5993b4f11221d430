use dpg_actors::Authorizer;
use dpg_types::{Address, Amount, Call, DpgError, EpochIndex, Result, Role, Rollover};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::accrual::{AccrualPool, AccruingVariant};
use crate::claims::ClaimBook;
use crate::config::EngineConfig;
use crate::engine::{Engine, Variant};
use crate::events::Event;

/// Reusable-unit purchases reported during one epoch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochPurchases {
    pub epoch: EpochIndex,
    pub by_consumer: BTreeMap<Address, u64>,
    pub total: u64,
}

impl EpochPurchases {
    pub fn new(epoch: EpochIndex) -> Self {
        EpochPurchases {
            epoch,
            by_consumer: BTreeMap::new(),
            total: 0,
        }
    }

    pub fn of(&self, consumer: &Address) -> u64 {
        self.by_consumer.get(consumer).copied().unwrap_or(0)
    }
}

/// Purchase counters of the current epoch plus the frozen snapshot of the one before it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseBook {
    current: EpochPurchases,
    previous: Option<EpochPurchases>,
}

impl Default for PurchaseBook {
    fn default() -> Self {
        PurchaseBook {
            current: EpochPurchases::new(1),
            previous: None,
        }
    }
}

impl PurchaseBook {
    pub fn current(&self) -> &EpochPurchases {
        &self.current
    }

    /// Snapshot of the immediately preceding epoch, if that epoch had any reports
    pub fn previous(&self) -> Option<&EpochPurchases> {
        self.previous.as_ref()
    }

    pub fn record(&mut self, consumer: Address, count: u64) -> Result<()> {
        let total = self
            .current
            .total
            .checked_add(count)
            .ok_or_else(|| DpgError::Overflow("epoch purchase total".to_string()))?;
        let entry = self.current.by_consumer.entry(consumer).or_insert(0);
        *entry += count;
        self.current.total = total;
        Ok(())
    }

    /// Freeze the current counters. When more than one boundary was crossed the
    /// immediately preceding epoch saw no reports, so no snapshot survives.
    pub fn roll(&mut self, rollover: Rollover) {
        let finished = std::mem::replace(&mut self.current, EpochPurchases::new(rollover.to));
        self.previous = if rollover.epochs_elapsed() == 1 {
            Some(finished)
        } else {
            None
        };
    }
}

/// Consumer variant: garbage reports feed a reward pool split by prior-epoch purchase share
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardState {
    pub pool: AccrualPool,
    pub purchases: PurchaseBook,
    pub claims: ClaimBook,
}

impl Variant for RewardState {
    const NAME: &'static str = "reward";

    fn on_rollover(&mut self, rollover: Rollover) {
        self.purchases.roll(rollover);
    }
}

impl AccruingVariant for RewardState {
    fn pool(&self) -> &AccrualPool {
        &self.pool
    }

    fn pool_mut(&mut self) -> &mut AccrualPool {
        &mut self.pool
    }

    fn share_bps(config: &EngineConfig) -> u32 {
        config.reward_share_bps
    }
}

pub type RewardEngine<A> = Engine<RewardState, A>;

impl<A: Authorizer> Engine<RewardState, A> {
    /// Retailer report of `count` reusable units bought by `consumer` in the current epoch
    pub fn report_purchase(&mut self, call: &Call, consumer: Address, count: u64) -> Result<()> {
        self.atomically(|engine| {
            engine.authorizer.require(Role::Retailer, &call.sender)?;
            if count < 1 {
                return Err(DpgError::InvalidCount(count));
            }
            if consumer.is_zero() {
                return Err(DpgError::ZeroAddress);
            }
            engine.advance_if_due(call.now);

            engine.variant.purchases.record(consumer, count)?;

            tracing::debug!(%consumer, count, epoch = engine.current_epoch_index(), "purchase reported");
            engine.emit(call.now, Event::PurchaseReported { consumer, count });
            Ok(())
        })
    }

    /// Pay the caller its share of unclaimed rewards, proportional to its
    /// purchases in the immediately preceding epoch. Shares are cut from the
    /// pool's settlement basis for the current epoch, so claim order does not
    /// matter. A consumer who lets that epoch's claim window pass forfeits the
    /// share; it stays in the pool.
    pub fn claim_reward(&mut self, call: &Call) -> Result<Amount> {
        self.atomically(|engine| {
            let consumer = call.sender;
            let epoch = engine.advance_for_settlement(call.now)?;
            engine.variant.claims.ensure_unclaimed(&consumer, epoch)?;

            let (purchased, total) = match engine.variant.purchases.previous() {
                Some(snapshot) if snapshot.epoch + 1 == epoch => {
                    (snapshot.of(&consumer), snapshot.total)
                }
                _ => (0, 0),
            };
            if purchased == 0 {
                return Err(DpgError::NothingToClaim(consumer));
            }

            let share = engine
                .variant
                .pool
                .basis_for(epoch)
                .mul_ratio(purchased, total)?
                .min(engine.variant.pool.balance());
            if share.is_zero() {
                return Err(DpgError::NothingToClaim(consumer));
            }

            engine.variant.pool.draw(share)?;
            engine.pay(&consumer, share)?;
            engine.variant.claims.record(consumer, epoch);

            tracing::info!(%consumer, epoch, amount = %share, purchased, total, "reward claimed");
            engine.emit(call.now, Event::RewardClaimed { consumer, amount: share });
            Ok(share)
        })
    }

    pub fn unclaimed_rewards(&self) -> Amount {
        self.variant.pool.balance()
    }

    /// Purchases reported for `consumer` in the current epoch
    pub fn purchases_of(&self, consumer: &Address) -> u64 {
        self.variant.purchases.current().of(consumer)
    }

    /// Purchases reported in the current epoch across all consumers
    pub fn total_purchases(&self) -> u64 {
        self.variant.purchases.current().total
    }
}
