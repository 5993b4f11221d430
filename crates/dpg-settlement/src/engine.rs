use dpg_actors::Authorizer;
use dpg_ledger::{Ledger, MemoryLedger};
use dpg_types::{
    Address, Amount, Call, DpgError, Epoch, EpochIndex, PeriodClock, Result, Rollover, Timestamp,
};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::events::{Event, EventRecord};

/// Variant-specific settlement state carried by an [`Engine`]
pub trait Variant: Clone {
    /// Human-readable variant name
    const NAME: &'static str;

    /// Freeze epoch-scoped counters after the clock crossed an epoch boundary
    fn on_rollover(&mut self, rollover: Rollover);
}

/// State shared by every variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CoreState {
    pub(crate) clock: PeriodClock,
    pub(crate) deposit_pool: Amount,
    pub(crate) total_destroyed: u64,
    pub(crate) destroyed_this_epoch: u64,
}

/// Settlement engine: period clock, deposit escrow and one variant's pools.
///
/// Every mutating call runs inside [`Engine::atomically`]: a call that fails
/// leaves the clock, pools, registries, ledger and event journal exactly as
/// they were before it started.
#[derive(Debug)]
pub struct Engine<S, A> {
    pub(crate) config: EngineConfig,
    pub(crate) authorizer: A,
    pub(crate) ledger: MemoryLedger,
    pub(crate) core: CoreState,
    pub(crate) variant: S,
    journal: Vec<EventRecord>,
}

impl<S: Variant + Default, A: Authorizer> Engine<S, A> {
    /// Deploy an engine whose first epoch starts at `now`
    pub fn new(config: EngineConfig, authorizer: A, now: Timestamp) -> Result<Self> {
        Self::with_state(config, authorizer, now, S::default())
    }
}

impl<S: Variant, A: Authorizer> Engine<S, A> {
    pub(crate) fn with_state(
        config: EngineConfig,
        authorizer: A,
        now: Timestamp,
        variant: S,
    ) -> Result<Self> {
        config.validate()?;

        let core = CoreState {
            clock: PeriodClock::new(now, config.epoch_length_secs),
            deposit_pool: Amount::ZERO,
            total_destroyed: 0,
            destroyed_this_epoch: 0,
        };

        tracing::info!(
            variant = S::NAME,
            unit_price = %config.unit_price,
            epoch_length_secs = config.epoch_length_secs,
            "settlement engine deployed"
        );

        Ok(Engine {
            config,
            authorizer,
            ledger: MemoryLedger::new(),
            core,
            variant,
            journal: Vec::new(),
        })
    }

    /// Run `op` as one all-or-nothing call
    pub(crate) fn atomically<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let core = self.core.clone();
        let variant = self.variant.clone();
        let ledger = self.ledger.snapshot();
        let journal_len = self.journal.len();

        match op(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.core = core;
                self.variant = variant;
                self.ledger.restore(&ledger)?;
                self.journal.truncate(journal_len);
                tracing::warn!(variant = S::NAME, kind = err.kind(), error = %err, "call rejected");
                Err(err)
            }
        }
    }

    /// Roll the clock forward if due and freeze epoch-scoped counters
    pub(crate) fn advance_if_due(&mut self, now: Timestamp) -> Option<Rollover> {
        let rollover = self.core.clock.advance_if_due(now)?;

        self.core.destroyed_this_epoch = 0;
        self.variant.on_rollover(rollover);

        tracing::info!(from = rollover.from, to = rollover.to, "epoch advanced");
        self.emit(
            now,
            Event::EpochAdvanced {
                from: rollover.from,
                to: rollover.to,
            },
        );
        Some(rollover)
    }

    /// Advance the clock and fail with `TooEarly` while still in the first epoch
    pub(crate) fn advance_for_settlement(&mut self, now: Timestamp) -> Result<EpochIndex> {
        self.advance_if_due(now);
        if self.core.clock.is_first_epoch() {
            return Err(DpgError::TooEarly(self.core.clock.index()));
        }
        Ok(self.core.clock.index())
    }

    /// Accept the value attached to a call into escrow
    pub(crate) fn receive(&mut self, call: &Call) -> Result<()> {
        self.ledger.credit(&self.config.escrow_account, call.value)
    }

    /// Pay `amount` out of escrow
    pub(crate) fn pay(&mut self, to: &Address, amount: Amount) -> Result<()> {
        let escrow = self.config.escrow_account;
        self.ledger.transfer(&escrow, to, amount)
    }

    pub(crate) fn record_destroyed(&mut self, count: u64) -> Result<()> {
        self.core.total_destroyed = self
            .core
            .total_destroyed
            .checked_add(count)
            .ok_or_else(|| DpgError::Overflow("destroyed unit counter".to_string()))?;
        self.core.destroyed_this_epoch += count;
        Ok(())
    }

    pub(crate) fn emit(&mut self, timestamp: Timestamp, event: Event) {
        self.journal.push(EventRecord {
            epoch: self.core.clock.index(),
            timestamp,
            event,
        });
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn authorizer(&self) -> &A {
        &self.authorizer
    }

    /// Role administration goes straight to the registry
    pub fn authorizer_mut(&mut self) -> &mut A {
        &mut self.authorizer
    }

    pub fn ledger(&self) -> &MemoryLedger {
        &self.ledger
    }

    pub fn variant(&self) -> &S {
        &self.variant
    }

    pub fn current_epoch(&self) -> Epoch {
        self.core.clock.current()
    }

    pub fn current_epoch_index(&self) -> EpochIndex {
        self.core.clock.index()
    }

    /// Escrowed deposits not yet refunded
    pub fn deposit_pool(&self) -> Amount {
        self.core.deposit_pool
    }

    /// Value held by the engine's escrow account
    pub fn contract_balance(&self) -> Amount {
        self.ledger.balance(&self.config.escrow_account)
    }

    /// Value paid out to (or otherwise held by) `account`
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.ledger.balance(account)
    }

    /// Destroyed units reported since deployment
    pub fn destroyed_units(&self) -> u64 {
        self.core.total_destroyed
    }

    /// Destroyed units reported in the current epoch
    pub fn destroyed_in_current_epoch(&self) -> u64 {
        self.core.destroyed_this_epoch
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.journal
    }

    /// Events recorded while `epoch` was current
    pub fn events_in_epoch(&self, epoch: EpochIndex) -> Vec<EventRecord> {
        self.journal
            .iter()
            .filter(|record| record.epoch == epoch)
            .cloned()
            .collect()
    }
}
