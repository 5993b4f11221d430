use dpg_actors::Authorizer;
use dpg_types::{Amount, Call, DpgError, Result};

use crate::engine::{Engine, Variant};
use crate::events::Event;

impl<S: Variant, A: Authorizer> Engine<S, A> {
    /// Escrow the deposit for `count` units; the attached value must be exactly `count * unit_price`
    pub fn deposit(&mut self, call: &Call, count: u64) -> Result<()> {
        self.atomically(|engine| {
            let expected = engine.deposit_value(count)?;
            if call.value != expected {
                return Err(DpgError::ValueMismatch {
                    expected,
                    attached: call.value,
                });
            }

            engine.receive(call)?;
            engine.core.deposit_pool = engine.core.deposit_pool.checked_add(expected)?;

            tracing::debug!(by = %call.sender, count, value = %expected, "deposit accepted");
            engine.emit(
                call.now,
                Event::Deposited {
                    by: call.sender,
                    count,
                    value: expected,
                },
            );
            Ok(())
        })
    }

    /// Pay back the deposit of `count` units to the caller.
    /// Deposits are pooled: any caller may refund any count the pool still covers.
    pub fn refund(&mut self, call: &Call, count: u64) -> Result<Amount> {
        self.atomically(|engine| {
            let value = engine.deposit_value(count)?;
            engine.core.deposit_pool = engine.core.deposit_pool.checked_sub(value)?;
            engine.pay(&call.sender, value)?;

            tracing::debug!(to = %call.sender, count, %value, "deposit refunded");
            engine.emit(
                call.now,
                Event::Refunded {
                    to: call.sender,
                    count,
                    value,
                },
            );
            Ok(value)
        })
    }

    /// Take the deposits of `count` destroyed units out of the deposit pool.
    /// Destroyed units are never refunded; fails when the pool cannot cover them.
    pub(crate) fn release_deposits(&mut self, count: u64) -> Result<Amount> {
        let released = self.config.unit_price.checked_mul_count(count)?;
        self.core.deposit_pool = self.core.deposit_pool.checked_sub(released)?;
        Ok(released)
    }

    /// Deposit value of `count` units, rejecting counts below one
    pub(crate) fn deposit_value(&self, count: u64) -> Result<Amount> {
        if count < 1 {
            return Err(DpgError::InvalidCount(count));
        }
        self.config.unit_price.checked_mul_count(count)
    }
}
