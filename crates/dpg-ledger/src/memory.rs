use dpg_types::{Address, Amount, Result};
use std::collections::BTreeMap;

use crate::ledger::{Ledger, LedgerSnapshot};

/// In-memory ledger implementation
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    balances: BTreeMap<Address, Amount>,
}

impl MemoryLedger {
    /// Create a new empty in-memory ledger
    pub fn new() -> Self {
        MemoryLedger {
            balances: BTreeMap::new(),
        }
    }

    fn balance_mut(&mut self, account: &Address) -> &mut Amount {
        self.balances.entry(*account).or_insert(Amount::ZERO)
    }
}

impl Ledger for MemoryLedger {
    fn credit(&mut self, account: &Address, amount: Amount) -> Result<()> {
        let updated = self.balance(account).checked_add(amount)?;
        *self.balance_mut(account) = updated;
        Ok(())
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<()> {
        if amount.is_zero() || from == to {
            // Still enforce that the sender could have paid
            self.balance(from).checked_sub(amount)?;
            return Ok(());
        }

        // Compute both sides before touching either balance
        let from_after = self.balance(from).checked_sub(amount)?;
        let to_after = self.balance(to).checked_add(amount)?;

        *self.balance_mut(from) = from_after;
        *self.balance_mut(to) = to_after;

        tracing::debug!(%from, %to, %amount, "ledger transfer");
        Ok(())
    }

    fn balance(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            balances: self.balances.clone(),
        }
    }

    fn restore(&mut self, snapshot: &LedgerSnapshot) -> Result<()> {
        self.balances = snapshot.balances.clone();
        Ok(())
    }
}
