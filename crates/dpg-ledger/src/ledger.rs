use dpg_types::{Address, Amount, Result};

/// Native value ledger: the atomic payment primitive the settlement engine pays through.
/// Every operation either fully applies or returns an error without changing balances.
pub trait Ledger {
    /// Credit value arriving from outside the ledger (value attached to a call)
    fn credit(&mut self, account: &Address, amount: Amount) -> Result<()>;

    /// Move value between accounts
    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<()>;

    /// Balance of an account (zero for unknown accounts)
    fn balance(&self, account: &Address) -> Amount;

    /// Get a snapshot of all balances (for checkpoint/restore)
    fn snapshot(&self) -> LedgerSnapshot;

    /// Restore from a snapshot
    fn restore(&mut self, snapshot: &LedgerSnapshot) -> Result<()>;
}

/// Snapshot of ledger state for checkpoint/restore
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LedgerSnapshot {
    pub balances: std::collections::BTreeMap<Address, Amount>,
}

impl LedgerSnapshot {
    /// Sum of all balances in the snapshot
    pub fn total(&self) -> Result<Amount> {
        self.balances
            .values()
            .try_fold(Amount::ZERO, |acc, amount| acc.checked_add(*amount))
    }
}
