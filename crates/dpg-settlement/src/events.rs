use dpg_types::{Address, Amount, EpochIndex, Timestamp, UnitId};
use serde::{Deserialize, Serialize};

/// Observable outcome of a successful call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    EpochAdvanced {
        from: EpochIndex,
        to: EpochIndex,
    },
    Deposited {
        by: Address,
        count: u64,
        value: Amount,
    },
    Refunded {
        to: Address,
        count: u64,
        value: Amount,
    },
    DestroyedReported {
        collector: Address,
        count: u64,
        accrued: Amount,
    },
    DonationClaimed {
        agency: Address,
        amount: Amount,
    },
    PurchaseReported {
        consumer: Address,
        count: u64,
    },
    RewardClaimed {
        consumer: Address,
        amount: Amount,
    },
    UnitsBought {
        to: Address,
        ids: Vec<UnitId>,
        new_units: u64,
        surcharge: Amount,
    },
    UnitsReturned {
        returned_by: Address,
        ids: Vec<UnitId>,
    },
    UnitsThrownAway {
        collector: Address,
        ids: Vec<UnitId>,
        seized: Amount,
    },
    PenaltyWithdrawn {
        consumer: Address,
        amount: Amount,
    },
    SeizedPenaltiesWithdrawn {
        owner: Address,
        amount: Amount,
    },
}

/// Event stamped with the epoch and time it happened in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub epoch: EpochIndex,
    pub timestamp: Timestamp,
    pub event: Event,
}
