mod accrual;
mod claims;
mod config;
mod deposit;
mod donation;
mod engine;
mod events;
mod penalty;
mod reward;
mod units;

pub use accrual::{AccrualPool, AccruingVariant};
pub use claims::ClaimBook;
pub use config::{EngineConfig, DEFAULT_ESCROW_ACCOUNT};
pub use donation::{DonationEngine, DonationState};
pub use engine::{Engine, Variant};
pub use events::{Event, EventRecord};
pub use penalty::{ConsumerUnitStats, PenaltyEngine, PenaltyState};
pub use reward::{EpochPurchases, PurchaseBook, RewardEngine, RewardState};
pub use units::{UnitRecord, UnitRegistry};
