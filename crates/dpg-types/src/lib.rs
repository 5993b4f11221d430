mod address;
mod amount;
mod call;
mod epoch;
mod error;
mod role;

pub use address::{Address, ParseAddressError};
pub use amount::{Amount, BPS_DENOMINATOR};
pub use call::Call;
pub use epoch::{Epoch, EpochIndex, PeriodClock, Rollover, Timestamp, EPOCH_LENGTH_SECS};
pub use error::{DpgError, Result};
pub use role::{ParseRoleError, Role};

/// Identifier of a tracked one-way unit
pub type UnitId = u64;
