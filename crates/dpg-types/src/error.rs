use thiserror::Error;

use crate::{Address, Amount, EpochIndex, Role, UnitId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DpgError {
    #[error("Invalid count: {0} (must be at least 1)")]
    InvalidCount(u64),

    #[error("Value mismatch: expected {expected}, attached {attached}")]
    ValueMismatch { expected: Amount, attached: Amount },

    #[error("Zero address is not allowed")]
    ZeroAddress,

    #[error("Unauthorized: {caller} is not an approved {role}")]
    Unauthorized { role: Role, caller: Address },

    #[error("Already approved: {0}")]
    AlreadyApproved(Address),

    #[error("Not approved: {0}")]
    NotApproved(Address),

    #[error("Too early: no settlement is payable in epoch {0}")]
    TooEarly(EpochIndex),

    #[error("Not yet eligible: {0} has not participated for a full epoch")]
    NotYetEligible(Address),

    #[error("Already claimed: {caller} settled in epoch {epoch}")]
    AlreadyClaimed { caller: Address, epoch: EpochIndex },

    #[error("Nothing to claim for {0}")]
    NothingToClaim(Address),

    #[error("Duplicate unit identifier in one call: {0}")]
    DuplicateUnit(UnitId),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Amount, available: Amount },

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DpgError {
    /// Stable snake_case code for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            DpgError::InvalidCount(_) => "invalid_count",
            DpgError::ValueMismatch { .. } => "value_mismatch",
            DpgError::ZeroAddress => "zero_address",
            DpgError::Unauthorized { .. } => "unauthorized",
            DpgError::AlreadyApproved(_) => "already_approved",
            DpgError::NotApproved(_) => "not_approved",
            DpgError::TooEarly(_) => "too_early",
            DpgError::NotYetEligible(_) => "not_yet_eligible",
            DpgError::AlreadyClaimed { .. } => "already_claimed",
            DpgError::NothingToClaim(_) => "nothing_to_claim",
            DpgError::DuplicateUnit(_) => "duplicate_unit",
            DpgError::InsufficientFunds { .. } => "insufficient_funds",
            DpgError::Overflow(_) => "overflow",
            DpgError::Config(_) => "config",
            DpgError::Serialization(_) => "serialization",
        }
    }
}

pub type Result<T> = std::result::Result<T, DpgError>;
