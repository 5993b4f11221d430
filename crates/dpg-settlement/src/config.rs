use dpg_types::{Address, Amount, DpgError, Result, BPS_DENOMINATOR, EPOCH_LENGTH_SECS};
use serde::{Deserialize, Serialize};

/// Account holding escrowed deposits and accrued pools
pub const DEFAULT_ESCROW_ACCOUNT: Address = Address::new([0xd9; 20]);

/// Deployment constants of a settlement engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Deposit value per unit
    pub unit_price: Amount,

    /// Length of one accounting epoch in seconds
    pub epoch_length_secs: u64,

    /// Share of a destroyed unit's deposit credited to the agency fund
    pub donation_share_bps: u32,

    /// Share of a destroyed unit's deposit credited to consumer rewards
    pub reward_share_bps: u32,

    /// Per-unit surcharge owed by penalized consumers, relative to the unit price
    pub penalty_surcharge_bps: u32,

    /// Self-return ratio below which a consumer with throw-away reports is penalized
    pub penalty_return_threshold_bps: u32,

    /// Ledger account of the engine itself
    pub escrow_account: Address,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            unit_price: Amount::from_ether(1),
            epoch_length_secs: EPOCH_LENGTH_SECS,
            donation_share_bps: 5_000,
            reward_share_bps: 5_000,
            penalty_surcharge_bps: 2_000,
            penalty_return_threshold_bps: 5_000,
            escrow_account: DEFAULT_ESCROW_ACCOUNT,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.unit_price.is_zero() {
            return Err(DpgError::Config("unit price must be positive".to_string()));
        }
        if self.epoch_length_secs == 0 {
            return Err(DpgError::Config("epoch length must be positive".to_string()));
        }
        if self.escrow_account.is_zero() {
            return Err(DpgError::Config("escrow account cannot be the zero address".to_string()));
        }

        let fractions = [
            ("donation_share_bps", self.donation_share_bps),
            ("reward_share_bps", self.reward_share_bps),
            ("penalty_surcharge_bps", self.penalty_surcharge_bps),
            ("penalty_return_threshold_bps", self.penalty_return_threshold_bps),
        ];
        for (name, bps) in fractions {
            if bps as u128 > BPS_DENOMINATOR {
                return Err(DpgError::Config(format!(
                    "{} must be at most {}, got {}",
                    name, BPS_DENOMINATOR, bps
                )));
            }
        }

        Ok(())
    }

    /// Surcharge per unit for penalized consumers
    pub fn penalty_surcharge(&self) -> Result<Amount> {
        self.unit_price.bps(self.penalty_surcharge_bps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.penalty_surcharge().unwrap(),
            Amount::from_wei(200_000_000_000_000_000)
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.donation_share_bps = 10_001;
        assert!(matches!(config.validate(), Err(DpgError::Config(_))));

        let mut config = EngineConfig::default();
        config.unit_price = Amount::ZERO;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.epoch_length_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"unit_price": "250000000000000000"}"#).unwrap();
        assert_eq!(config.unit_price, Amount::from_wei(250_000_000_000_000_000));
        assert_eq!(config.epoch_length_secs, EPOCH_LENGTH_SECS);
    }
}
