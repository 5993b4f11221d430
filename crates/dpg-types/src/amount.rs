use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{DpgError, Result};

/// Basis points denominator (1 bps = 1/10_000)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Smallest units per whole native coin (10^18)
const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Native value amount in the smallest indivisible unit ("wei")
/// Serialized as a decimal string so JSON clients never lose precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u128);

impl Amount {
    /// Zero amount
    pub const ZERO: Amount = Amount(0);

    pub const fn from_wei(wei: u128) -> Self {
        Amount(wei)
    }

    /// Create from whole coins
    pub const fn from_ether(ether: u64) -> Self {
        Amount((ether as u128) * WEI_PER_ETHER)
    }

    pub const fn wei(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(&self, other: Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or_else(|| DpgError::Overflow("amount addition".to_string()))
    }

    /// Subtraction that fails when `other` exceeds `self`
    pub fn checked_sub(&self, other: Self) -> Result<Self> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or(DpgError::InsufficientFunds {
                requested: other,
                available: *self,
            })
    }

    /// Multiply by a unit count
    pub fn checked_mul_count(&self, count: u64) -> Result<Self> {
        self.0
            .checked_mul(count as u128)
            .map(Amount)
            .ok_or_else(|| DpgError::Overflow("amount multiplication".to_string()))
    }

    /// `self * numerator / denominator`, rounded down
    pub fn mul_ratio(&self, numerator: u64, denominator: u64) -> Result<Self> {
        if denominator == 0 {
            return Err(DpgError::Overflow("ratio with zero denominator".to_string()));
        }
        self.0
            .checked_mul(numerator as u128)
            .map(|scaled| Amount(scaled / denominator as u128))
            .ok_or_else(|| DpgError::Overflow("ratio multiplication".to_string()))
    }

    /// Fraction of this amount in basis points, rounded down
    pub fn bps(&self, bps: u32) -> Result<Self> {
        self.0
            .checked_mul(bps as u128)
            .map(|scaled| Amount(scaled / BPS_DENOMINATOR))
            .ok_or_else(|| DpgError::Overflow("basis point multiplication".to_string()))
    }

    /// Integer division into `parts` equal shares, rounded down
    pub fn split(&self, parts: usize) -> Amount {
        if parts == 0 {
            return Amount::ZERO;
        }
        Amount(self.0 / parts as u128)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Amount {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<u128>().map(Amount)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_arithmetic() {
        let a = Amount::from_ether(3);
        let b = Amount::from_ether(1);

        assert_eq!(a.checked_add(b).unwrap(), Amount::from_ether(4));
        assert_eq!(a.checked_sub(b).unwrap(), Amount::from_ether(2));
        assert!(matches!(
            b.checked_sub(a),
            Err(DpgError::InsufficientFunds { .. })
        ));
        assert_eq!(b.checked_mul_count(3).unwrap(), a);
    }

    #[test]
    fn test_fractions() {
        let price = Amount::from_ether(1);

        assert_eq!(price.bps(5_000).unwrap(), Amount::from_wei(500_000_000_000_000_000));
        assert_eq!(price.bps(2_000).unwrap(), Amount::from_wei(200_000_000_000_000_000));
        assert_eq!(Amount::from_wei(10).mul_ratio(1, 3).unwrap(), Amount::from_wei(3));
        assert_eq!(Amount::from_wei(7).split(2), Amount::from_wei(3));
        assert_eq!(Amount::from_wei(7).split(0), Amount::ZERO);
    }

    #[test]
    fn test_overflow_is_reported() {
        let huge = Amount::from_wei(u128::MAX);
        assert!(matches!(huge.checked_add(Amount::from_wei(1)), Err(DpgError::Overflow(_))));
        assert!(matches!(huge.checked_mul_count(2), Err(DpgError::Overflow(_))));
    }

    #[test]
    fn test_serde_as_decimal_string() {
        let a = Amount::from_ether(2);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "\"2000000000000000000\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(a, back);
    }
}
