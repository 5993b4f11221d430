use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles granted by the actor registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Deploying settlement authority
    Owner,
    /// Garbage collector allowed to report destroyed units
    Collector,
    /// Environmental agency receiving donations
    Agency,
    /// Retail reporter of reusable purchases
    Retailer,
}

impl Role {
    /// Roles the owner can grant and revoke
    pub fn grantable() -> &'static [Role] {
        &[Role::Collector, Role::Agency, Role::Retailer]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Collector => "collector",
            Role::Agency => "agency",
            Role::Retailer => "retailer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(String);

impl FromStr for Role {
    type Err = ParseRoleError;

    /// Accepts singular and plural role names, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "collector" | "collectors" => Ok(Role::Collector),
            "agency" | "agencies" => Ok(Role::Agency),
            "retailer" | "retailers" => Ok(Role::Retailer),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
