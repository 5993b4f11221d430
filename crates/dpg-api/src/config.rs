use dpg_settlement::EngineConfig;
use dpg_types::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ApiError;

/// Environment variable naming the JSON configuration file
pub const CONFIG_ENV: &str = "DPG_CONFIG";

/// Environment variable overriding the owner address
pub const OWNER_ENV: &str = "DPG_OWNER";

/// Which settlement variant a server process runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    #[default]
    Donation,
    Reward,
    Penalty,
}

impl VariantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKind::Donation => "donation",
            VariantKind::Reward => "reward",
            VariantKind::Penalty => "penalty",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub variant: VariantKind,
    /// Settlement authority; administers the actor registry
    pub owner: Address,
    pub engine: EngineConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: "127.0.0.1:3000".to_string(),
            variant: VariantKind::default(),
            owner: Address::ZERO,
            engine: EngineConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Load from the file named by `DPG_CONFIG` (defaults when unset), then
    /// apply the `DPG_OWNER` override
    pub fn load() -> Result<Self, ApiError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => ApiConfig::default(),
        };

        if let Ok(owner) = std::env::var(OWNER_ENV) {
            config.owner = owner
                .parse()
                .map_err(|e| ApiError::Config(format!("{}: {}", OWNER_ENV, e)))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| ApiError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.owner.is_zero() {
            return Err(ApiError::Config(format!(
                "an owner address is required (set `owner` or {})",
                OWNER_ENV
            )));
        }
        self.engine.validate()?;
        Ok(())
    }
}
