use dpg_actors::ActorRegistry;
use dpg_settlement::{DonationEngine, EngineConfig, PenaltyEngine, RewardEngine};
use dpg_types::{Address, Call, Result, Timestamp};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::{ApiConfig, VariantKind};
use crate::error::ApiError;

/// Source of the current unix time in seconds
pub type Clock = Arc<dyn Fn() -> Timestamp + Send + Sync>;

/// The single settlement engine a server process runs
#[derive(Debug)]
pub enum Deployment {
    Donation(DonationEngine<ActorRegistry>),
    Reward(RewardEngine<ActorRegistry>),
    Penalty(PenaltyEngine<ActorRegistry>),
}

/// Run `$body` against whichever engine the deployment holds
macro_rules! with_engine {
    ($deployment:expr, |$engine:ident| $body:expr) => {
        match $deployment {
            $crate::state::Deployment::Donation($engine) => $body,
            $crate::state::Deployment::Reward($engine) => $body,
            $crate::state::Deployment::Penalty($engine) => $body,
        }
    };
}
pub(crate) use with_engine;

impl Deployment {
    pub fn deploy(
        variant: VariantKind,
        config: EngineConfig,
        owner: Address,
        now: Timestamp,
    ) -> Result<Self> {
        let registry = ActorRegistry::new(owner);
        Ok(match variant {
            VariantKind::Donation => Deployment::Donation(DonationEngine::new(config, registry, now)?),
            VariantKind::Reward => Deployment::Reward(RewardEngine::new(config, registry, now)?),
            VariantKind::Penalty => Deployment::Penalty(PenaltyEngine::new(config, registry, now)?),
        })
    }

    pub fn kind(&self) -> VariantKind {
        match self {
            Deployment::Donation(_) => VariantKind::Donation,
            Deployment::Reward(_) => VariantKind::Reward,
            Deployment::Penalty(_) => VariantKind::Penalty,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    pub(crate) fn not_offered(&self, operation: &'static str) -> ApiError {
        ApiError::NotOffered {
            operation,
            variant: self.name(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    deployment: Arc<Mutex<Deployment>>,
    clock: Clock,
    started_at: Timestamp,
}

impl AppState {
    /// State driven by the system clock
    pub fn new(deployment: Deployment) -> Self {
        Self::with_clock(deployment, Arc::new(system_now))
    }

    pub fn with_clock(deployment: Deployment, clock: Clock) -> Self {
        let started_at = clock();
        AppState {
            deployment: Arc::new(Mutex::new(deployment)),
            clock,
            started_at,
        }
    }

    pub fn from_config(config: &ApiConfig) -> std::result::Result<Self, ApiError> {
        let deployment =
            Deployment::deploy(config.variant, config.engine.clone(), config.owner, system_now())?;
        Ok(Self::new(deployment))
    }

    pub fn now(&self) -> Timestamp {
        (self.clock)()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.now().saturating_sub(self.started_at)
    }

    pub(crate) fn call(&self, sender: Address) -> Call {
        Call::new(sender, self.now())
    }

    pub(crate) fn deployment(&self) -> std::result::Result<MutexGuard<'_, Deployment>, ApiError> {
        self.deployment.lock().map_err(|_| ApiError::Poisoned)
    }
}

fn system_now() -> Timestamp {
    chrono::Utc::now().timestamp().max(0) as Timestamp
}
