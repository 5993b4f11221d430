//! Shared fixtures for the end-to-end settlement scenarios

use dpg_actors::ActorRegistry;
use dpg_settlement::{Engine, EngineConfig, Variant};
use dpg_types::{Address, Amount, Call, Role, Timestamp};

/// Deployment time used by every scenario
pub const T0: Timestamp = 1_700_000_000;
pub const DAY: u64 = 86_400;

pub const OWNER: Address = Address::new([0x01; 20]);
pub const COLLECTOR_A: Address = Address::new([0x0c; 20]);
pub const RETAIL: Address = Address::new([0x0e; 20]);

pub fn account(n: u64) -> Address {
    Address::from_low_u64_be(0x1000 + n)
}

pub fn ether(n: u64) -> Amount {
    Amount::from_ether(n)
}

/// `n / 10` ether
pub fn tenths(n: u64) -> Amount {
    Amount::from_wei(n as u128 * 100_000_000_000_000_000)
}

/// Engine deployed at [`T0`] with default constants and an empty registry owned by [`OWNER`]
pub fn deploy<S: Variant + Default>() -> Engine<S, ActorRegistry> {
    deploy_with(EngineConfig::default())
}

pub fn deploy_with<S: Variant + Default>(config: EngineConfig) -> Engine<S, ActorRegistry> {
    Engine::new(config, ActorRegistry::new(OWNER), T0).expect("default config is valid")
}

/// Retail escrows the deposits of `count` units at [`T0`]
pub fn sell<S: Variant>(engine: &mut Engine<S, ActorRegistry>, count: u64) {
    let value = engine
        .config()
        .unit_price
        .checked_mul_count(count)
        .expect("deposit value fits");
    engine
        .deposit(&Call::new(RETAIL, T0).with_value(value), count)
        .expect("retail deposit is accepted");
}

/// Owner grants `role` to `who` at time `now`
pub fn approve<S: Variant>(engine: &mut Engine<S, ActorRegistry>, role: Role, who: Address, now: Timestamp) {
    engine
        .authorizer_mut()
        .add(&Call::new(OWNER, now), role, who)
        .expect("owner can approve actors");
}
