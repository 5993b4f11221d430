use dpg_integration_tests::*;
use dpg_settlement::RewardState;
use dpg_types::{Address, Call, DpgError, Role};

fn reward_engine() -> dpg_settlement::RewardEngine<dpg_actors::ActorRegistry> {
    let mut engine = deploy::<RewardState>();
    approve(&mut engine, Role::Collector, COLLECTOR_A, T0);
    approve(&mut engine, Role::Retailer, RETAIL, T0);
    sell(&mut engine, 4);
    engine
}

#[test]
fn test_purchase_reports() {
    let consumer_a = account(1);
    let mut engine = reward_engine();
    let report = Call::new(RETAIL, T0);

    assert_eq!(
        engine.report_purchase(&report, consumer_a, 0),
        Err(DpgError::InvalidCount(0))
    );
    assert_eq!(
        engine.report_purchase(&report, Address::ZERO, 3),
        Err(DpgError::ZeroAddress)
    );

    engine.report_purchase(&report, consumer_a, 100).unwrap();
    assert_eq!(engine.purchases_of(&consumer_a), 100);
    assert_eq!(engine.total_purchases(), 100);

    engine.report_purchase(&report, consumer_a, 50).unwrap();
    assert_eq!(engine.purchases_of(&consumer_a), 150);
    assert_eq!(engine.total_purchases(), 150);
}

#[test]
fn test_reward_claim_lifecycle() {
    let consumer_a = account(1);
    let mut engine = reward_engine();

    assert_eq!(
        engine.claim_reward(&Call::new(consumer_a, T0)),
        Err(DpgError::TooEarly(1))
    );
    assert_eq!(
        engine.claim_reward(&Call::new(consumer_a, T0 + 28 * DAY)),
        Err(DpgError::NothingToClaim(consumer_a))
    );

    // Purchases without any garbage report leave nothing to share
    engine
        .report_purchase(&Call::new(RETAIL, T0 + 28 * DAY), consumer_a, 3)
        .unwrap();
    assert_eq!(
        engine.claim_reward(&Call::new(consumer_a, T0 + 56 * DAY)),
        Err(DpgError::NothingToClaim(consumer_a))
    );

    engine
        .report_purchase(&Call::new(RETAIL, T0 + 56 * DAY), consumer_a, 3)
        .unwrap();
    engine
        .report_destroyed(&Call::new(COLLECTOR_A, T0 + 56 * DAY), 2)
        .unwrap();
    let now = T0 + 84 * DAY;
    assert_eq!(engine.claim_reward(&Call::new(consumer_a, now)).unwrap(), ether(1));
    assert!(matches!(
        engine.claim_reward(&Call::new(consumer_a, now)),
        Err(DpgError::AlreadyClaimed { epoch: 4, .. })
    ));
}

#[test]
fn test_missed_share_stays_in_pool() {
    let consumer_a = account(1);
    let mut engine = reward_engine();

    engine
        .report_purchase(&Call::new(RETAIL, T0), consumer_a, 3)
        .unwrap();
    engine.report_destroyed(&Call::new(COLLECTOR_A, T0), 2).unwrap();

    // Reports keep the clock moving while the consumer stays away
    engine
        .report_purchase(&Call::new(RETAIL, T0 + 28 * DAY), consumer_a, 1)
        .unwrap();
    engine
        .report_purchase(&Call::new(RETAIL, T0 + 56 * DAY), consumer_a, 6)
        .unwrap();
    assert_eq!(engine.current_epoch_index(), 3);
    assert_eq!(engine.unclaimed_rewards(), ether(1));

    // Epoch 1's share was never claimed; epoch 2's only buyer now takes the whole pool
    assert_eq!(
        engine
            .claim_reward(&Call::new(consumer_a, T0 + 57 * DAY))
            .unwrap(),
        ether(1)
    );
}

#[test]
fn test_equal_buyers_share_equally() {
    let (consumer_a, consumer_b) = (account(1), account(2));
    let mut engine = reward_engine();

    let report = Call::new(RETAIL, T0);
    engine.report_purchase(&report, consumer_a, 2).unwrap();
    engine.report_purchase(&report, consumer_b, 2).unwrap();
    engine.report_destroyed(&Call::new(COLLECTOR_A, T0), 4).unwrap();

    let now = T0 + 28 * DAY;
    assert_eq!(engine.claim_reward(&Call::new(consumer_a, now)).unwrap(), ether(1));
    assert_eq!(engine.claim_reward(&Call::new(consumer_b, now)).unwrap(), ether(1));
    assert_eq!(engine.unclaimed_rewards(), dpg_types::Amount::ZERO);
    assert_eq!(engine.contract_balance(), engine.deposit_pool().checked_add(ether(2)).unwrap());
}

#[test]
fn test_silent_epochs_drop_snapshot() {
    let consumer_a = account(1);
    let mut engine = reward_engine();

    engine
        .report_purchase(&Call::new(RETAIL, T0), consumer_a, 3)
        .unwrap();
    engine.report_destroyed(&Call::new(COLLECTOR_A, T0), 2).unwrap();

    assert_eq!(
        engine.claim_reward(&Call::new(consumer_a, T0 + 84 * DAY)),
        Err(DpgError::NothingToClaim(consumer_a))
    );
    assert_eq!(engine.unclaimed_rewards(), ether(1));
}
