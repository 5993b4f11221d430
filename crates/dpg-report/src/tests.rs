// Reports built from live engines

#[cfg(test)]
mod tests {
    use crate::*;
    use dpg_actors::ActorRegistry;
    use dpg_settlement::{DonationEngine, EngineConfig};
    use dpg_types::{Address, Amount, Call, DpgError};

    const T0: u64 = 1_700_000_000;
    const DAY: u64 = 86_400;

    fn engine() -> DonationEngine<ActorRegistry> {
        let owner = Address::from_low_u64_be(1);
        let mut registry = ActorRegistry::new(owner);
        registry
            .add_collector(&Call::new(owner, T0), Address::from_low_u64_be(2))
            .unwrap();
        DonationEngine::new(EngineConfig::default(), registry, T0).unwrap()
    }

    #[test]
    fn test_report_determinism() {
        let mut engine = engine();
        engine
            .deposit(
                &Call::new(Address::from_low_u64_be(9), T0).with_value(Amount::from_ether(4)),
                4,
            )
            .unwrap();
        engine
            .report_destroyed(&Call::new(Address::from_low_u64_be(2), T0 + DAY), 4)
            .unwrap();

        let reporter = MemoryReporter::new();
        let first = report_epoch(&reporter, &engine, 1).unwrap();
        let second = report_epoch(&reporter, &engine, 1).unwrap();

        assert_eq!(first.input_hash, second.input_hash);
        assert_eq!(first.output_hash, second.output_hash);
        assert_eq!(first.variant, "donation");
        assert_eq!(
            first.report_data.outputs["accrued"],
            serde_json::json!(Amount::from_ether(2).to_string())
        );
    }

    #[test]
    fn test_report_changes_with_activity() {
        let mut engine = engine();
        let reporter = MemoryReporter::new();
        let before = report_epoch(&reporter, &engine, 1).unwrap();

        engine
            .deposit(
                &Call::new(Address::from_low_u64_be(9), T0).with_value(Amount::from_ether(1)),
                1,
            )
            .unwrap();
        let after = report_epoch(&reporter, &engine, 1).unwrap();

        assert_ne!(before.input_hash, after.input_hash);
        assert_ne!(before.output_hash, after.output_hash);
    }

    #[test]
    fn test_future_epoch_has_no_report() {
        let engine = engine();
        let result = report_epoch(&MemoryReporter::new(), &engine, 2);
        assert!(matches!(result, Err(DpgError::TooEarly(2))));
    }
}
