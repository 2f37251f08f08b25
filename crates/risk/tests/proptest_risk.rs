use proptest::prelude::*;
use risk::{take_profit_reached, RiskConfig, RiskManager, SAVER_RESERVE};

proptest! {
    /// Sizing on randomized balances and prices must never panic and never
    /// spend the saver reserve.
    #[test]
    fn order_quantity_respects_reserve(
        balance in 0.0f64..1_000_000.0f64,
        price in 0.0001f64..1_000_000.0f64,
        risk_fraction in 0.0f64..=1.0f64,
        saver_mode in any::<bool>(),
    ) {
        let manager = RiskManager::new(RiskConfig { risk_fraction, saver_mode });
        let quantity = manager.order_quantity(balance, price);
        prop_assert!(quantity >= 0.0);

        let spend = quantity * price;
        let budget = if saver_mode && balance > SAVER_RESERVE {
            balance - SAVER_RESERVE
        } else {
            balance
        };
        prop_assert!(spend <= budget * (1.0 + 1e-9) + 1e-9);
    }

    /// Exposure percentages round-trip into a fraction in [0, 1].
    #[test]
    fn exposure_in_range_is_accepted(pct in 0i64..=100, keep in prop::sample::select(vec!["yes", "no", "YES", "No"])) {
        let json = format!(r#"{{"exposure in %": {pct}, "keep dollars": "{keep}"}}"#);
        let cfg = RiskConfig::from_json(&json).unwrap();
        prop_assert!((cfg.risk_fraction - pct as f64 / 100.0).abs() < 1e-12);
        prop_assert_eq!(cfg.saver_mode, keep.eq_ignore_ascii_case("yes"));
    }

    #[test]
    fn exposure_out_of_range_is_rejected(pct in prop_oneof![-1000i64..0, 101i64..1000]) {
        let json = format!(r#"{{"exposure in %": "{pct}", "keep dollars": "no"}}"#);
        let err = RiskConfig::from_json(&json).unwrap_err();
        prop_assert_eq!(err.exit_code(), 84);
    }

    /// Take-profit agrees with the plain comparison for finite prices.
    #[test]
    fn take_profit_matches_threshold(
        entry in 0.0001f64..1_000_000.0f64,
        price in 0.0001f64..1_000_000.0f64,
    ) {
        prop_assert_eq!(take_profit_reached(entry, price), entry * 1.2 < price);
    }
}
