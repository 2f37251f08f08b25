use proptest::prelude::*;

use common::{Action, CurrencyPair};
use engine::{DecisionEngine, DecisionInputs, PositionState, Reason};
use risk::{RiskConfig, RiskManager};
use strategy::BollingerBands;

fn price() -> impl Strategy<Value = f64> {
    0.01f64..10_000.0
}

fn position() -> impl Strategy<Value = PositionState> {
    prop_oneof![
        Just(PositionState::Flat),
        Just(PositionState::Cooldown),
        price().prop_map(|entry_price| PositionState::Holding { entry_price }),
    ]
}

prop_compose! {
    fn inputs()(
        mid in price(),
        spread in 0.0f64..100.0,
        emas in prop::array::uniform4(price()),
        rsi_latest in prop_oneof![Just(f64::NAN), 0.0f64..=100.0],
        volume_anomaly in any::<bool>(),
        primary_balance in 0.0f64..100_000.0,
        secondary_balance in 0.0f64..100.0,
        price in price(),
    ) -> DecisionInputs {
        DecisionInputs {
            bands: BollingerBands { lower: mid - spread, mid, upper: mid + spread },
            ema_fast_9: emas[0],
            ema_fast_13: emas[1],
            ema_slow_20: emas[2],
            ema_slow_50: emas[3],
            rsi_latest,
            volume_anomaly,
            primary_balance,
            secondary_balance,
            price,
        }
    }
}

fn engine(risk_fraction: f64, saver_mode: bool) -> DecisionEngine {
    DecisionEngine::new(RiskManager::new(RiskConfig { risk_fraction, saver_mode }))
}

proptest! {
    /// Identical state and inputs give identical actions and transitions.
    #[test]
    fn decisions_are_deterministic(
        start in position(),
        inputs in inputs(),
        risk_fraction in 0.0f64..=1.0,
        saver_mode in any::<bool>(),
    ) {
        let engine = engine(risk_fraction, saver_mode);
        let pair = CurrencyPair::new("USDT", "BTC");
        let (mut a, mut b) = (start, start);
        let first = engine.decide(&pair, &mut a, &inputs);
        let second = engine.decide(&pair, &mut b, &inputs);
        prop_assert_eq!(first, second);
        prop_assert_eq!(a, b);
    }

    /// Transitions only ever follow the edges of the state machine.
    #[test]
    fn transitions_follow_the_rules(start in position(), inputs in inputs()) {
        let engine = engine(0.5, false);
        let pair = CurrencyPair::new("USDT", "BTC");
        let mut state = start;
        let decision = engine.decide(&pair, &mut state, &inputs);

        match (&decision.action, start, state) {
            (Action::Pass, from, to) if from == to => {}
            (Action::Pass, PositionState::Cooldown, PositionState::Flat) => {
                prop_assert_eq!(decision.reason, Reason::CooldownCleared);
            }
            (Action::Buy { quantity, .. }, PositionState::Flat, PositionState::Holding { entry_price }) => {
                prop_assert_eq!(entry_price, inputs.price);
                prop_assert!(*quantity >= 0.0);
            }
            (Action::Sell { quantity, .. }, PositionState::Holding { .. }, to) => {
                prop_assert_eq!(*quantity, inputs.secondary_balance);
                prop_assert!(matches!(to, PositionState::Flat | PositionState::Cooldown));
            }
            other => prop_assert!(false, "unexpected transition {:?}", other),
        }

        if inputs.primary_balance + inputs.secondary_balance * inputs.price < 200.0 {
            prop_assert_eq!(decision.action, Action::Pass);
            prop_assert_eq!(state, start);
        }
    }
}
