use tracing::{debug, info};

use common::{Action, CurrencyPair};
use risk::{take_profit_reached, RiskManager};
use strategy::BollingerBands;

/// RSI under which a new entry is allowed.
const RSI_ENTRY_CEILING: f64 = 45.0;

/// RSI above which an open position is closed.
const RSI_OVERBOUGHT: f64 = 70.0;

/// Position held on the selected pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PositionState {
    /// No position, entries allowed.
    #[default]
    Flat,
    /// Just took profit; no entries until price drops under the mid-band.
    Cooldown,
    /// Bought at `entry_price`.
    Holding { entry_price: f64 },
}

impl PositionState {
    pub fn is_position_active(&self) -> bool {
        matches!(self, PositionState::Holding { .. })
    }

    pub fn is_cooling_down(&self) -> bool {
        matches!(self, PositionState::Cooldown)
    }

    pub fn entry_price(&self) -> Option<f64> {
        match self {
            PositionState::Holding { entry_price } => Some(*entry_price),
            _ => None,
        }
    }
}

/// Indicator values and balances for one decision cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionInputs {
    pub bands: BollingerBands,
    pub ema_fast_9: f64,
    pub ema_fast_13: f64,
    pub ema_slow_20: f64,
    pub ema_slow_50: f64,
    pub rsi_latest: f64,
    pub volume_anomaly: bool,
    pub primary_balance: f64,
    pub secondary_balance: f64,
    pub price: f64,
}

impl DecisionInputs {
    /// `ema_fast_9 < ema_fast_13`. Despite the name, this is the 9-period EMA
    /// sitting *below* the 13-period one.
    pub fn quick_above_slow(&self) -> bool {
        self.ema_fast_9 < self.ema_fast_13
    }

    /// `ema_slow_20 < ema_slow_50`, same inverted sense as [`Self::quick_above_slow`].
    pub fn swifter_above_swift(&self) -> bool {
        self.ema_slow_20 < self.ema_slow_50
    }
}

/// Which rule produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Portfolio value under the floor.
    PortfolioFloor,
    /// Cooldown ended because price fell under the mid-band.
    CooldownCleared,
    /// Still cooling down.
    CoolingDown,
    /// All entry conditions met.
    Entry,
    /// Price more than 20% over entry.
    TakeProfit,
    /// Upper band above price with the fast EMAs crossed, or RSI overbought.
    Exit,
    /// Nothing to do.
    NoSignal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub reason: Reason,
}

/// The buy/sell/pass state machine. Rules are checked top to bottom and the
/// first match wins:
///
/// 1. portfolio under the floor: pass
/// 2. cooldown: pass, back to flat once the mid-band is above price
/// 3. flat and every entry condition holds: buy, hold at the current price
/// 4. holding and take-profit reached: sell everything, cool down
/// 5. holding and exit condition: sell everything, back to flat
/// 6. pass
#[derive(Debug, Clone, Copy)]
pub struct DecisionEngine {
    risk: RiskManager,
}

impl DecisionEngine {
    pub fn new(risk: RiskManager) -> Self {
        Self { risk }
    }

    pub fn risk(&self) -> &RiskManager {
        &self.risk
    }

    /// Decide for `pair` and apply the resulting transition to `position`.
    pub fn decide(
        &self,
        pair: &CurrencyPair,
        position: &mut PositionState,
        inputs: &DecisionInputs,
    ) -> Decision {
        let decision = self.evaluate(pair, position, inputs);
        match decision.action {
            Action::Pass => debug!(reason = ?decision.reason, state = ?position, "pass"),
            ref action => info!(%action, reason = ?decision.reason, price = inputs.price, "Trade decided"),
        }
        decision
    }

    fn evaluate(
        &self,
        pair: &CurrencyPair,
        position: &mut PositionState,
        inputs: &DecisionInputs,
    ) -> Decision {
        let price = inputs.price;

        if self
            .risk
            .below_floor(inputs.primary_balance, inputs.secondary_balance, price)
        {
            return pass(Reason::PortfolioFloor);
        }

        match *position {
            PositionState::Cooldown => {
                if inputs.bands.mid > price {
                    *position = PositionState::Flat;
                    pass(Reason::CooldownCleared)
                } else {
                    pass(Reason::CoolingDown)
                }
            }

            PositionState::Flat => {
                if self.entry_signal(inputs) {
                    *position = PositionState::Holding { entry_price: price };
                    Decision {
                        action: Action::Buy {
                            pair: pair.clone(),
                            quantity: self.risk.order_quantity(inputs.primary_balance, price),
                        },
                        reason: Reason::Entry,
                    }
                } else {
                    pass(Reason::NoSignal)
                }
            }

            PositionState::Holding { entry_price } => {
                if take_profit_reached(entry_price, price) {
                    *position = PositionState::Cooldown;
                    sell_all(pair, inputs, Reason::TakeProfit)
                } else if exit_signal(inputs) {
                    *position = PositionState::Flat;
                    sell_all(pair, inputs, Reason::Exit)
                } else {
                    pass(Reason::NoSignal)
                }
            }
        }
    }

    fn entry_signal(&self, inputs: &DecisionInputs) -> bool {
        let price = inputs.price;
        inputs.bands.mid < price
            && inputs.quick_above_slow()
            && inputs.swifter_above_swift()
            && inputs.ema_slow_50 > price
            && inputs.rsi_latest < RSI_ENTRY_CEILING
            && inputs.volume_anomaly
    }
}

fn exit_signal(inputs: &DecisionInputs) -> bool {
    (inputs.bands.upper > inputs.price && !inputs.quick_above_slow())
        || inputs.rsi_latest > RSI_OVERBOUGHT
}

fn pass(reason: Reason) -> Decision {
    Decision {
        action: Action::Pass,
        reason,
    }
}

fn sell_all(pair: &CurrencyPair, inputs: &DecisionInputs, reason: Reason) -> Decision {
    Decision {
        action: Action::Sell {
            pair: pair.clone(),
            quantity: inputs.secondary_balance,
        },
        reason,
    }
}
