use tracing::warn;

use crate::config::RiskConfig;

/// Primary-currency balance never spent while saver mode is on.
pub const SAVER_RESERVE: f64 = 1000.0;

/// Portfolio value, in primary currency, below which the bot stops trading.
pub const PORTFOLIO_FLOOR: f64 = 200.0;

/// Price multiple of the entry at which an open position is taken as profit.
pub const TAKE_PROFIT_MULTIPLIER: f64 = 1.2;

/// Money rules applied around every decision: how much may be bought, when
/// the portfolio is too small to trade and when a position has paid off.
#[derive(Debug, Clone, Copy)]
pub struct RiskManager {
    config: RiskConfig,
}

impl RiskManager {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Units of the secondary currency the primary balance can buy at `price`,
    /// keeping [`SAVER_RESERVE`] aside in saver mode.
    pub fn available_quantity(&self, primary_balance: f64, price: f64) -> f64 {
        if self.config.saver_mode && primary_balance > SAVER_RESERVE {
            (primary_balance - SAVER_RESERVE) / price
        } else {
            primary_balance / price
        }
    }

    /// Quantity to put on a buy order: the available quantity scaled by the
    /// configured risk fraction.
    pub fn order_quantity(&self, primary_balance: f64, price: f64) -> f64 {
        self.available_quantity(primary_balance, price) * self.config.risk_fraction
    }

    /// True when the whole portfolio, valued at `price`, is under
    /// [`PORTFOLIO_FLOOR`].
    pub fn below_floor(&self, primary_balance: f64, secondary_balance: f64, price: f64) -> bool {
        primary_balance + secondary_balance * price < PORTFOLIO_FLOOR
    }
}

/// True when `price` is more than 20% above `entry_price`.
///
/// A non-finite price on either side cannot be compared; it is logged and
/// counts as "not reached".
pub fn take_profit_reached(entry_price: f64, price: f64) -> bool {
    if !entry_price.is_finite() || !price.is_finite() {
        warn!(entry_price, price, "Cannot compare position prices, skipping take-profit");
        return false;
    }
    entry_price * TAKE_PROFIT_MULTIPLIER < price
}
