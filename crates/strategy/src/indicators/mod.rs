//! Stateless indicator functions over ordered price series (oldest first).

pub mod bollinger;
pub mod moving_average;
pub mod rsi;

pub use bollinger::{bollinger, BollingerBands, BOLLINGER_WINDOW};
pub use moving_average::{ema, sma, std_dev};
pub use rsi::{latest_rsi, rsi, RsiSeries, RSI_PERIOD};
