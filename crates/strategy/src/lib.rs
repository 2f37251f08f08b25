//! Technical indicators and the volume-anomaly check.
//!
//! Everything here is a pure function of ordered series (oldest first);
//! state lives in the `engine` crate.

pub mod indicators;
pub mod volume;

pub use indicators::{
    bollinger, ema, latest_rsi, rsi, sma, std_dev, BollingerBands, RsiSeries, BOLLINGER_WINDOW,
    RSI_PERIOD,
};
pub use volume::{is_anomalous_drop, VOLUME_LOOKBACK};
