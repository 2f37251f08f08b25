use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One OHLCV observation for one instrument pair, as delivered by a
/// `next_candles` update. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub pair: String,
    /// Unix timestamp in seconds.
    pub date: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Candle date as a UTC timestamp, `None` if it is out of chrono's range.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }
}

/// A trading pair named `"<primary>_<secondary>"`, e.g. `USDT_BTC`.
///
/// The primary currency is the one we pay with, the secondary the one we buy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub primary: String,
    pub secondary: String,
}

impl CurrencyPair {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// Split a pair name on `_`. Exactly two non-empty halves are required.
    pub fn parse(name: &str) -> Result<Self> {
        match name.split_once('_') {
            Some((primary, secondary))
                if !primary.is_empty() && !secondary.is_empty() && !secondary.contains('_') =>
            {
                Ok(Self::new(primary, secondary))
            }
            _ => Err(Error::InvalidPair(name.to_string())),
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.primary, self.secondary)
    }
}

/// The single line emitted for each `action` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Buy { pair: CurrencyPair, quantity: f64 },
    Sell { pair: CurrencyPair, quantity: f64 },
    Pass,
}

impl Action {
    pub fn is_pass(&self) -> bool {
        matches!(self, Action::Pass)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy { pair, quantity } => write!(f, "buy {pair} {}", Quantity(*quantity)),
            Action::Sell { pair, quantity } => write!(f, "sell {pair} {}", Quantity(*quantity)),
            Action::Pass => write!(f, "pass"),
        }
    }
}

/// Float rendering that always keeps a fractional part (`50.0`, not `50`).
struct Quantity(f64);

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}
