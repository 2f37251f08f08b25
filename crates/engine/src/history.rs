use std::collections::HashMap;

use common::Candle;
use strategy::{rsi, RSI_PERIOD};

/// Cache key of the per-pair RSI series.
pub const RSI_INDICATOR: &str = "rsi";

/// Append-only candle columns for one pair, oldest first, plus the last
/// computed indicator series keyed by name.
///
/// The six columns always have the same length.
#[derive(Debug, Clone, Default)]
pub struct InstrumentHistory {
    dates: Vec<i64>,
    opens: Vec<f64>,
    highs: Vec<f64>,
    lows: Vec<f64>,
    closes: Vec<f64>,
    volumes: Vec<f64>,
    indicators: HashMap<String, Vec<f64>>,
}

impl InstrumentHistory {
    pub fn push(&mut self, candle: &Candle) {
        self.dates.push(candle.date);
        self.opens.push(candle.open);
        self.highs.push(candle.high);
        self.lows.push(candle.low);
        self.closes.push(candle.close);
        self.volumes.push(candle.volume);
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn dates(&self) -> &[i64] {
        &self.dates
    }

    pub fn opens(&self) -> &[f64] {
        &self.opens
    }

    pub fn highs(&self) -> &[f64] {
        &self.highs
    }

    pub fn lows(&self) -> &[f64] {
        &self.lows
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn volumes(&self) -> &[f64] {
        &self.volumes
    }

    pub fn last_close(&self) -> Option<f64> {
        self.closes.last().copied()
    }

    /// Most recently cached series for `name`, if any.
    pub fn indicator(&self, name: &str) -> Option<&[f64]> {
        self.indicators.get(name).map(Vec::as_slice)
    }

    /// Recompute the cached RSI from the full close history.
    pub fn refresh_rsi(&mut self) {
        let series = rsi(&self.closes, RSI_PERIOD).collect();
        self.indicators.insert(RSI_INDICATOR.to_string(), series);
    }

    /// Latest cached RSI, `NaN` when nothing is cached or the value is undefined.
    pub fn latest_rsi(&self) -> f64 {
        self.indicator(RSI_INDICATOR)
            .and_then(|s| s.last().copied())
            .unwrap_or(f64::NAN)
    }
}

/// Candle history for every pair seen so far.
#[derive(Debug, Clone, Default)]
pub struct MarketStore {
    pairs: HashMap<String, InstrumentHistory>,
}

impl MarketStore {
    /// Append a candle to its pair's history, creating the history on first sight.
    pub fn append(&mut self, candle: &Candle) {
        self.pairs.entry(candle.pair.clone()).or_default().push(candle);
    }

    pub fn get(&self, pair: &str) -> Option<&InstrumentHistory> {
        self.pairs.get(pair)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Refresh the RSI cache of every known pair.
    pub fn refresh_rsi(&mut self) {
        for history in self.pairs.values_mut() {
            history.refresh_rsi();
        }
    }
}
