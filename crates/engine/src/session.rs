use std::collections::HashMap;

use tracing::debug;

use common::{CurrencyPair, Error, Result};
use risk::RiskConfig;
use strategy::{bollinger, ema, is_anomalous_drop, BollingerBands, BOLLINGER_WINDOW};

use crate::decision::{DecisionInputs, PositionState};
use crate::history::MarketStore;
use crate::settings::GameSettings;

/// EMAs and bands derived from the price log on each decision cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorSnapshot {
    pub ema_fast_9: f64,
    pub ema_fast_13: f64,
    pub ema_slow_20: f64,
    pub ema_slow_50: f64,
    pub bands: BollingerBands,
}

/// Everything the bot knows for one run. Created at startup, mutated by
/// ingestion, settings and decisions, dropped at exit.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub settings: GameSettings,
    pub risk: RiskConfig,
    pub funds: HashMap<String, f64>,
    pub market: MarketStore,
    /// Close of the last record of every candle update.
    pub price_log: Vec<f64>,
    /// Volume of the last record of every candle update.
    pub volume_log: Vec<f64>,
    pub indicators: IndicatorSnapshot,
    pub position: PositionState,
    pub selected_pair: Option<CurrencyPair>,
    pub present_date: i64,
}

impl SessionState {
    pub fn new(risk: RiskConfig) -> Self {
        Self {
            settings: GameSettings::default(),
            risk,
            funds: HashMap::new(),
            market: MarketStore::default(),
            price_log: Vec::new(),
            volume_log: Vec::new(),
            indicators: IndicatorSnapshot::default(),
            position: PositionState::default(),
            selected_pair: None,
            present_date: 0,
        }
    }

    /// Recompute the EMAs and bands from the price log and the RSI cache of
    /// every pair. Fails when no candle has been seen yet.
    pub fn refresh_indicators(&mut self) -> Result<IndicatorSnapshot> {
        let ema_of = |period: usize| {
            ema(period, &self.price_log).ok_or_else(|| {
                Error::InsufficientData(format!("no prices for EMA({period})"))
            })
        };
        let snapshot = IndicatorSnapshot {
            ema_fast_9: ema_of(9)?,
            ema_fast_13: ema_of(13)?,
            ema_slow_20: ema_of(20)?,
            ema_slow_50: ema_of(50)?,
            bands: bollinger(BOLLINGER_WINDOW, &self.price_log)?,
        };
        self.market.refresh_rsi();
        self.indicators = snapshot;
        debug!(?snapshot, "Indicators refreshed");
        Ok(snapshot)
    }

    pub fn balance(&self, currency: &str) -> Result<f64> {
        self.funds
            .get(currency)
            .copied()
            .ok_or_else(|| Error::UnknownCurrency(currency.to_string()))
    }

    /// Refresh indicators and gather the inputs for deciding on the selected pair.
    pub fn decision_inputs(&mut self) -> Result<(CurrencyPair, DecisionInputs)> {
        let pair = self
            .selected_pair
            .clone()
            .ok_or_else(|| Error::InsufficientData("no candle update received yet".into()))?;
        let primary_balance = self.balance(&pair.primary)?;
        let secondary_balance = self.balance(&pair.secondary)?;

        let name = pair.to_string();
        let price = self
            .market
            .get(&name)
            .and_then(|h| h.last_close())
            .ok_or_else(|| Error::UnknownPair(name.clone()))?;

        let snapshot = self.refresh_indicators()?;
        let rsi_latest = self
            .market
            .get(&name)
            .map(|h| h.latest_rsi())
            .unwrap_or(f64::NAN);
        let volume_anomaly = is_anomalous_drop(&self.volume_log)?;

        let inputs = DecisionInputs {
            bands: snapshot.bands,
            ema_fast_9: snapshot.ema_fast_9,
            ema_fast_13: snapshot.ema_fast_13,
            ema_slow_20: snapshot.ema_slow_20,
            ema_slow_50: snapshot.ema_slow_50,
            rsi_latest,
            volume_anomaly,
            primary_balance,
            secondary_balance,
            price,
        };
        Ok((pair, inputs))
    }
}
