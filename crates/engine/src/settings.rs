use tracing::debug;

use common::{Candle, Error, Result};

/// Scalar game parameters pushed with `settings <key> <value>`.
///
/// Only `candle_format` influences trading; the rest are kept for logging
/// and for strategies that want to pace themselves on the time bank.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub time_bank: i64,
    pub time_per_action: i64,
    pub candle_span: i64,
    pub total_ticks: i64,
    pub ticks_provided: i64,
    pub initial_funds: i64,
    pub transaction_cost_percent: f64,
    pub candle_format: Option<CandleSchema>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            time_bank: 1,
            time_per_action: 1,
            candle_span: 1,
            total_ticks: 0,
            ticks_provided: 0,
            initial_funds: 1000,
            transaction_cost_percent: 0.2,
            candle_format: None,
        }
    }
}

impl GameSettings {
    /// Apply one setting. Unknown keys are ignored; a known key with an
    /// unparsable value is an error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let slot = match key {
            "time_vault" => &mut self.time_bank,
            "time_per_action" => &mut self.time_per_action,
            "candle_span" => &mut self.candle_span,
            "total_ticks" => &mut self.total_ticks,
            "ticks_provided" => &mut self.ticks_provided,
            "initial_funds" => &mut self.initial_funds,
            "transaction_cost_percent" => {
                self.transaction_cost_percent = parse_number(key, value)?;
                return Ok(());
            }
            "candle_format" => {
                self.candle_format = Some(CandleSchema::parse(value));
                return Ok(());
            }
            other => {
                debug!(key = other, "Ignoring unknown setting");
                return Ok(());
            }
        };
        *slot = parse_number(key, value)?;
        Ok(())
    }
}

/// Ordered field names describing the columns of a candle record,
/// e.g. `pair,date,high,low,open,close,volume`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandleSchema {
    fields: Vec<String>,
}

impl CandleSchema {
    pub fn parse(format: &str) -> Self {
        Self {
            fields: format.split(',').map(|f| f.trim().to_string()).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse one `,`-separated record. The record must have exactly one value
    /// per schema field. `pair` is kept as text, `date` must be an integer,
    /// every other field must be a float.
    pub fn parse_record(&self, record: &str) -> Result<Candle> {
        let values: Vec<&str> = record.split(',').map(str::trim).collect();
        if values.len() != self.fields.len() {
            return Err(Error::SchemaMismatch {
                expected: self.fields.len(),
                actual: values.len(),
            });
        }

        let mut pair = None;
        let mut date = None;
        let mut numeric: Vec<(&str, f64)> = Vec::with_capacity(values.len());
        for (name, raw) in self.fields.iter().zip(values) {
            match name.as_str() {
                "pair" => pair = Some(raw.to_string()),
                "date" => date = Some(parse_number::<i64>(name, raw)?),
                _ => numeric.push((name.as_str(), parse_number::<f64>(name, raw)?)),
            }
        }

        let field = |name: &str| -> Result<f64> {
            numeric
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| *v)
                .ok_or_else(|| Error::MissingField(name.to_string()))
        };

        Ok(Candle {
            pair: pair.ok_or_else(|| Error::MissingField("pair".into()))?,
            date: date.ok_or_else(|| Error::MissingField("date".into()))?,
            open: field("open")?,
            high: field("high")?,
            low: field("low")?,
            close: field("close")?,
            volume: field("volume")?,
        })
    }
}

pub(crate) fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| Error::InvalidNumber {
        field: field.to_string(),
        value: raw.to_string(),
    })
}
