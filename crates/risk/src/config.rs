use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use common::{Error, Result};

/// Risk settings read once from the JSON settings file at startup.
///
/// Example `setting.json`:
/// ```json
/// { "exposure in %": "50", "keep dollars": "yes" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Share of the available quantity committed per buy, in `[0, 1]`.
    pub risk_fraction: f64,
    /// Keep a fixed reserve of the primary currency out of every buy.
    pub saver_mode: bool,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_fraction: 0.0,
            saver_mode: true,
        }
    }
}

/// The file as written by the user, before validation.
#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(rename = "exposure in %")]
    exposure: Option<Value>,
    #[serde(rename = "keep dollars")]
    keep_dollars: Option<Value>,
}

impl RiskConfig {
    /// Read and validate the settings file. Every failure is a configuration
    /// error, which the binary turns into exit code 84.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read settings at '{}': {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let raw: RawSettings = serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse settings: {e}")))?;

        let exposure = raw
            .exposure
            .ok_or_else(|| Error::Config("missing 'exposure in %' parameter".into()))?;
        let keep_dollars = raw
            .keep_dollars
            .ok_or_else(|| Error::Config("Use 'keep dollars' parameter".into()))?;

        Ok(Self {
            risk_fraction: validate_exposure(&exposure)?,
            saver_mode: validate_keep_dollars(&keep_dollars)?,
        })
    }
}

/// Accepts an integer, a float (truncated) or a string holding an integer,
/// in `0..=100`. Returns the fraction.
fn validate_exposure(value: &Value) -> Result<f64> {
    let percent = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| Error::Config(format!("'exposure in %' is not an integer: {value}")))?;

    if !(0..=100).contains(&percent) {
        return Err(Error::Config(format!(
            "'exposure in %' must be between 0 and 100, got {percent}"
        )));
    }
    Ok(percent as f64 / 100.0)
}

fn validate_keep_dollars(value: &Value) -> Result<bool> {
    match value.as_str().map(str::to_lowercase).as_deref() {
        Some("yes") => Ok(true),
        Some("no") => Ok(false),
        _ => Err(Error::Config("Use 'keep dollars' parameter".into())),
    }
}
