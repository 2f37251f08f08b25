use common::{Error, Result};

/// Arithmetic mean. Fails on an empty slice.
pub fn sma(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(Error::EmptySeries);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn std_dev(values: &[f64]) -> Result<f64> {
    let mean = sma(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Ok(variance.sqrt())
}

/// Exponential moving average over the whole series.
///
/// The running value is seeded with the first element and then every element,
/// the seed included, is folded in with `k = 2 / (period + 1)`. This is not the
/// textbook SMA-seeded EMA and existing callers depend on the exact numbers.
///
/// Returns `None` for an empty series.
pub fn ema(period: usize, series: &[f64]) -> Option<f64> {
    let (&seed, _) = series.split_first()?;
    let k = 2.0 / (period as f64 + 1.0);
    Some(series.iter().fold(seed, |acc, &price| acc + (price - acc) * k))
}
