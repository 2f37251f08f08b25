use tracing::debug;

use common::{Error, Result};

use crate::indicators::sma;

/// How many trailing volumes form the reference mean.
pub const VOLUME_LOOKBACK: usize = 6;

/// Margin applied to the latest volume before comparing it to the mean.
const VOLUME_MARGIN: f64 = 1.1;

/// True when the latest volume, scaled by 1.1, sits strictly below the mean
/// of the last six volumes (the latest included). With fewer than six volumes
/// the mean covers all of them.
///
/// An empty history has no mean and is an error.
pub fn is_anomalous_drop(volumes: &[f64]) -> Result<bool> {
    let last = *volumes.last().ok_or(Error::EmptySeries)?;
    let window = &volumes[volumes.len().saturating_sub(VOLUME_LOOKBACK)..];
    let mean = sma(window)?;
    let drop = last * VOLUME_MARGIN < mean;
    debug!(last, mean, drop, "Volume check");
    Ok(drop)
}
