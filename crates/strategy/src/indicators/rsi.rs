/// Window used for the RSI the decision engine reads.
pub const RSI_PERIOD: usize = 14;

/// Relative Strength Index aligned index-for-index with its input closes.
///
/// Each output uses the simple (not Wilder-smoothed) mean of the gains and
/// losses of the `period` price changes ending at that index. The first change
/// only exists at index 1, so the first `period` outputs are `NaN`.
///
/// A window without losses saturates to `100.0`; a window with neither gains
/// nor losses is `NaN` (0 / 0). Both are expected values, not errors.
///
/// The returned iterator borrows `closes` and can be cloned to restart it.
pub fn rsi(closes: &[f64], period: usize) -> RsiSeries<'_> {
    RsiSeries {
        closes,
        period,
        index: 0,
    }
}

/// RSI at the most recent close, `NaN` if undefined.
pub fn latest_rsi(closes: &[f64], period: usize) -> f64 {
    rsi(closes, period).last().unwrap_or(f64::NAN)
}

/// Lazy RSI sequence, see [`rsi`].
#[derive(Debug, Clone)]
pub struct RsiSeries<'a> {
    closes: &'a [f64],
    period: usize,
    index: usize,
}

impl RsiSeries<'_> {
    fn value_at(&self, i: usize) -> f64 {
        if self.period == 0 || i < self.period {
            return f64::NAN;
        }
        let (mut gains, mut losses) = (0.0, 0.0);
        for j in (i + 1 - self.period)..=i {
            let change = self.closes[j] - self.closes[j - 1];
            if change > 0.0 {
                gains += change;
            } else {
                losses -= change;
            }
        }
        let avg_gain = gains / self.period as f64;
        let avg_loss = losses / self.period as f64;
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

impl Iterator for RsiSeries<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.index >= self.closes.len() {
            return None;
        }
        let value = self.value_at(self.index);
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.closes.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }

    // Skip straight to the end instead of computing every window.
    fn last(mut self) -> Option<f64> {
        if self.index >= self.closes.len() {
            return None;
        }
        self.index = self.closes.len() - 1;
        self.next()
    }
}

impl ExactSizeIterator for RsiSeries<'_> {}
