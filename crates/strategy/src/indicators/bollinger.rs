use common::Result;

use super::moving_average::{sma, std_dev};

/// Window used for the bands the decision engine reads.
pub const BOLLINGER_WINDOW: usize = 11;

/// Band width as a multiple of the standard deviation, on each side of the mid.
const SPREAD_FACTOR: f64 = 0.5;

/// `[lower, mid, upper]` around a simple moving average.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BollingerBands {
    pub lower: f64,
    pub mid: f64,
    pub upper: f64,
}

impl BollingerBands {
    /// All-zero bands, reported when there are not enough closes yet.
    pub const ZERO: Self = Self { lower: 0.0, mid: 0.0, upper: 0.0 };

    /// True for the "insufficient data" output, which is not a real band.
    pub fn is_degenerate(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.lower, self.mid, self.upper]
    }
}

/// Bollinger bands over the last `n` closes.
///
/// Fewer than `n` closes yields [`BollingerBands::ZERO`] rather than an error.
/// A zero window has no mean and fails.
pub fn bollinger(n: usize, closes: &[f64]) -> Result<BollingerBands> {
    if closes.len() < n {
        return Ok(BollingerBands::ZERO);
    }
    let recent = &closes[closes.len() - n..];
    let mid = sma(recent)?;
    let spread = SPREAD_FACTOR * std_dev(recent)?;
    Ok(BollingerBands {
        lower: mid - spread,
        mid,
        upper: mid + spread,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_history_gives_zero_bands() {
        let closes = vec![100.0; BOLLINGER_WINDOW - 1];
        let bands = bollinger(BOLLINGER_WINDOW, &closes).unwrap();
        assert!(bands.is_degenerate());
        assert_eq!(bands.as_array(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn flat_prices_collapse_the_band() {
        let closes = vec![100.0; BOLLINGER_WINDOW];
        let bands = bollinger(BOLLINGER_WINDOW, &closes).unwrap();
        assert_eq!(bands.as_array(), [100.0, 100.0, 100.0]);
    }

    #[test]
    fn only_the_last_n_closes_count() {
        // Leading outlier must fall outside the window.
        let mut closes = vec![1_000_000.0];
        closes.extend([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let bands = bollinger(8, &closes).unwrap();
        assert!((bands.mid - 5.0).abs() < 1e-12);
        // std = 2, spread = 1
        assert!((bands.lower - 4.0).abs() < 1e-12);
        assert!((bands.upper - 6.0).abs() < 1e-12);
    }

    #[test]
    fn zero_window_has_no_mean() {
        assert!(bollinger(0, &[1.0, 2.0]).is_err());
    }
}
