//! MACD: EMA(12) - EMA(26), signal = EMA(9) of the MACD series.

use serde::Serialize;

use super::moving_average::ema_series;

const FAST_PERIOD: usize = 12;
const SLOW_PERIOD: usize = 26;
const SIGNAL_PERIOD: usize = 9;

#[derive(Debug, Clone, Serialize)]
pub struct Macd {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Latest MACD values. Requires at least 26 closes.
pub fn macd(closes: &[f64]) -> Option<Macd> {
    if closes.len() < SLOW_PERIOD {
        return None;
    }

    let fast = ema_series(closes, FAST_PERIOD);
    let slow = ema_series(closes, SLOW_PERIOD);
    let macd_series: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal_series = ema_series(&macd_series, SIGNAL_PERIOD);

    let line = *macd_series.last()?;
    let signal = *signal_series.last()?;

    Some(Macd {
        line,
        signal,
        histogram: line - signal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_requires_26_closes() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        assert!(macd(&closes).is_none());
    }

    #[test]
    fn macd_constant_prices_is_zero() {
        let closes = vec![100.0; 40];
        let m = macd(&closes).unwrap();
        assert!(m.line.abs() < 1e-12);
        assert!(m.signal.abs() < 1e-12);
        assert!(m.histogram.abs() < 1e-12);
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let m = macd(&closes).unwrap();
        // Fast EMA tracks rising prices closer than the slow one.
        assert!(m.line > 0.0);
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin() * 10.0).collect();
        let m = macd(&closes).unwrap();
        assert!((m.histogram - (m.line - m.signal)).abs() < 1e-12);
    }
}
