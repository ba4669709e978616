//! OHLCV bar representation.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcvBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Daily simple returns: (close[i] - close[i-1]) / close[i-1].
pub fn daily_returns(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.windows(2)
        .map(|w| {
            let prev = w[0].close;
            if prev > 0.0 {
                (w[1].close - prev) / prev
            } else {
                0.0
            }
        })
        .collect()
}

/// Closing prices in series order.
pub fn closes(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Dates ascending, closes positive, volumes non-negative.
pub fn is_well_formed(bars: &[OhlcvBar]) -> bool {
    bars.iter().all(|b| b.close > 0.0 && b.volume >= 0)
        && bars.windows(2).all(|w| w[0].date < w[1].date)
}
