//! Stochastic oscillator.
//!
//! %K = (close - lowest_low) / (highest_high - lowest_low) * 100 over the
//! trailing period, 50 on a flat range. %D is reported equal to %K rather than
//! as a 3-period SMA of %K; a known simplification kept for output parity.

use serde::Serialize;

use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, Serialize)]
pub struct StochasticOscillator {
    pub k: f64,
    pub d: f64,
}

pub fn stochastic(bars: &[OhlcvBar], period: usize) -> Option<StochasticOscillator> {
    if period == 0 || bars.len() < period {
        return None;
    }

    let window = &bars[bars.len() - period..];
    let highest = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let close = bars[bars.len() - 1].close;

    let k = if highest == lowest {
        50.0
    } else {
        (close - lowest) / (highest - lowest) * 100.0
    };

    Some(StochasticOscillator { k, d: k })
}
