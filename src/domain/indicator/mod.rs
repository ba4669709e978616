//! Technical indicator engine.
//!
//! All indicators are computed fresh per request from a bar slice and returned
//! as a fixed-field [`IndicatorSnapshot`] of latest values. Indicators without
//! enough history are `None` (serialized as null); RSI is the one exception and
//! falls back to the neutral 50 so downstream signal scoring always has a value.

pub mod bollinger;
pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod stochastic;

use serde::Serialize;

use crate::domain::ohlcv::{self, OhlcvBar};
use crate::domain::stats;

pub use bollinger::BollingerBands;
pub use macd::Macd;
pub use stochastic::StochasticOscillator;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const VOLUME_SMA_PERIOD: usize = 20;
const MOMENTUM_PERIOD: usize = 5;

/// Latest values of every indicator the engine knows about.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorSnapshot {
    pub sma_5: Option<f64>,
    pub sma_10: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub ema_12: Option<f64>,
    pub ema_26: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub rsi: f64,
    pub bollinger: Option<BollingerBands>,
    pub stochastic: Option<StochasticOscillator>,
    pub volume_ratio: Option<f64>,
    pub momentum: Option<f64>,
    pub volatility: Option<f64>,
}

pub fn compute_snapshot(bars: &[OhlcvBar]) -> IndicatorSnapshot {
    let closes = ohlcv::closes(bars);
    let macd = macd::macd(&closes);

    IndicatorSnapshot {
        sma_5: moving_average::sma(&closes, 5),
        sma_10: moving_average::sma(&closes, 10),
        sma_20: moving_average::sma(&closes, 20),
        sma_50: moving_average::sma(&closes, 50),
        ema_12: moving_average::ema(&closes, 12),
        ema_26: moving_average::ema(&closes, 26),
        macd: macd.as_ref().map(|m| m.line),
        macd_signal: macd.as_ref().map(|m| m.signal),
        macd_histogram: macd.as_ref().map(|m| m.histogram),
        rsi: rsi::rsi(&closes, rsi::DEFAULT_PERIOD),
        bollinger: bollinger::bollinger_bands(&closes, 20, 2.0),
        stochastic: stochastic::stochastic(bars, 14),
        volume_ratio: volume_ratio(bars, VOLUME_SMA_PERIOD),
        momentum: momentum(&closes, MOMENTUM_PERIOD),
        volatility: annualized_volatility(bars),
    }
}

/// Latest volume relative to its trailing SMA. 1.0 when the average is zero.
pub fn volume_ratio(bars: &[OhlcvBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period {
        return None;
    }
    let volumes: Vec<f64> = bars[bars.len() - period..]
        .iter()
        .map(|b| b.volume as f64)
        .collect();
    let avg = stats::mean(&volumes);
    let latest = bars[bars.len() - 1].volume as f64;
    if avg > 0.0 { Some(latest / avg) } else { Some(1.0) }
}

/// Percent change of the latest close versus the close `period` days ago.
pub fn momentum(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }
    let latest = closes[closes.len() - 1];
    let past = closes[closes.len() - 1 - period];
    if past > 0.0 {
        Some((latest / past - 1.0) * 100.0)
    } else {
        None
    }
}

/// Annualized volatility percent: pstdev(daily returns) * sqrt(252) * 100.
pub fn annualized_volatility(bars: &[OhlcvBar]) -> Option<f64> {
    if bars.len() < 2 {
        return None;
    }
    let returns = ohlcv::daily_returns(bars);
    Some(stats::pstdev(&returns) * TRADING_DAYS_PER_YEAR.sqrt() * 100.0)
}
