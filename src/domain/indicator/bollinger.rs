//! Bollinger Bands: SMA(20) middle band, upper/lower at +-2 population stddev.

use serde::Serialize;

use crate::domain::stats;

#[derive(Debug, Clone, Serialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    /// Band width as percent of the middle band: 2*stddev*mult / middle * 100.
    pub width: f64,
}

pub fn bollinger_bands(closes: &[f64], period: usize, std_mult: f64) -> Option<BollingerBands> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];
    let middle = stats::mean(window);
    let std = stats::pstdev(window);
    let offset = std_mult * std;

    let width = if middle != 0.0 {
        offset / middle * 100.0
    } else {
        0.0
    };

    Some(BollingerBands {
        upper: middle + offset,
        middle,
        lower: middle - offset,
        width,
    })
}
