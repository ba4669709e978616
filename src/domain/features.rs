//! Feature extraction for the regression models.
//!
//! A sliding-window transform: one fixed-order vector per trading day from
//! index 5 onward (earlier days lack the 5-day window). Purely functional, no
//! state survives a call.

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::stats;

pub const FEATURE_COUNT: usize = 10;

/// One day's model inputs. Field order is the column order of the matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub close: f64,
    pub sma_5: f64,
    pub sma_10: f64,
    pub sma_20: f64,
    pub momentum_5: f64,
    pub momentum_10: f64,
    pub volume_ratio: f64,
    pub volatility: f64,
    pub prev_high: f64,
    pub prev_low: f64,
}

impl FeatureVector {
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.close,
            self.sma_5,
            self.sma_10,
            self.sma_20,
            self.momentum_5,
            self.momentum_10,
            self.volume_ratio,
            self.volatility,
            self.prev_high,
            self.prev_low,
        ]
    }
}

/// One vector per day from index 5 onward. Shorter lookbacks fall back to the
/// nearest available window (SMA-10 to SMA-5, SMA-20 to SMA-10, momentum-10 to
/// momentum-5).
pub fn build_features(bars: &[OhlcvBar]) -> Vec<FeatureVector> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let mut features = Vec::new();

    for day in 5..bars.len() {
        let window = &closes[day - 4..=day];
        let close = closes[day];

        let sma_5 = stats::mean(window);
        let sma_10 = if day >= 9 {
            stats::mean(&closes[day - 9..=day])
        } else {
            sma_5
        };
        let sma_20 = if day >= 19 {
            stats::mean(&closes[day - 19..=day])
        } else {
            sma_10
        };

        let momentum_5 = (close / closes[day - 5] - 1.0) * 100.0;
        let momentum_10 = if day >= 10 {
            (close / closes[day - 10] - 1.0) * 100.0
        } else {
            momentum_5
        };

        let volumes: Vec<f64> = bars[day - 4..=day].iter().map(|b| b.volume as f64).collect();
        let avg_volume = stats::mean(&volumes);
        let volume_ratio = if avg_volume > 0.0 {
            bars[day].volume as f64 / avg_volume
        } else {
            1.0
        };

        let window_returns: Vec<f64> = window
            .windows(2)
            .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
            .collect();
        let volatility = stats::pstdev(&window_returns) * 100.0;

        features.push(FeatureVector {
            close,
            sma_5,
            sma_10,
            sma_20,
            momentum_5,
            momentum_10,
            volume_ratio,
            volatility,
            prev_high: bars[day - 1].high,
            prev_low: bars[day - 1].low,
        });
    }

    features
}

/// Feature rows paired with next-day closes, aligned by truncation.
///
/// The final feature row has no next-day target and is excluded; it is the row
/// the prediction service projects from.
pub fn build_training_set(bars: &[OhlcvBar]) -> (Vec<FeatureVector>, Vec<f64>) {
    let features = build_features(bars);
    if features.is_empty() {
        return (features, Vec::new());
    }

    // Row j corresponds to day j+5; its target is the close of day j+6.
    let targets: Vec<f64> = bars[6..].iter().map(|b| b.close).collect();
    let n = features.len().min(targets.len() + 1) - 1;

    (features[..n].to_vec(), targets[..n].to_vec())
}
