//! Short-horizon price projection.
//!
//! With enough history a model is trained and selected per call and the price
//! is projected recursively; otherwise a trend-extrapolation fallback is used
//! and flagged in the result's `method` field.

use serde::Serialize;

use crate::domain::error::MarketlensError;
use crate::domain::features;
use crate::domain::model::{self, CandidateScore, ModelKind, ModelSelection};
use crate::domain::ohlcv::{self, OhlcvBar};
use crate::domain::stats;

pub const DEFAULT_HORIZON: usize = 5;

/// Bars required before model training is attempted at all.
pub const MIN_BARS_FOR_TRAINING: usize = 50;

const TREND_LOOKBACK: usize = 20;
const SIMPLE_TREND_CONFIDENCE: f64 = 65.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMethod {
    Model,
    SimpleTrend,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayForecast {
    pub day: usize,
    pub predicted_price: f64,
    pub change_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub symbol: String,
    pub current_price: f64,
    pub predictions: Vec<DayForecast>,
    pub method: PredictionMethod,
    pub model_used: Option<ModelKind>,
    pub confidence: f64,
    pub model_performance: Option<Vec<CandidateScore>>,
}

/// Project the closing price `horizon` days ahead.
pub fn forecast(
    symbol: &str,
    bars: &[OhlcvBar],
    horizon: usize,
) -> Result<PredictionResult, MarketlensError> {
    if bars.is_empty() {
        return Err(MarketlensError::NoData {
            symbol: symbol.to_string(),
        });
    }

    let (features, targets) = features::build_training_set(bars);
    if bars.len() < MIN_BARS_FOR_TRAINING || features.len() < model::MIN_TRAINING_SAMPLES {
        return Ok(simple_trend(symbol, bars, horizon));
    }

    let selection = model::train_and_select(symbol, &features, &targets)?;

    let all_rows = features::build_features(bars);
    let latest = all_rows.last().ok_or_else(|| MarketlensError::InsufficientData {
        symbol: symbol.to_string(),
        bars: bars.len(),
        minimum: MIN_BARS_FOR_TRAINING,
    })?;

    let current_price = bars[bars.len() - 1].close;
    let predictions = project_recursive(&selection, &latest.to_array(), current_price, horizon)?;

    Ok(PredictionResult {
        symbol: symbol.to_string(),
        current_price,
        predictions,
        method: PredictionMethod::Model,
        model_used: Some(selection.kind),
        confidence: (selection.performance.r2 * 100.0).clamp(0.0, 100.0),
        model_performance: Some(selection.candidates.clone()),
    })
}

/// Recursive projection from a single feature row.
///
/// Known limitation, kept deliberately: the feature row is scaled once and
/// reused for every step; only the scalar price reference used for the percent
/// change advances. A variant that rebuilds features from each predicted price
/// can replace this routine without touching any caller.
fn project_recursive(
    selection: &ModelSelection,
    latest_row: &[f64],
    mut current_price: f64,
    horizon: usize,
) -> Result<Vec<DayForecast>, MarketlensError> {
    let scaled = selection.scaler.transform_row(latest_row);
    let mut out = Vec::with_capacity(horizon);

    for day in 1..=horizon {
        let predicted = selection.regressor.predict_row(&scaled).map_err(|e| {
            MarketlensError::Data {
                reason: format!("prediction failed on day {day}: {e}"),
            }
        })?;
        let change_percent = if current_price > 0.0 {
            (predicted - current_price) / current_price * 100.0
        } else {
            0.0
        };
        out.push(DayForecast {
            day,
            predicted_price: predicted,
            change_percent,
        });
        current_price = predicted;
    }

    Ok(out)
}

/// Fallback: the mean of the trailing 20 daily returns, compounded per day.
pub fn simple_trend(symbol: &str, bars: &[OhlcvBar], horizon: usize) -> PredictionResult {
    let returns = ohlcv::daily_returns(bars);
    let tail_start = returns.len().saturating_sub(TREND_LOOKBACK);
    let avg_return = stats::mean(&returns[tail_start..]);

    let mut current_price = bars[bars.len() - 1].close;
    let initial_price = current_price;
    let mut predictions = Vec::with_capacity(horizon);

    for day in 1..=horizon {
        let predicted = current_price * (1.0 + avg_return);
        predictions.push(DayForecast {
            day,
            predicted_price: predicted,
            change_percent: avg_return * 100.0,
        });
        current_price = predicted;
    }

    PredictionResult {
        symbol: symbol.to_string(),
        current_price: initial_price,
        predictions,
        method: PredictionMethod::SimpleTrend,
        model_used: None,
        confidence: SIMPLE_TREND_CONFIDENCE,
        model_performance: None,
    }
}
