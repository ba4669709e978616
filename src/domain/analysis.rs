//! Per-symbol analysis orchestration.
//!
//! Ties the indicator engine, sentiment scoring, forecasting and risk
//! assessment together into one report. Each call is a pure function of the
//! bar series; nothing is cached between symbols.

use serde::Serialize;
use tracing::info;

use crate::domain::error::MarketlensError;
use crate::domain::indicator::{self, IndicatorSnapshot};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::prediction::{self, PredictionResult};
use crate::domain::risk::{self, RiskProfile};
use crate::domain::sentiment::{self, SentimentAnalysis};

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Days of history requested from the data source.
    pub history_days: usize,
    /// Forecast horizon in trading days.
    pub forecast_days: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            history_days: 365,
            forecast_days: prediction::DEFAULT_HORIZON,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub timestamp: String,
    pub bar_count: usize,
    pub current_price: f64,
    pub indicators: IndicatorSnapshot,
    pub sentiment: SentimentAnalysis,
    pub prediction: PredictionResult,
    pub risk: RiskProfile,
    pub recommendations: Vec<String>,
}

/// Run the full analysis pipeline for one symbol.
pub fn analyze_symbol(
    symbol: &str,
    bars: &[OhlcvBar],
    forecast_days: usize,
) -> Result<AnalysisReport, MarketlensError> {
    if bars.is_empty() {
        return Err(MarketlensError::NoData {
            symbol: symbol.to_string(),
        });
    }

    let current_price = bars[bars.len() - 1].close;
    info!(symbol, bars = bars.len(), current_price, "analyzing symbol");

    let indicators = indicator::compute_snapshot(bars);
    let sentiment = sentiment::analyze(&indicators, current_price);
    let prediction = prediction::forecast(symbol, bars, forecast_days)?;
    let risk = risk::assess(bars, &indicators);
    let recommendations = sentiment::recommendations(&sentiment, &indicators, &risk);

    Ok(AnalysisReport {
        symbol: symbol.to_string(),
        timestamp: chrono::Local::now().to_rfc3339(),
        bar_count: bars.len(),
        current_price,
        indicators,
        sentiment,
        prediction,
        risk,
        recommendations,
    })
}
