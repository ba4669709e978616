//! Risk profile from the daily return distribution.
//!
//! Volatility sets the base level; the remaining rules may only raise it.

use serde::Serialize;

use crate::domain::indicator::{IndicatorSnapshot, TRADING_DAYS_PER_YEAR};
use crate::domain::ohlcv::{self, OhlcvBar};
use crate::domain::stats;

const LOW_VOLATILITY: f64 = 0.15;
const HIGH_VOLATILITY: f64 = 0.25;
const SUPPORT_RESISTANCE_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskProfile {
    pub risk_level: RiskLevel,
    /// Annualized stdev of daily returns, fractional (0.25 = 25%).
    pub volatility: f64,
    /// 5th percentile of daily returns scaled by sqrt(252).
    pub var_95: f64,
    pub support_level: Option<f64>,
    pub resistance_level: Option<f64>,
    pub factors: Vec<String>,
}

/// Assess risk from the bar series and the already-computed indicators.
pub fn assess(bars: &[OhlcvBar], indicators: &IndicatorSnapshot) -> RiskProfile {
    let returns = ohlcv::daily_returns(bars);
    let volatility = stats::pstdev(&returns) * TRADING_DAYS_PER_YEAR.sqrt();
    let var_95 = if returns.is_empty() {
        0.0
    } else {
        stats::percentile(&returns, 5.0) * TRADING_DAYS_PER_YEAR.sqrt()
    };

    let mut factors = Vec::new();
    let mut level = if volatility < LOW_VOLATILITY {
        factors.push("relatively stable price".to_string());
        RiskLevel::Low
    } else if volatility < HIGH_VOLATILITY {
        RiskLevel::Medium
    } else {
        factors.push("high price volatility".to_string());
        RiskLevel::High
    };

    // Later rules raise the level, never lower it.
    if indicators.rsi > 80.0 || indicators.rsi < 20.0 {
        factors.push("RSI in an extreme zone".to_string());
        level = level.max(RiskLevel::High);
    }

    if let Some(volume_ratio) = indicators.volume_ratio {
        if volume_ratio < 0.3 {
            factors.push("low trading liquidity".to_string());
            level = level.max(RiskLevel::High);
        }
    }

    if let Some(momentum) = indicators.momentum {
        if momentum.abs() > 10.0 {
            factors.push("strong price momentum".to_string());
            let escalated = if momentum.abs() > 20.0 {
                RiskLevel::High
            } else {
                RiskLevel::Medium
            };
            level = level.max(escalated);
        }
    }

    let (support_level, resistance_level) = support_resistance(bars);

    RiskProfile {
        risk_level: level,
        volatility,
        var_95,
        support_level,
        resistance_level,
        factors,
    }
}

/// Trailing 20-day low and high.
fn support_resistance(bars: &[OhlcvBar]) -> (Option<f64>, Option<f64>) {
    if bars.is_empty() {
        return (None, None);
    }
    let start = bars.len().saturating_sub(SUPPORT_RESISTANCE_WINDOW);
    let window = &bars[start..];
    let low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let high = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    (Some(low), Some(high))
}
