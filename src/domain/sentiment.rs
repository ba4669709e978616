//! Sentiment scoring and trading recommendations.
//!
//! Independent signals each add a fixed weight to an integer score; the total
//! maps to one of four labels. Recommendations are templated strings built
//! from the same signals plus the risk level, deduplicated.

use serde::Serialize;

use crate::domain::indicator::IndicatorSnapshot;
use crate::domain::risk::{RiskLevel, RiskProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    StrongPositive,
    Positive,
    Negative,
    StrongNegative,
}

impl Sentiment {
    pub fn from_score(score: i32) -> Self {
        if score >= 2 {
            Sentiment::StrongPositive
        } else if score >= 0 {
            Sentiment::Positive
        } else if score >= -2 {
            Sentiment::Negative
        } else {
            Sentiment::StrongNegative
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Upward,
    Downward,
}

/// Close above its SMA-20 counts as an upward trend. None without 20 bars.
pub fn trend_direction(close: f64, sma_20: Option<f64>) -> Option<TrendDirection> {
    sma_20.map(|sma| {
        if close > sma {
            TrendDirection::Upward
        } else {
            TrendDirection::Downward
        }
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentAnalysis {
    pub sentiment: Sentiment,
    pub score: i32,
    pub signals: Vec<String>,
    pub trend: Option<TrendDirection>,
}

pub fn analyze(indicators: &IndicatorSnapshot, current_price: f64) -> SentimentAnalysis {
    let mut score = 0;
    let mut signals = Vec::new();

    let rsi = indicators.rsi;
    if rsi < 30.0 {
        score += 2;
        signals.push("RSI oversold, buy signal".to_string());
    } else if rsi > 70.0 {
        score -= 2;
        signals.push("RSI overbought, sell signal".to_string());
    } else if rsi > 40.0 && rsi < 60.0 {
        score += 1;
        signals.push("RSI in the neutral band".to_string());
    }

    if let (Some(macd), Some(signal)) = (indicators.macd, indicators.macd_signal) {
        if macd > signal {
            score += 1;
            signals.push("MACD above signal, upward bias".to_string());
        } else {
            score -= 1;
            signals.push("MACD below signal, downward bias".to_string());
        }
    }

    if let (Some(sma_20), Some(sma_50)) = (indicators.sma_20, indicators.sma_50) {
        if sma_20 > sma_50 {
            score += 1;
            signals.push("moving averages aligned upward".to_string());
        } else {
            score -= 1;
            signals.push("moving averages aligned downward".to_string());
        }
    }

    if let Some(volume_ratio) = indicators.volume_ratio {
        if volume_ratio > 1.5 {
            score += 1;
            signals.push("elevated trading volume".to_string());
        } else if volume_ratio < 0.5 {
            score -= 1;
            signals.push("thin trading volume".to_string());
        }
    }

    SentimentAnalysis {
        sentiment: Sentiment::from_score(score),
        score,
        signals,
        trend: trend_direction(current_price, indicators.sma_20),
    }
}

/// Templated recommendation strings, sentiment-derived entry first,
/// duplicates removed.
pub fn recommendations(
    analysis: &SentimentAnalysis,
    indicators: &IndicatorSnapshot,
    risk: &RiskProfile,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    out.push(
        match analysis.sentiment {
            Sentiment::StrongPositive => "strong buy, strongly positive outlook",
            Sentiment::Positive => "buy, positive outlook",
            Sentiment::Negative => "sell, negative outlook",
            Sentiment::StrongNegative => "strong sell, strongly negative outlook",
        }
        .to_string(),
    );

    let rsi = indicators.rsi;
    if rsi < 30.0 {
        out.push("buy, potential upward reversal".to_string());
    } else if rsi > 70.0 {
        out.push("caution, potential downward reversal".to_string());
    }

    match risk.risk_level {
        RiskLevel::High => out.push("high-risk position, apply risk management".to_string()),
        RiskLevel::Low => out.push("relatively low risk".to_string()),
        RiskLevel::Medium => {}
    }

    if let Some(volume_ratio) = indicators.volume_ratio {
        if volume_ratio > 2.0 {
            out.push("strong market interest, heavy volume".to_string());
        } else if volume_ratio < 0.5 {
            out.push("limited market interest, light volume".to_string());
        }
    }

    let mut seen = std::collections::HashSet::new();
    out.retain(|rec| seen.insert(rec.clone()));
    out
}
