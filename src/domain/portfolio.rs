//! Portfolio-level aggregation.
//!
//! Per-holding return and volatility come from trailing 60-day daily returns;
//! the portfolio volatility uses a covariance matrix over trailing 120-day
//! returns aligned to the shortest series. A holding whose data cannot be
//! fetched degrades to a synthetic series rather than aborting the analysis.

use serde::Serialize;
use tracing::warn;

use crate::domain::indicator::{moving_average, TRADING_DAYS_PER_YEAR};
use crate::domain::ohlcv::{self, OhlcvBar};
use crate::domain::risk::RiskLevel;
use crate::domain::sentiment::{self, TrendDirection};
use crate::domain::stats;
use crate::domain::synthetic;
use crate::ports::data_port::BarDataPort;

pub const DEFAULT_HOLDINGS: [(&str, f64); 2] = [("1120.SR", 50.0), ("2010.SR", 50.0)];

const STATS_WINDOW: usize = 60;
const COVARIANCE_WINDOW: usize = 120;
const MIN_ALIGNED_OBSERVATIONS: usize = 6;
const FETCH_DAYS: usize = 180;

const MAX_SINGLE_WEIGHT: f64 = 0.4;
const HIGH_PORTFOLIO_VOLATILITY: f64 = 0.25;
const MIN_DIVERSIFICATION: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct Holding {
    pub symbol: String,
    pub weight: f64,
}

impl Holding {
    pub fn new(symbol: impl Into<String>, weight: f64) -> Self {
        Holding {
            symbol: symbol.into(),
            weight,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HoldingReport {
    pub symbol: String,
    /// Normalized weight, fraction of the portfolio.
    pub weight: f64,
    /// Annualized mean of trailing 60-day daily returns.
    pub expected_return: f64,
    /// Annualized stdev of trailing 60-day daily returns.
    pub volatility: f64,
    pub trend: Option<TrendDirection>,
    /// True when the series was synthesized because real data was unavailable.
    pub synthetic: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioReport {
    pub holdings: Vec<HoldingReport>,
    pub expected_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub var_95: f64,
    /// 1 - sum(weight^2), in [0, 1 - 1/n].
    pub diversification_score: f64,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
}

/// Clamp negative weights to zero and scale to sum 1. All-zero (or empty)
/// input falls back to equal weights.
pub fn normalize_weights(weights: &[f64]) -> Vec<f64> {
    let clamped: Vec<f64> = weights.iter().map(|w| w.max(0.0)).collect();
    let total: f64 = clamped.iter().sum();
    if total > 0.0 {
        clamped.iter().map(|w| w / total).collect()
    } else {
        let n = weights.len().max(1);
        vec![1.0 / n as f64; weights.len()]
    }
}

/// Analyze a portfolio of weighted holdings. An empty holdings list is
/// replaced by the documented two-holding default rather than rejected.
pub fn analyze(holdings: &[Holding], data: &dyn BarDataPort) -> PortfolioReport {
    let holdings: Vec<Holding> = if holdings.is_empty() {
        DEFAULT_HOLDINGS
            .iter()
            .map(|(symbol, weight)| Holding::new(*symbol, *weight))
            .collect()
    } else {
        holdings.to_vec()
    };

    let raw_weights: Vec<f64> = holdings.iter().map(|h| h.weight).collect();
    let weights = normalize_weights(&raw_weights);

    let mut reports = Vec::with_capacity(holdings.len());
    let mut return_series = Vec::with_capacity(holdings.len());

    for (holding, &weight) in holdings.iter().zip(&weights) {
        let (bars, is_synthetic) = fetch_or_synthesize(&holding.symbol, data);
        let returns = ohlcv::daily_returns(&bars);

        let stats_tail = tail(&returns, STATS_WINDOW);
        let expected_return = stats::mean(stats_tail) * TRADING_DAYS_PER_YEAR;
        let volatility = stats::stdev(stats_tail) * TRADING_DAYS_PER_YEAR.sqrt();

        let closes = ohlcv::closes(&bars);
        let trend = sentiment::trend_direction(
            closes.last().copied().unwrap_or(0.0),
            moving_average::sma(&closes, 20),
        );

        reports.push(HoldingReport {
            symbol: holding.symbol.clone(),
            weight,
            expected_return,
            volatility,
            trend,
            synthetic: is_synthetic,
        });
        return_series.push(tail(&returns, COVARIANCE_WINDOW).to_vec());
    }

    let aligned = align_to_shortest(&return_series);
    let covariance = annualized_covariance(&return_series, &aligned);

    let expected_return: f64 = reports
        .iter()
        .map(|r| r.weight * r.expected_return)
        .sum();
    let variance: f64 = (0..weights.len())
        .map(|i| {
            (0..weights.len())
                .map(|j| weights[i] * weights[j] * covariance[i][j])
                .sum::<f64>()
        })
        .sum();
    let volatility = variance.max(0.0).sqrt();
    let sharpe_ratio = if volatility > 0.0 {
        expected_return / volatility
    } else {
        0.0
    };
    let var_95 = portfolio_var_95(&aligned, &weights);
    let diversification_score = 1.0 - weights.iter().map(|w| w * w).sum::<f64>();

    let risk_level = if volatility < 0.15 {
        RiskLevel::Low
    } else if volatility < 0.25 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    let recommendations = build_recommendations(
        &reports,
        volatility,
        sharpe_ratio,
        diversification_score,
    );

    PortfolioReport {
        holdings: reports,
        expected_return,
        volatility,
        sharpe_ratio,
        var_95,
        diversification_score,
        risk_level,
        recommendations,
    }
}

fn fetch_or_synthesize(symbol: &str, data: &dyn BarDataPort) -> (Vec<OhlcvBar>, bool) {
    match data.fetch_bars(symbol, FETCH_DAYS) {
        Ok(bars) if bars.len() >= STATS_WINDOW => (bars, false),
        Ok(bars) => {
            warn!(symbol, bars = bars.len(), "too little data, synthesizing series");
            (synthesize(symbol), true)
        }
        Err(error) => {
            warn!(symbol, error = %error, "fetch failed, synthesizing series");
            (synthesize(symbol), true)
        }
    }
}

fn synthesize(symbol: &str) -> Vec<OhlcvBar> {
    synthetic::generate(symbol, FETCH_DAYS, chrono::Local::now().date_naive())
}

fn tail(values: &[f64], window: usize) -> &[f64] {
    &values[values.len().saturating_sub(window)..]
}

/// Truncate every series to the shortest length, keeping the most recent
/// observations.
fn align_to_shortest(series: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let min_len = series.iter().map(Vec::len).min().unwrap_or(0);
    series.iter().map(|s| tail(s, min_len).to_vec()).collect()
}

/// Covariance of the aligned return series, annualized. With fewer than two
/// holdings or too few aligned observations, a diagonal matrix of per-asset
/// variances stands in.
fn annualized_covariance(full_series: &[Vec<f64>], aligned: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = full_series.len();
    let aligned_len = aligned.first().map_or(0, Vec::len);

    if n >= 2 && aligned_len >= MIN_ALIGNED_OBSERVATIONS {
        let mut cov = stats::covariance_matrix(aligned);
        for row in &mut cov {
            for value in row {
                *value *= TRADING_DAYS_PER_YEAR;
            }
        }
        return cov;
    }

    let mut cov = vec![vec![0.0; n]; n];
    for (i, series) in full_series.iter().enumerate() {
        let sd = stats::stdev(series);
        cov[i][i] = sd * sd * TRADING_DAYS_PER_YEAR;
    }
    cov
}

/// 5th percentile of the weighted daily return series, annualized.
fn portfolio_var_95(aligned: &[Vec<f64>], weights: &[f64]) -> f64 {
    let len = aligned.first().map_or(0, Vec::len);
    if len < 2 {
        return 0.0;
    }
    let combined: Vec<f64> = (0..len)
        .map(|t| {
            aligned
                .iter()
                .zip(weights)
                .map(|(series, w)| w * series[t])
                .sum()
        })
        .collect();
    stats::percentile(&combined, 5.0) * TRADING_DAYS_PER_YEAR.sqrt()
}

fn build_recommendations(
    reports: &[HoldingReport],
    volatility: f64,
    sharpe_ratio: f64,
    diversification_score: f64,
) -> Vec<String> {
    let mut out = Vec::new();

    for report in reports {
        if report.weight > MAX_SINGLE_WEIGHT {
            out.push(format!(
                "rebalance {}: weight {:.0}% exceeds 40% of the portfolio",
                report.symbol,
                report.weight * 100.0
            ));
        }
    }

    if volatility > HIGH_PORTFOLIO_VOLATILITY {
        out.push("high portfolio volatility, add less correlated assets".to_string());
    }

    for report in reports {
        if report.trend == Some(TrendDirection::Downward) {
            out.push(format!("review {}: price is in a downward trend", report.symbol));
        }
    }

    if diversification_score < MIN_DIVERSIFICATION {
        out.push("concentration is high, spread weights across more holdings".to_string());
    }

    if sharpe_ratio < 0.5 {
        out.push("low Sharpe ratio, revisit holding selection".to_string());
    } else if sharpe_ratio > 1.0 {
        out.push("strong risk-adjusted performance".to_string());
    }

    out
}
