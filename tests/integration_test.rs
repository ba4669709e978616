//! End-to-end scenarios across the analysis pipeline.
//!
//! Covers:
//! - Flat-price series: zero volatility, zero VaR, low risk, zero Sharpe
//! - Overweight + downtrending portfolio recommendations
//! - Trend-extrapolation fallback on short series
//! - Synthetic data determinism
//! - Weight normalization and diversification arithmetic
//! - Model training on any sufficiently long well-formed series

mod common;

use approx::assert_relative_eq;
use common::*;
use marketlens::domain::analysis;
use marketlens::domain::portfolio::{self, Holding};
use marketlens::domain::prediction::PredictionMethod;
use marketlens::domain::risk::RiskLevel;
use marketlens::domain::synthetic;

mod flat_series {
    use super::*;

    #[test]
    fn constant_prices_have_no_risk() {
        let bars = constant_series("FLAT", 60, 100.0);
        let report = analysis::analyze_symbol("FLAT", &bars, 5).unwrap();

        assert_relative_eq!(report.risk.volatility, 0.0);
        assert_relative_eq!(report.risk.var_95, 0.0);
        assert_eq!(report.risk.risk_level, RiskLevel::Low);
        assert_relative_eq!(report.indicators.volatility.unwrap(), 0.0);
    }

    #[test]
    fn single_holding_portfolio_of_flat_series_has_zero_sharpe() {
        let port = MockDataPort::new().with_bars("FLAT", constant_series("FLAT", 60, 100.0));
        let report = portfolio::analyze(&[Holding::new("FLAT", 100.0)], &port);

        assert_relative_eq!(report.volatility, 0.0);
        assert_relative_eq!(report.sharpe_ratio, 0.0);
        assert_relative_eq!(report.var_95, 0.0);
        assert_eq!(report.risk_level, RiskLevel::Low);
    }
}

mod portfolio_recommendations {
    use super::*;

    #[test]
    fn overweight_and_downtrend_are_both_flagged() {
        let port = MockDataPort::new()
            .with_bars("STEADY", trending_series("STEADY", 90, 100.0, 0.05))
            .with_bars("FALLING", trending_series("FALLING", 90, 100.0, -0.8));

        let report = portfolio::analyze(
            &[Holding::new("STEADY", 70.0), Holding::new("FALLING", 30.0)],
            &port,
        );

        assert_relative_eq!(report.holdings[0].weight, 0.7);
        assert_relative_eq!(report.holdings[1].weight, 0.3);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("rebalance STEADY")));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("review FALLING")));
    }

    #[test]
    fn failed_fetch_degrades_to_synthetic_without_aborting() {
        let port = MockDataPort::new()
            .with_bars("GOOD", trending_series("GOOD", 90, 50.0, 0.1))
            .with_error("BROKEN", "connection refused");

        let report = portfolio::analyze(
            &[Holding::new("GOOD", 50.0), Holding::new("BROKEN", 50.0)],
            &port,
        );

        assert_eq!(report.holdings.len(), 2);
        assert!(!report.holdings[0].synthetic);
        assert!(report.holdings[1].synthetic);
        assert!(report.volatility.is_finite());
    }

    #[test]
    fn diversification_matches_equal_weight_formula() {
        for n in 2..6 {
            let mut port = MockDataPort::new();
            let mut holdings = Vec::new();
            for i in 0..n {
                let symbol = format!("S{i}");
                port = port.with_bars(&symbol, constant_series(&symbol, 70, 50.0 + i as f64));
                holdings.push(Holding::new(symbol, 10.0));
            }

            let report = portfolio::analyze(&holdings, &port);
            assert_relative_eq!(
                report.diversification_score,
                1.0 - 1.0 / n as f64,
                epsilon = 1e-12
            );
            let total: f64 = report.holdings.iter().map(|h| h.weight).sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        }
    }
}

mod prediction_fallback {
    use super::*;

    #[test]
    fn short_series_reports_simple_trend_without_model_fields() {
        // 8 bars give 3 feature rows, below the training minimum.
        let bars = trending_series("SHORT", 8, 100.0, 1.0);
        let report = analysis::analyze_symbol("SHORT", &bars, 5).unwrap();

        assert_eq!(report.prediction.method, PredictionMethod::SimpleTrend);
        assert!(report.prediction.model_used.is_none());
        assert!(report.prediction.model_performance.is_none());
        assert_eq!(report.prediction.predictions.len(), 5);
    }

    #[test]
    fn long_series_trains_and_selects_a_model() {
        let closes: Vec<f64> = (0..100)
            .map(|i| 80.0 + i as f64 * 0.4 + (i as f64 * 0.7).sin() * 3.0)
            .collect();
        let bars = make_series("LONG", &closes);
        let report = analysis::analyze_symbol("LONG", &bars, 5).unwrap();

        assert_eq!(report.prediction.method, PredictionMethod::Model);
        let selected = report.prediction.model_used.unwrap();
        let candidates = report.prediction.model_performance.unwrap();

        // The selected candidate carries the maximum in-sample R².
        let best = candidates
            .iter()
            .max_by(|a, b| {
                a.performance
                    .r2
                    .partial_cmp(&b.performance.r2)
                    .unwrap()
            })
            .unwrap();
        assert_relative_eq!(
            best.performance.r2,
            candidates
                .iter()
                .find(|c| c.kind == selected)
                .unwrap()
                .performance
                .r2
        );
    }

    #[test]
    fn any_long_well_formed_series_analyzes_cleanly() {
        for symbol in ["1120.SR", "2010.SR", "7010.SR"] {
            let bars = synthetic::generate(
                symbol,
                120,
                chrono::NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            );
            let report = analysis::analyze_symbol(symbol, &bars, 5).unwrap();
            assert_eq!(report.bar_count, 120);
            assert!(report.prediction.confidence >= 0.0);
            assert!(report.prediction.confidence <= 100.0);
        }
    }
}

mod synthetic_determinism {
    use super::*;

    #[test]
    fn same_symbol_same_series() {
        let end = chrono::NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let a = synthetic::generate("1120.SR", 200, end);
        let b = synthetic::generate("1120.SR", 200, end);
        assert_eq!(a, b);
    }

    #[test]
    fn reports_serialize_to_json() {
        let bars = synthetic::generate(
            "1120.SR",
            90,
            chrono::NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        );
        let report = analysis::analyze_symbol("1120.SR", &bars, 5).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"symbol\":\"1120.SR\""));
        assert!(json.contains("\"risk_level\""));
    }
}

mod weight_normalization {
    use super::*;
    use marketlens::domain::portfolio::normalize_weights;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalized_weights_always_sum_to_one(
            weights in proptest::collection::vec(-100.0f64..1000.0, 1..8)
        ) {
            let normalized = normalize_weights(&weights);
            let total: f64 = normalized.iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
            prop_assert!(normalized.iter().all(|w| *w >= 0.0));
        }
    }
}
