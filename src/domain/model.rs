//! Regression model training and selection.
//!
//! A closed set of candidate regressors is fitted per call: features are
//! standard-scaled with statistics from this call's training data only, each
//! candidate is k-fold cross-validated, refitted on the full set, and the one
//! with the highest in-sample R² wins (ties break on candidate order). A
//! candidate that fails to fit is logged and excluded; training fails only when
//! every candidate does.

use serde::Serialize;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::error::Failed;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::elastic_net::{ElasticNet, ElasticNetParameters};
use smartcore::linear::lasso::{Lasso, LassoParameters};
use smartcore::linear::linear_regression::{LinearRegression, LinearRegressionParameters};
use smartcore::linear::ridge_regression::{RidgeRegression, RidgeRegressionParameters};
use tracing::warn;

use crate::domain::error::MarketlensError;
use crate::domain::features::FeatureVector;
use crate::domain::stats;

/// Minimum aligned samples before model training is attempted; below this the
/// prediction service uses its trend-extrapolation fallback.
pub const MIN_TRAINING_SAMPLES: usize = 20;

/// Candidate regressor kinds, in selection tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    RandomForest,
    LinearRegression,
    Ridge,
    Lasso,
    ElasticNet,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::RandomForest,
        ModelKind::LinearRegression,
        ModelKind::Ridge,
        ModelKind::Lasso,
        ModelKind::ElasticNet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::RandomForest => "random_forest",
            ModelKind::LinearRegression => "linear_regression",
            ModelKind::Ridge => "ridge",
            ModelKind::Lasso => "lasso",
            ModelKind::ElasticNet => "elastic_net",
        }
    }
}

/// Per-call feature standardization (zero mean, unit variance).
///
/// Always recomputed from the current training set and passed by value so no
/// statistics leak between analyses of different symbols.
#[derive(Debug, Clone)]
pub struct FeatureScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl FeatureScaler {
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let n_features = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut means = vec![0.0; n_features];
        let mut stds = vec![0.0; n_features];

        for row in rows {
            for (i, &v) in row.iter().enumerate() {
                means[i] += v;
            }
        }
        for m in &mut means {
            *m /= rows.len().max(1) as f64;
        }

        for row in rows {
            for (i, &v) in row.iter().enumerate() {
                stds[i] += (v - means[i]).powi(2);
            }
        }
        for s in &mut stds {
            *s = (*s / rows.len().max(1) as f64).sqrt();
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        Self { means, stds }
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .enumerate()
            .map(|(i, &v)| (v - self.means[i]) / self.stds[i])
            .collect()
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|r| self.transform_row(r)).collect()
    }
}

/// A regressor fitted on scaled features.
#[derive(Debug)]
pub enum FittedRegressor {
    RandomForest(RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>),
    Linear(LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>),
    Ridge(RidgeRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>),
    Lasso(Lasso<f64, f64, DenseMatrix<f64>, Vec<f64>>),
    ElasticNet(ElasticNet<f64, f64, DenseMatrix<f64>, Vec<f64>>),
}

impl FittedRegressor {
    pub fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>, Failed> {
        match self {
            FittedRegressor::RandomForest(m) => m.predict(x),
            FittedRegressor::Linear(m) => m.predict(x),
            FittedRegressor::Ridge(m) => m.predict(x),
            FittedRegressor::Lasso(m) => m.predict(x),
            FittedRegressor::ElasticNet(m) => m.predict(x),
        }
    }

    /// Predict a single already-scaled feature row.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, Failed> {
        let x = DenseMatrix::from_2d_array(&[row])?;
        let y = self.predict(&x)?;
        y.first().copied().ok_or_else(|| Failed::predict("empty prediction"))
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelPerformance {
    pub r2: f64,
    pub mse: f64,
    pub cv_mean: f64,
    pub cv_std: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateScore {
    pub kind: ModelKind,
    pub performance: ModelPerformance,
}

/// Outcome of one training call: the winning model, the scaler that produced
/// its inputs, and the scoreboard for every candidate that fitted.
#[derive(Debug)]
pub struct ModelSelection {
    pub kind: ModelKind,
    pub regressor: FittedRegressor,
    pub performance: ModelPerformance,
    pub scaler: FeatureScaler,
    pub candidates: Vec<CandidateScore>,
}

fn to_matrix(rows: &[Vec<f64>]) -> Result<DenseMatrix<f64>, Failed> {
    let refs: Vec<&[f64]> = rows.iter().map(|r| r.as_slice()).collect();
    DenseMatrix::from_2d_array(&refs)
}

fn fit_kind(
    kind: ModelKind,
    x: &DenseMatrix<f64>,
    y: &Vec<f64>,
) -> Result<FittedRegressor, Failed> {
    match kind {
        ModelKind::RandomForest => RandomForestRegressor::fit(
            x,
            y,
            RandomForestRegressorParameters::default()
                .with_n_trees(100)
                .with_max_depth(10),
        )
        .map(FittedRegressor::RandomForest),
        ModelKind::LinearRegression => {
            LinearRegression::fit(x, y, LinearRegressionParameters::default())
                .map(FittedRegressor::Linear)
        }
        ModelKind::Ridge => {
            RidgeRegression::fit(x, y, RidgeRegressionParameters::default().with_alpha(1.0))
                .map(FittedRegressor::Ridge)
        }
        ModelKind::Lasso => Lasso::fit(x, y, LassoParameters::default().with_alpha(1.0))
            .map(FittedRegressor::Lasso),
        ModelKind::ElasticNet => ElasticNet::fit(
            x,
            y,
            ElasticNetParameters::default().with_alpha(1.0).with_l1_ratio(0.5),
        )
        .map(FittedRegressor::ElasticNet),
    }
}

/// Coefficient of determination. A constant target scores 1.0 only for an
/// exact fit.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> f64 {
    let mean = stats::mean(actual);
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        if ss_res < 1e-12 { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    }
}

pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64
}

/// Contiguous k-fold cross-validated R² scores for one candidate kind.
fn cross_validate(
    kind: ModelKind,
    rows: &[Vec<f64>],
    targets: &[f64],
    folds: usize,
) -> Result<Vec<f64>, Failed> {
    let n = rows.len();
    let fold_size = n / folds;
    let mut scores = Vec::with_capacity(folds);

    for fold in 0..folds {
        let test_start = fold * fold_size;
        let test_end = if fold == folds - 1 { n } else { test_start + fold_size };

        let mut train_rows = Vec::with_capacity(n - (test_end - test_start));
        let mut train_targets = Vec::with_capacity(n - (test_end - test_start));
        for i in (0..test_start).chain(test_end..n) {
            train_rows.push(rows[i].clone());
            train_targets.push(targets[i]);
        }

        let x_train = to_matrix(&train_rows)?;
        let model = fit_kind(kind, &x_train, &train_targets)?;

        let x_test = to_matrix(&rows[test_start..test_end])?;
        let predicted = model.predict(&x_test)?;
        scores.push(r_squared(&targets[test_start..test_end], &predicted));
    }

    Ok(scores)
}

/// Fit every candidate on `features`/`targets` and select by in-sample R².
///
/// Series are aligned by truncating the longer one. The caller is responsible
/// for checking [`MIN_TRAINING_SAMPLES`] first; this function only fails when
/// every candidate fails to fit.
pub fn train_and_select(
    symbol: &str,
    features: &[FeatureVector],
    targets: &[f64],
) -> Result<ModelSelection, MarketlensError> {
    let n = features.len().min(targets.len());
    let raw_rows: Vec<Vec<f64>> = features[..n].iter().map(|f| f.to_array().to_vec()).collect();
    let targets = targets[..n].to_vec();

    let scaler = FeatureScaler::fit(&raw_rows);
    let rows = scaler.transform(&raw_rows);
    let x = to_matrix(&rows).map_err(|e| MarketlensError::Data {
        reason: format!("feature matrix construction failed: {e}"),
    })?;

    let folds = (n / 2).min(3).max(2);

    let mut best: Option<(ModelKind, FittedRegressor, ModelPerformance)> = None;
    let mut candidates = Vec::new();

    for kind in ModelKind::ALL {
        let cv_scores = match cross_validate(kind, &rows, &targets, folds) {
            Ok(scores) => scores,
            Err(e) => {
                warn!(symbol, model = kind.name(), error = %e, "candidate failed cross-validation");
                continue;
            }
        };

        let regressor = match fit_kind(kind, &x, &targets) {
            Ok(model) => model,
            Err(e) => {
                warn!(symbol, model = kind.name(), error = %e, "candidate failed to fit");
                continue;
            }
        };

        let predicted = match regressor.predict(&x) {
            Ok(p) => p,
            Err(e) => {
                warn!(symbol, model = kind.name(), error = %e, "candidate failed to predict");
                continue;
            }
        };

        let performance = ModelPerformance {
            r2: r_squared(&targets, &predicted),
            mse: mean_squared_error(&targets, &predicted),
            cv_mean: stats::mean(&cv_scores),
            cv_std: stats::pstdev(&cv_scores),
        };
        candidates.push(CandidateScore { kind, performance });

        let is_better = match &best {
            Some((_, _, current)) => performance.r2 > current.r2,
            None => true,
        };
        if is_better {
            best = Some((kind, regressor, performance));
        }
    }

    match best {
        Some((kind, regressor, performance)) => Ok(ModelSelection {
            kind,
            regressor,
            performance,
            scaler,
            candidates,
        }),
        None => Err(MarketlensError::AllModelsFailed {
            symbol: symbol.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn linear_features(n: usize) -> (Vec<FeatureVector>, Vec<f64>) {
        let features: Vec<FeatureVector> = (0..n)
            .map(|i| {
                let base = 100.0 + i as f64;
                FeatureVector {
                    close: base,
                    sma_5: base - 0.5,
                    sma_10: base - 1.0,
                    sma_20: base - 2.0,
                    momentum_5: 1.0 + (i % 3) as f64 * 0.1,
                    momentum_10: 2.0,
                    volume_ratio: 1.0 + (i % 5) as f64 * 0.05,
                    volatility: 0.8,
                    prev_high: base + 1.0,
                    prev_low: base - 1.0,
                }
            })
            .collect();
        let targets: Vec<f64> = (0..n).map(|i| 101.0 + i as f64).collect();
        (features, targets)
    }

    #[test]
    fn scaler_zero_mean_unit_variance() {
        let rows = vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]];
        let scaler = FeatureScaler::fit(&rows);
        let scaled = scaler.transform(&rows);

        for col in 0..2 {
            let column: Vec<f64> = scaled.iter().map(|r| r[col]).collect();
            assert_relative_eq!(stats::mean(&column), 0.0, epsilon = 1e-12);
            assert_relative_eq!(stats::pstdev(&column), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn scaler_constant_column_maps_to_zero() {
        let rows = vec![vec![5.0], vec![5.0], vec![5.0]];
        let scaler = FeatureScaler::fit(&rows);
        // std of 0 is replaced by 1 so the column scales to zero, not NaN.
        for row in scaler.transform(&rows) {
            assert_relative_eq!(row[0], 0.0);
        }
    }

    #[test]
    fn r_squared_perfect_fit() {
        let y = [1.0, 2.0, 3.0];
        assert_relative_eq!(r_squared(&y, &y), 1.0);
    }

    #[test]
    fn r_squared_mean_predictor_is_zero() {
        let y = [1.0, 2.0, 3.0];
        let mean_pred = [2.0, 2.0, 2.0];
        assert_relative_eq!(r_squared(&y, &mean_pred), 0.0);
    }

    #[test]
    fn mse_basic() {
        let actual = [1.0, 2.0];
        let predicted = [2.0, 4.0];
        assert_relative_eq!(mean_squared_error(&actual, &predicted), 2.5);
    }

    #[test]
    fn training_selects_highest_in_sample_r2() {
        let (features, targets) = linear_features(40);
        let selection = train_and_select("TEST", &features, &targets).unwrap();

        assert!(!selection.candidates.is_empty());
        let max_r2 = selection
            .candidates
            .iter()
            .map(|c| c.performance.r2)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(selection.performance.r2, max_r2);
    }

    #[test]
    fn training_reports_cv_statistics() {
        let (features, targets) = linear_features(40);
        let selection = train_and_select("TEST", &features, &targets).unwrap();
        for candidate in &selection.candidates {
            assert!(candidate.performance.cv_mean.is_finite());
            assert!(candidate.performance.cv_std >= 0.0);
        }
    }

    #[test]
    fn linear_target_is_fit_well_by_linear_model() {
        let (features, targets) = linear_features(60);
        let selection = train_and_select("TEST", &features, &targets).unwrap();
        // The target is an exact linear function of the close feature.
        assert!(selection.performance.r2 > 0.9);
    }

    #[test]
    fn scaler_is_scoped_to_call() {
        let (features_a, targets_a) = linear_features(40);
        let features_b: Vec<FeatureVector> = features_a
            .iter()
            .map(|f| FeatureVector {
                close: f.close * 1000.0,
                ..f.clone()
            })
            .collect();

        let a = train_and_select("A", &features_a, &targets_a).unwrap();
        let b = train_and_select("B", &features_b, &targets_a).unwrap();

        // Each call fits its own scaler: the same row scales differently.
        let row = features_a[0].to_array();
        assert_ne!(a.scaler.transform_row(&row), b.scaler.transform_row(&row));
    }
}
