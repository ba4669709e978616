//! Shared statistics helpers.
//!
//! Percentile uses linear interpolation between ranks; covariance uses the
//! n-1 denominator. Population vs sample standard deviation matters here:
//! indicator volatility uses the population form, portfolio statistics the
//! sample form.

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n).
pub fn pstdev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Sample standard deviation (divides by n-1).
pub fn stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Percentile with linear interpolation between closest ranks.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let frac = rank - lower as f64;
    sorted[lower] * (1.0 - frac) + sorted[upper] * frac
}

/// Sample covariance matrix of row-wise series (n-1 denominator).
///
/// All rows must have equal length >= 2.
pub fn covariance_matrix(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n_series = rows.len();
    let n_obs = rows.first().map(|r| r.len()).unwrap_or(0);
    if n_obs < 2 {
        return vec![vec![0.0; n_series]; n_series];
    }

    let means: Vec<f64> = rows.iter().map(|r| mean(r)).collect();
    let mut cov = vec![vec![0.0; n_series]; n_series];

    for i in 0..n_series {
        for j in i..n_series {
            let mut sum = 0.0;
            for k in 0..n_obs {
                sum += (rows[i][k] - means[i]) * (rows[j][k] - means[j]);
            }
            let c = sum / (n_obs - 1) as f64;
            cov[i][j] = c;
            cov[j][i] = c;
        }
    }

    cov
}
