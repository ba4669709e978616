//! Simple and exponential moving averages.
//!
//! EMA seeds with the first price and applies `ema = alpha*price + (1-alpha)*ema`
//! with `alpha = 2/(n+1)` over the full available history, not just the last
//! window. At least `n` bars are required before the value is reported.

/// Arithmetic mean of the last `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Latest EMA value over the full history.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    ema_series(values, period).last().copied()
}

/// Full EMA recurrence, one value per input, seeded with the first value.
///
/// Availability gating (len >= period) is the caller's concern; the MACD signal
/// line needs the whole warm-up path.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if values.is_empty() || period == 0 {
        return Vec::new();
    }
    let alpha = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = values[0];
    out.push(ema);
    for &price in &values[1..] {
        ema = alpha * price + (1.0 - alpha) * ema;
        out.push(ema);
    }
    out
}
