//! RSI (Relative Strength Index).
//!
//! Simple rolling means of the trailing `period` gains and losses (not
//! Wilder's smoothing): RS = avg_gain/avg_loss, RSI = 100 - 100/(1+RS).
//! avg_loss == 0 → 100. Fewer than period+1 closes → neutral 50.

pub const DEFAULT_PERIOD: usize = 14;

pub fn rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return 50.0;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let tail = &deltas[deltas.len() - period..];

    let avg_gain =
        tail.iter().map(|&d| if d > 0.0 { d } else { 0.0 }).sum::<f64>() / period as f64;
    let avg_loss =
        tail.iter().map(|&d| if d < 0.0 { -d } else { 0.0 }).sum::<f64>() / period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
