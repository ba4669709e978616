#![allow(dead_code)]

use chrono::NaiveDate;
use marketlens::domain::error::MarketlensError;
pub use marketlens::domain::ohlcv::OhlcvBar;
use marketlens::ports::data_port::BarDataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl BarDataPort for MockDataPort {
    fn fetch_bars(&self, symbol: &str, _days: usize) -> Result<Vec<OhlcvBar>, MarketlensError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(MarketlensError::Data {
                reason: reason.clone(),
            });
        }
        self.data
            .get(symbol)
            .cloned()
            .ok_or_else(|| MarketlensError::NoData {
                symbol: symbol.to_string(),
            })
    }
}

pub fn make_bar(symbol: &str, date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        symbol: symbol.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close,
        high: close * 1.01,
        low: close * 0.99,
        close,
        volume: 500_000,
    }
}

/// Bars on consecutive calendar days starting 2024-01-01.
pub fn make_series(symbol: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            symbol: symbol.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 500_000,
        })
        .collect()
}

pub fn constant_series(symbol: &str, days: usize, price: f64) -> Vec<OhlcvBar> {
    make_series(symbol, &vec![price; days])
}

pub fn trending_series(symbol: &str, days: usize, start_price: f64, daily_step: f64) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..days)
        .map(|i| (start_price + i as f64 * daily_step).max(0.5))
        .collect();
    make_series(symbol, &closes)
}
