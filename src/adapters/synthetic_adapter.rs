//! Synthetic bar data adapter.
//!
//! Serves deterministically generated series from the symbol seed; used when
//! no CSV directory is configured and for demos.

use crate::domain::error::MarketlensError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::synthetic;
use crate::ports::data_port::BarDataPort;

pub struct SyntheticBarAdapter;

impl BarDataPort for SyntheticBarAdapter {
    fn fetch_bars(&self, symbol: &str, days: usize) -> Result<Vec<OhlcvBar>, MarketlensError> {
        Ok(synthetic::generate(
            symbol,
            days,
            chrono::Local::now().date_naive(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_requested_number_of_bars() {
        let adapter = SyntheticBarAdapter;
        let bars = adapter.fetch_bars("1120.SR", 90).unwrap();
        assert_eq!(bars.len(), 90);
        assert_eq!(bars[0].symbol, "1120.SR");
    }

    #[test]
    fn repeated_fetches_agree() {
        let adapter = SyntheticBarAdapter;
        let a = adapter.fetch_bars("2010.SR", 30).unwrap();
        let b = adapter.fetch_bars("2010.SR", 30).unwrap();
        assert_eq!(a, b);
    }
}
