//! Bar data access port trait.

use crate::domain::error::MarketlensError;
use crate::domain::ohlcv::OhlcvBar;

pub trait BarDataPort {
    /// Fetch up to `days` of the most recent daily bars for `symbol`,
    /// ascending by date.
    fn fetch_bars(&self, symbol: &str, days: usize) -> Result<Vec<OhlcvBar>, MarketlensError>;
}
