//! CSV file bar data adapter.
//!
//! One file per symbol (`<base>/<symbol>.csv`) with a
//! `date,open,high,low,close,volume` header row.

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::domain::error::MarketlensError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::BarDataPort;

pub struct CsvBarAdapter {
    base_path: PathBuf,
}

impl CsvBarAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }

    fn parse_field<T: std::str::FromStr>(
        record: &csv::StringRecord,
        index: usize,
        name: &str,
    ) -> Result<T, MarketlensError>
    where
        T::Err: std::fmt::Display,
    {
        let raw = record.get(index).ok_or_else(|| MarketlensError::Data {
            reason: format!("missing {name} column"),
        })?;
        raw.parse().map_err(|e| MarketlensError::Data {
            reason: format!("invalid {name} value {raw:?}: {e}"),
        })
    }
}

impl BarDataPort for CsvBarAdapter {
    fn fetch_bars(&self, symbol: &str, days: usize) -> Result<Vec<OhlcvBar>, MarketlensError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| MarketlensError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| MarketlensError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(0).ok_or_else(|| MarketlensError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                MarketlensError::Data {
                    reason: format!("invalid date {date_str:?}: {e}"),
                }
            })?;

            bars.push(OhlcvBar {
                symbol: symbol.to_string(),
                date,
                open: Self::parse_field(&record, 1, "open")?,
                high: Self::parse_field(&record, 2, "high")?,
                low: Self::parse_field(&record, 3, "low")?,
                close: Self::parse_field(&record, 4, "close")?,
                volume: Self::parse_field(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        if bars.len() > days {
            bars.drain(..bars.len() - days);
        }
        Ok(bars)
    }
}
