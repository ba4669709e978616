//! Deterministic synthetic bar generation.
//!
//! A random walk seeded from the symbol string, so the same symbol always
//! yields the same series. Used when no real data source can supply bars and
//! by the portfolio analyzer as a per-holding fallback.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_DAYS: usize = 365;

const BASE_PRICE_RANGE: (f64, f64) = (20.0, 100.0);
const DAILY_RETURN_SIGMA: f64 = 0.02;
const PRICE_FLOOR: f64 = 0.1;
const VOLUME_RANGE: (i64, i64) = (100_000, 2_000_000);

/// Stable 64-bit FNV-1a over the symbol bytes. `DefaultHasher` is not
/// guaranteed stable across releases, and the seed must be.
fn symbol_seed(symbol: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in symbol.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Generate `days` consecutive calendar-day bars ending at `end_date`.
pub fn generate(symbol: &str, days: usize, end_date: NaiveDate) -> Vec<OhlcvBar> {
    let mut rng = StdRng::seed_from_u64(symbol_seed(symbol));
    let normal = Normal::new(0.0, DAILY_RETURN_SIGMA).expect("sigma is positive");

    let base_price = rng.gen_range(BASE_PRICE_RANGE.0..BASE_PRICE_RANGE.1);
    let mut price = base_price;
    let mut bars = Vec::with_capacity(days);

    for i in 0..days {
        if i > 0 {
            let ret: f64 = normal.sample(&mut rng);
            price = (price * (1.0 + ret)).max(PRICE_FLOOR);
        }

        let high = price * rng.gen_range(1.0..1.05);
        let low = price * rng.gen_range(0.95..1.0);
        let volume = rng.gen_range(VOLUME_RANGE.0..VOLUME_RANGE.1);
        let offset = (days - 1 - i) as i64;

        bars.push(OhlcvBar {
            symbol: symbol.to_string(),
            date: end_date - chrono::Duration::days(offset),
            open: price,
            high,
            low,
            close: price,
            volume,
        });
    }

    bars
}
