//! Core analysis domain: indicators, features, models, risk, and portfolios.

pub mod analysis;
pub mod error;
pub mod features;
pub mod indicator;
pub mod model;
pub mod ohlcv;
pub mod portfolio;
pub mod prediction;
pub mod risk;
pub mod sentiment;
pub mod stats;
pub mod synthetic;
