//! Component C5: Portfolio / Risk. Processes `Signal` into `Order`,
//! applies position caps and cash discipline, books `Fill`s, and records
//! the equity curve and fill history the analyzer consumes.

pub mod counters;
pub mod error;
pub mod portfolio;

pub use counters::Counters;
pub use error::PortfolioError;
pub use portfolio::{CostConfig, Portfolio, RiskConfig};
