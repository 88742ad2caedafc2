//! Component C8: the Performance Analyzer. Consumes the equity curve and
//! fill history, FIFO-matches fills into round-trip trades, and computes
//! the metrics table of spec.md §4.6.

pub mod engine;
pub mod error;
pub mod report;
pub mod trade;

pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::PerformanceReport;
pub use trade::{match_fifo_trades, ClosedTrade};
