//! Component C6: the Execution Simulator. Turns a sized `Order` into a
//! `Fill` using the current bar's close price plus slippage and
//! commission.

pub mod counters;
pub mod error;
pub mod simulator;

pub use counters::Counters;
pub use error::ExecutionError;
pub use simulator::{CostConfig, ExecutionSimulator};
