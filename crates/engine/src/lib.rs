//! Component C7: the Engine. Owns the master event queue and drives the
//! Data Handler, Portfolio, Execution Simulator, and Strategy set through
//! one backtest, in the fixed dispatch order of spec.md §4.7.

pub mod engine;
pub mod error;
pub mod queue;

pub use engine::Engine;
pub use error::EngineError;
pub use queue::EventQueue;
