//! The event payloads that flow through the engine's queue.
//!
//! This is the only crate allowed to depend on nothing but `core-types`; it
//! exists so that `engine`, `portfolio`, `execution`, and `strategy` can all
//! share one vocabulary without depending on each other.

pub mod event;
pub mod snapshot;

pub use event::Event;
pub use snapshot::PortfolioSnapshot;
