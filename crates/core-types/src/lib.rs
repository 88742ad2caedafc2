pub mod enums;
pub mod error;
pub mod structs;

pub use enums::{Direction, Exchange, Interval, OrderType};
pub use error::CoreError;
pub use structs::{Bar, EquityPoint, Fill, FillRecord, Order, Position, Signal, Timestamp};
