use core_types::{Bar, Fill, Order, Signal};

/// The tagged union the Engine's queue is built from. Dispatch over this is
/// exhaustive pattern matching, never inheritance or callbacks — see
/// `engine::Engine::dispatch`.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Market(Bar),
    Signal(Signal),
    Order(Order),
    Fill(Fill),
}

impl Event {
    pub fn timestamp(&self) -> core_types::Timestamp {
        match self {
            Event::Market(bar) => bar.timestamp,
            Event::Signal(signal) => signal.timestamp,
            Event::Order(order) => order.timestamp,
            Event::Fill(fill) => fill.timestamp,
        }
    }
}
