use events::Event;
use std::collections::VecDeque;

/// A concrete FIFO of the `Event` tagged variant. Dispatch over events is
/// an exhaustive match, not inheritance or callbacks (spec.md §9).
#[derive(Default)]
pub struct EventQueue {
    inner: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, event: Event) {
        self.inner.push_back(event);
    }

    pub fn dequeue(&mut self) -> Option<Event> {
        self.inner.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
