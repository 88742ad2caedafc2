use crate::error::EngineError;
use crate::queue::EventQueue;
use core_types::Timestamp;
use data::DataHandler;
use events::Event;
use execution::ExecutionSimulator;
use portfolio::Portfolio;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use strategy::Strategy;

/// Component C7: owns the event queue, drives the Data Handler, and
/// dispatches events to the Portfolio/Execution/Strategy components in the
/// fixed order of spec.md §4.7. Single-threaded, cooperative, no
/// suspension inside a tick (spec.md §5) — this is a plain loop, not a
/// task scheduler.
pub struct Engine {
    data: DataHandler,
    portfolio: Portfolio,
    execution: ExecutionSimulator,
    strategies: HashMap<String, Box<dyn Strategy>>,
    queue: EventQueue,
    ticks_run: u64,
}

impl Engine {
    pub fn new(
        data: DataHandler,
        portfolio: Portfolio,
        execution: ExecutionSimulator,
        strategies: HashMap<String, Box<dyn Strategy>>,
    ) -> Result<Self, EngineError> {
        if strategies.is_empty() {
            return Err(EngineError::NoStrategies);
        }
        Ok(Self {
            data,
            portfolio,
            execution,
            strategies,
            queue: EventQueue::new(),
            ticks_run: 0,
        })
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn ticks_run(&self) -> u64 {
        self.ticks_run
    }

    /// Runs the backtest to completion: for every timeline tick, enqueue
    /// all of that tick's `Market` events, then fully drain the queue
    /// (with its entire Signal/Order/Fill tail) before advancing to the
    /// next tick.
    pub fn run(&mut self) {
        while let Some(bars) = self.data.next_tick() {
            self.ticks_run += 1;
            let timestamp = self.data.current_time().expect("next_tick just advanced the cursor");

            for bar in bars {
                self.queue.enqueue(Event::Market(bar));
            }

            while let Some(event) = self.queue.dequeue() {
                self.dispatch(event, timestamp);
            }
        }
    }

    /// Dispatches a single event. A handler panic is caught, logged with
    /// event context, and the loop continues with the next event — a
    /// single symbol's bad state must not abort the whole backtest
    /// (spec.md §7 error kind 7). This accepts that a mid-mutation panic
    /// may leave partial state behind; there is no rollback.
    fn dispatch(&mut self, event: Event, timestamp: Timestamp) {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.dispatch_inner(event)));
        if outcome.is_err() {
            tracing::error!(timestamp = %timestamp, "event handler panicked; event dropped, continuing");
        }
    }

    fn dispatch_inner(&mut self, event: Event) {
        match event {
            Event::Market(bar) => {
                self.portfolio.update_on_market(bar.timestamp, &self.data);
                if let Some(strategy) = self.strategies.get_mut(&bar.symbol) {
                    let snapshot = self.portfolio.snapshot();
                    let signals = strategy.on_market(&bar, &self.data, &snapshot);
                    for signal in signals {
                        self.queue.enqueue(Event::Signal(signal));
                    }
                }
            }
            Event::Signal(signal) => {
                if let Some(order) = self.portfolio.process_signal(&signal, &self.data) {
                    self.queue.enqueue(Event::Order(order));
                }
            }
            Event::Order(order) => {
                if let Some(fill) = self.execution.execute(&order, &self.data) {
                    self.queue.enqueue(Event::Fill(fill));
                }
            }
            Event::Fill(fill) => {
                self.portfolio.update_on_fill(&fill);
            }
        }
    }
}
