use crate::error::DataError;
use crate::source::BarSource;
use crate::symbol::exchange_of;
use core_types::{Bar, Timestamp};
use std::collections::HashMap;

/// Drives the master clock the rest of the engine reacts to.
///
/// Every symbol's bars are loaded up front, merged into one sorted
/// `timeline` of distinct trading dates, and exposed one tick at a time via
/// [`DataHandler::next_tick`]. A symbol's own cursor only ever advances when
/// that symbol actually has a bar on the current tick, so calendars that
/// differ per symbol (suspensions, listing dates) are handled without
/// synthesizing bars.
///
/// This is the single most load-bearing invariant in the whole system:
/// [`DataHandler::latest_bar`] and [`DataHandler::latest_bars`] must never
/// expose a bar beyond the currently visible index for a symbol. Every
/// accessor here reads only through `symbol_cursors`, never past it.
pub struct DataHandler {
    symbol_bars: HashMap<String, Vec<Bar>>,
    symbol_timestamp_index: HashMap<String, HashMap<Timestamp, usize>>,
    timeline: Vec<Timestamp>,
    cursor: Option<usize>,
    symbol_cursors: HashMap<String, i64>,
}

impl DataHandler {
    pub fn new(
        source: &dyn BarSource,
        symbols: &[String],
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Self, DataError> {
        let mut symbol_bars: HashMap<String, Vec<Bar>> = HashMap::new();

        for symbol in symbols {
            let exchange = exchange_of(symbol)?;
            let mut bars = source.load_bars(symbol, exchange, start, end)?;
            if bars.is_empty() {
                tracing::warn!(symbol, "no bars loaded for symbol, dropping from universe");
                continue;
            }
            bars.sort_by_key(|b| b.timestamp);
            symbol_bars.insert(symbol.clone(), bars);
        }

        if symbol_bars.is_empty() {
            return Err(DataError::EmptyUniverse);
        }

        let mut symbol_timestamp_index: HashMap<String, HashMap<Timestamp, usize>> = HashMap::new();
        let mut all_timestamps: Vec<Timestamp> = Vec::new();

        for (symbol, bars) in &symbol_bars {
            let mut idx_map = HashMap::with_capacity(bars.len());
            for (idx, bar) in bars.iter().enumerate() {
                idx_map.insert(bar.timestamp, idx);
                all_timestamps.push(bar.timestamp);
            }
            symbol_timestamp_index.insert(symbol.clone(), idx_map);
        }

        all_timestamps.sort();
        all_timestamps.dedup();

        let symbol_cursors = symbol_bars.keys().map(|s| (s.clone(), -1i64)).collect();

        Ok(Self {
            symbol_bars,
            symbol_timestamp_index,
            timeline: all_timestamps,
            cursor: None,
            symbol_cursors,
        })
    }

    pub fn symbols(&self) -> impl Iterator<Item = &String> {
        self.symbol_bars.keys()
    }

    /// Advances the master clock by one tick and returns every bar that
    /// lands on the new current timestamp, sorted by symbol for
    /// determinism. Returns `None` once the timeline is exhausted.
    pub fn next_tick(&mut self) -> Option<Vec<Bar>> {
        let next_cursor = match self.cursor {
            None => 0,
            Some(c) => c + 1,
        };
        if next_cursor >= self.timeline.len() {
            return None;
        }
        self.cursor = Some(next_cursor);
        let ts = self.timeline[next_cursor];

        let mut bars_out = Vec::new();
        for (symbol, idx_map) in &self.symbol_timestamp_index {
            if let Some(&idx) = idx_map.get(&ts) {
                self.symbol_cursors.insert(symbol.clone(), idx as i64);
                bars_out.push(self.symbol_bars[symbol][idx].clone());
            }
        }
        bars_out.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Some(bars_out)
    }

    pub fn current_time(&self) -> Option<Timestamp> {
        self.cursor.map(|c| self.timeline[c])
    }

    /// The most recent visible bar for `symbol`, or `None` if it has not
    /// yet printed a bar on or before the current tick.
    pub fn latest_bar(&self, symbol: &str) -> Option<&Bar> {
        let idx = *self.symbol_cursors.get(symbol)?;
        if idx < 0 {
            return None;
        }
        self.symbol_bars.get(symbol)?.get(idx as usize)
    }

    /// Up to the last `n` visible bars for `symbol`, oldest first. Never
    /// reaches past the symbol's current cursor.
    pub fn latest_bars(&self, symbol: &str, n: usize) -> Vec<Bar> {
        let idx = match self.symbol_cursors.get(symbol) {
            Some(&idx) if idx >= 0 => idx as usize,
            _ => return Vec::new(),
        };
        let Some(bars) = self.symbol_bars.get(symbol) else {
            return Vec::new();
        };
        let from = (idx + 1).saturating_sub(n);
        bars[from..=idx].to_vec()
    }

    pub fn reset(&mut self) {
        self.cursor = None;
        for v in self.symbol_cursors.values_mut() {
            *v = -1;
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 >= self.timeline.len())
    }
}
