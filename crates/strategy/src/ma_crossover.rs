use crate::{Strategy, StrategyError, StrategyState};
use core_types::{Bar, Direction, Signal};
use data::DataHandler;
use events::PortfolioSnapshot;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use ta::indicators::SimpleMovingAverage as Sma;
use ta::Next;

/// Dual moving-average crossover: LONG when the fast MA crosses above the
/// slow MA, SHORT (close) on the reverse cross. One instance is bound to
/// one symbol. Grounded in `strategies/src/ma_crossover.rs`, simplified
/// from a triple-MA trend filter to a plain crossover since the core spec
/// does not call out a trend filter.
pub struct MaCrossover {
    symbol: String,
    ma_fast: Sma,
    ma_slow: Sma,
    prev_fast_ma: Option<Decimal>,
    prev_slow_ma: Option<Decimal>,
    state: StrategyState,
}

impl MaCrossover {
    pub fn new(symbol: String, fast_period: usize, slow_period: usize) -> Result<Self, StrategyError> {
        if fast_period >= slow_period {
            return Err(StrategyError::InvalidParameters(
                "fast_period must be less than slow_period".to_string(),
            ));
        }
        Ok(Self {
            symbol,
            ma_fast: Sma::new(fast_period).map_err(|e| StrategyError::InvalidParameters(e.to_string()))?,
            ma_slow: Sma::new(slow_period).map_err(|e| StrategyError::InvalidParameters(e.to_string()))?,
            prev_fast_ma: None,
            prev_slow_ma: None,
            state: StrategyState::default(),
        })
    }
}

impl Strategy for MaCrossover {
    fn state_mut(&mut self) -> &mut StrategyState {
        &mut self.state
    }

    fn handle_market(
        &mut self,
        bar: &Bar,
        _data: &DataHandler,
        _portfolio: &PortfolioSnapshot,
    ) -> Result<Vec<Signal>, StrategyError> {
        if bar.symbol != self.symbol {
            return Ok(Vec::new());
        }

        let close_f64 = bar
            .close
            .to_f64()
            .ok_or_else(|| StrategyError::Indicator("close price does not fit in f64".to_string()))?;

        let current_fast = Decimal::from_f64(self.ma_fast.next(close_f64))
            .ok_or_else(|| StrategyError::Indicator("fast MA produced a non-finite value".to_string()))?;
        let current_slow = Decimal::from_f64(self.ma_slow.next(close_f64))
            .ok_or_else(|| StrategyError::Indicator("slow MA produced a non-finite value".to_string()))?;

        let mut signals = Vec::new();
        if let (Some(prev_fast), Some(prev_slow)) = (self.prev_fast_ma, self.prev_slow_ma) {
            let bullish_cross = prev_fast <= prev_slow && current_fast > current_slow;
            let bearish_cross = prev_fast >= prev_slow && current_fast < current_slow;

            if bullish_cross {
                signals.push(Signal {
                    symbol: self.symbol.clone(),
                    direction: Direction::Long,
                    strength: dec!(1.0),
                    timestamp: bar.timestamp,
                    reference_price: Some(bar.close),
                });
            } else if bearish_cross {
                signals.push(Signal {
                    symbol: self.symbol.clone(),
                    direction: Direction::Short,
                    strength: dec!(1.0),
                    timestamp: bar.timestamp,
                    reference_price: Some(bar.close),
                });
            }
        }

        self.prev_fast_ma = Some(current_fast);
        self.prev_slow_ma = Some(current_slow);

        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::Exchange;
    use std::collections::HashMap as Map;

    fn bar(day: u32, close: Decimal) -> Bar {
        Bar::new(
            "000001.SZ".to_string(),
            Exchange::SZ,
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            core_types::Interval::Daily,
            close,
            close,
            close,
            close,
            dec!(1000),
            dec!(10000),
            close,
            close + dec!(1),
            close - dec!(1),
            Map::new(),
        )
        .unwrap()
    }

    fn empty_snapshot() -> PortfolioSnapshot {
        PortfolioSnapshot {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            cash: dec!(100000),
            total_equity: dec!(100000),
            positions: Vec::new(),
        }
    }

    #[test]
    fn rejects_fast_period_not_less_than_slow() {
        assert!(MaCrossover::new("000001.SZ".to_string(), 10, 10).is_err());
    }

    #[test]
    fn emits_long_signal_on_bullish_crossover() {
        let mut strat = MaCrossover::new("000001.SZ".to_string(), 2, 3).unwrap();
        let data = single_bar_handler();
        let snapshot = empty_snapshot();

        let closes = [dec!(10), dec!(9), dec!(8), dec!(9), dec!(11), dec!(13)];
        let mut emitted_long = false;
        for (i, &c) in closes.iter().enumerate() {
            let bar = bar(i as u32 + 1, c);
            let signals = strat.handle_market(&bar, &data, &snapshot).unwrap();
            if signals.iter().any(|s| s.direction == Direction::Long) {
                emitted_long = true;
            }
        }
        assert!(emitted_long);
    }

    struct OneBarSource {
        bar: Bar,
    }
    impl data::BarSource for OneBarSource {
        fn load_bars(
            &self,
            _s: &str,
            _e: Exchange,
            _start: core_types::Timestamp,
            _end: core_types::Timestamp,
        ) -> Result<Vec<Bar>, data::DataError> {
            Ok(vec![self.bar.clone()])
        }
    }

    /// `handle_market` never reads `data`, so any constructible handler works.
    fn single_bar_handler() -> data::DataHandler {
        let source = OneBarSource { bar: bar(1, dec!(10)) };
        data::DataHandler::new(
            &source,
            &["000001.SZ".to_string()],
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }
}
