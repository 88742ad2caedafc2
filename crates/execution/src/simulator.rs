use crate::counters::Counters;
use crate::error::ExecutionError;
use core_types::{Direction, Fill, Order, OrderType};
use data::DataHandler;
use rust_decimal::Decimal;

pub struct CostConfig {
    pub commission_rate: Decimal,
    pub min_commission: Decimal,
    pub slippage_rate: Decimal,
}

/// Component C6: turns a sized `Order` into a `Fill` using the current
/// bar's close price plus a fixed slippage and commission model. Grounded
/// in `executor/src/exchange.rs::SimulatedExecutor`, with the bid/ask
/// spread and async signature dropped — this system has no order book,
/// and the engine runs a single-threaded cooperative loop (spec.md §5).
pub struct ExecutionSimulator {
    cost: CostConfig,
    counters: Counters,
}

impl ExecutionSimulator {
    /// Fails fast on a malformed cost config (spec.md §7 error kind 1):
    /// negative rates or a negative commission floor can never be sane.
    pub fn new(cost: CostConfig) -> Result<Self, ExecutionError> {
        if cost.commission_rate.is_sign_negative()
            || cost.min_commission.is_sign_negative()
            || cost.slippage_rate.is_sign_negative()
        {
            return Err(ExecutionError::InvalidCostConfig);
        }
        Ok(Self { cost, counters: Counters::default() })
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// No partial fills, no liquidity cap: a valid order always either
    /// fills in full or is rejected outright (spec.md §4.5).
    pub fn execute(&mut self, order: &Order, data: &DataHandler) -> Option<Fill> {
        self.counters.received += 1;

        if order.symbol.is_empty() || order.volume <= 0 {
            tracing::warn!(symbol = %order.symbol, volume = order.volume, "rejecting order: invalid symbol or volume");
            self.counters.rejected += 1;
            return None;
        }

        let base_price = match order.order_type {
            OrderType::Market => match data.latest_bar(&order.symbol) {
                Some(bar) => bar.close,
                None => {
                    tracing::warn!(symbol = %order.symbol, "rejecting MARKET order: no price data");
                    self.counters.rejected += 1;
                    return None;
                }
            },
            OrderType::Limit => match order.limit_price {
                Some(p) if p > Decimal::ZERO => p,
                _ => {
                    tracing::warn!(symbol = %order.symbol, "rejecting LIMIT order: missing or non-positive limit_price");
                    self.counters.rejected += 1;
                    return None;
                }
            },
        };

        let price = match order.direction {
            Direction::Long => base_price * (Decimal::ONE + self.cost.slippage_rate),
            Direction::Short => base_price * (Decimal::ONE - self.cost.slippage_rate),
        };

        let commission = (price * Decimal::from(order.volume) * self.cost.commission_rate).max(self.cost.min_commission);
        let timestamp = data.current_time().unwrap_or(order.timestamp);

        self.counters.executed += 1;
        Some(Fill {
            symbol: order.symbol.clone(),
            direction: order.direction,
            volume: order.volume,
            price,
            commission,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{Bar, Exchange, Interval};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    struct ConstantBars {
        bars: HashMap<String, Vec<Bar>>,
    }

    impl data::BarSource for ConstantBars {
        fn load_bars(
            &self,
            symbol: &str,
            _exchange: Exchange,
            _start: core_types::Timestamp,
            _end: core_types::Timestamp,
        ) -> Result<Vec<Bar>, data::DataError> {
            Ok(self.bars.get(symbol).cloned().unwrap_or_default())
        }
    }

    fn handler_at(symbol: &str, close: Decimal) -> DataHandler {
        let bar = Bar::new(
            symbol.to_string(),
            Exchange::SZ,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            Interval::Daily,
            close,
            close,
            close,
            close,
            dec!(1000),
            dec!(10000),
            close,
            close + dec!(1),
            close - dec!(1),
            Default::default(),
        )
        .unwrap();
        let mut bars = HashMap::new();
        bars.insert(symbol.to_string(), vec![bar]);
        let source = ConstantBars { bars };
        let mut h = DataHandler::new(
            &source,
            &[symbol.to_string()],
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();
        h.next_tick();
        h
    }

    fn order(symbol: &str, direction: Direction, volume: i64) -> Order {
        Order {
            symbol: symbol.to_string(),
            order_type: OrderType::Market,
            direction,
            volume,
            limit_price: None,
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        }
    }

    #[test]
    fn applies_slippage_and_commission_on_long_fill() {
        let mut sim = ExecutionSimulator::new(CostConfig {
            commission_rate: dec!(0.0003),
            min_commission: dec!(5),
            slippage_rate: dec!(0.001),
        })
        .unwrap();
        let data = handler_at("000001.SZ", dec!(10));
        let fill = sim.execute(&order("000001.SZ", Direction::Long, 1000), &data).unwrap();
        assert_eq!(fill.price, dec!(10.01));
        assert_eq!(fill.commission, dec!(5)); // 10.01*1000*0.0003 = 3.003, floored by min_commission
    }

    #[test]
    fn short_fill_applies_negative_slippage() {
        let mut sim = ExecutionSimulator::new(CostConfig {
            commission_rate: dec!(0.0003),
            min_commission: dec!(5),
            slippage_rate: dec!(0.001),
        })
        .unwrap();
        let data = handler_at("000001.SZ", dec!(10));
        let fill = sim.execute(&order("000001.SZ", Direction::Short, 1000), &data).unwrap();
        assert_eq!(fill.price, dec!(9.99));
    }

    #[test]
    fn rejects_order_with_no_price_data() {
        let mut sim = ExecutionSimulator::new(CostConfig {
            commission_rate: dec!(0.0003),
            min_commission: dec!(5),
            slippage_rate: dec!(0.001),
        })
        .unwrap();
        let data = handler_at("000001.SZ", dec!(10));
        let fill = sim.execute(&order("999999.SZ", Direction::Long, 100), &data);
        assert!(fill.is_none());
        assert_eq!(sim.counters().rejected, 1);
    }

    #[test]
    fn rejects_zero_volume_order() {
        let mut sim = ExecutionSimulator::new(CostConfig {
            commission_rate: dec!(0.0003),
            min_commission: dec!(5),
            slippage_rate: dec!(0.001),
        })
        .unwrap();
        let data = handler_at("000001.SZ", dec!(10));
        let fill = sim.execute(&order("000001.SZ", Direction::Long, 0), &data);
        assert!(fill.is_none());
    }

    #[test]
    fn rejects_negative_slippage_rate_at_construction() {
        let result = ExecutionSimulator::new(CostConfig {
            commission_rate: dec!(0.0003),
            min_commission: dec!(5),
            slippage_rate: dec!(-0.001),
        });
        assert!(matches!(result, Err(ExecutionError::InvalidCostConfig)));
    }
}
