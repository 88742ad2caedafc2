use crate::counters::Counters;
use core_types::{Direction, Fill, FillRecord, Order, OrderType, Position, Signal, Timestamp};
use data::DataHandler;
use events::PortfolioSnapshot;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sizer::Sizer;
use std::collections::HashMap;

const BOARD_LOT: i64 = 100;
/// Minimum net proceeds a SHORT (close) must clear to avoid dust churn.
const DEFAULT_DUST_FLOOR: Decimal = dec!(1000);
/// Tolerance for the cash-delta accounting check in `update_on_fill`.
const CASH_DELTA_TOLERANCE: Decimal = dec!(0.01);

fn round_down_to_lot(volume: i64) -> i64 {
    (volume / BOARD_LOT) * BOARD_LOT
}

pub struct CostConfig {
    pub commission_rate: Decimal,
    pub min_commission: Decimal,
}

pub struct RiskConfig {
    pub max_positions: u32,
    pub cash_reserve_ratio: Decimal,
}

/// Component C5: processes `Signal` into `Order` (applying position caps and
/// cash discipline) and `Fill` into updated cash/position book-keeping.
/// Records the equity curve and fill history that the analyzer later
/// consumes. Grounded in `executor/src/portfolio.rs`'s cash/position map,
/// generalized to the signal → order risk checks of this system.
pub struct Portfolio {
    cash: Decimal,
    positions: HashMap<String, i64>,
    total_equity: Decimal,
    last_timestamp: Option<Timestamp>,
    equity_curve: Vec<core_types::EquityPoint>,
    fill_history: Vec<FillRecord>,
    total_commission: Decimal,
    counters: Counters,
    sizer: Box<dyn Sizer>,
    risk: RiskConfig,
    cost: CostConfig,
    dust_floor: Decimal,
}

impl Portfolio {
    /// Fails fast on a malformed configuration (spec.md §7 error kind 1)
    /// rather than letting it surface as silent mis-sizing at runtime.
    pub fn new(
        initial_capital: Decimal,
        sizer: Box<dyn Sizer>,
        risk: RiskConfig,
        cost: CostConfig,
    ) -> Result<Self, crate::error::PortfolioError> {
        if initial_capital.is_sign_negative() {
            return Err(crate::error::PortfolioError::InvalidInitialCapital);
        }
        if risk.max_positions == 0 {
            return Err(crate::error::PortfolioError::InvalidMaxPositions);
        }
        if risk.cash_reserve_ratio.is_sign_negative() || risk.cash_reserve_ratio > Decimal::ONE {
            return Err(crate::error::PortfolioError::InvalidCashReserveRatio);
        }

        Ok(Self {
            cash: initial_capital,
            positions: HashMap::new(),
            total_equity: initial_capital,
            last_timestamp: None,
            equity_curve: Vec::new(),
            fill_history: Vec::new(),
            total_commission: Decimal::ZERO,
            counters: Counters::default(),
            sizer,
            risk,
            cost,
            dust_floor: DEFAULT_DUST_FLOOR,
        })
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn total_equity(&self) -> Decimal {
        self.total_equity
    }

    pub fn shares_held(&self, symbol: &str) -> i64 {
        self.positions.get(symbol).copied().unwrap_or(0)
    }

    pub fn equity_curve(&self) -> &[core_types::EquityPoint] {
        &self.equity_curve
    }

    pub fn fill_history(&self) -> &[FillRecord] {
        &self.fill_history
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn snapshot(&self) -> PortfolioSnapshot {
        PortfolioSnapshot {
            timestamp: self.last_timestamp.unwrap_or_else(|| chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
            cash: self.cash,
            total_equity: self.total_equity,
            positions: self
                .positions
                .iter()
                .map(|(symbol, &shares)| Position { symbol: symbol.clone(), shares })
                .collect(),
        }
    }

    /// Recomputes `positions_value` from the Data Handler's latest closes
    /// across every held symbol, sets `total_equity`, and appends an
    /// `EquityPoint`. Called once per `Market` event, per spec.md §4.4.
    pub fn update_on_market(&mut self, timestamp: Timestamp, data: &DataHandler) {
        self.counters.market_updates += 1;
        self.last_timestamp = Some(timestamp);

        let mut positions_value = Decimal::ZERO;
        for (symbol, &shares) in &self.positions {
            if let Some(bar) = data.latest_bar(symbol) {
                positions_value += Decimal::from(shares) * bar.close;
            } else {
                tracing::warn!(symbol, "no latest bar while marking to market; valuing at 0");
            }
        }

        self.total_equity = self.cash + positions_value;
        self.equity_curve.push(core_types::EquityPoint {
            timestamp,
            total_equity: self.total_equity,
            cash: self.cash,
            positions_value,
        });
    }

    /// Risk-checks and sizes a `Signal` into an `Order`, or drops it with a
    /// logged reason. See spec.md §4.4 LONG/SHORT paths.
    pub fn process_signal(&mut self, signal: &Signal, data: &DataHandler) -> Option<Order> {
        self.counters.signals_processed += 1;
        let result = match signal.direction {
            Direction::Long => self.process_long_signal(signal, data),
            Direction::Short => self.process_short_signal(signal, data),
        };
        if result.is_none() {
            self.counters.signals_dropped += 1;
        }
        result
    }

    fn process_long_signal(&mut self, signal: &Signal, data: &DataHandler) -> Option<Order> {
        let held_count = self.positions.len() as u32;
        if held_count >= self.risk.max_positions {
            tracing::info!(symbol = %signal.symbol, held_count, max = self.risk.max_positions, "dropping LONG signal: at max_positions");
            return None;
        }
        if self.shares_held(&signal.symbol) > 0 {
            tracing::info!(symbol = %signal.symbol, "dropping LONG signal: already held, no pyramiding");
            return None;
        }
        let Some(latest) = data.latest_bar(&signal.symbol) else {
            tracing::info!(symbol = %signal.symbol, "dropping LONG signal: no price data");
            return None;
        };
        let price = latest.close;

        let snapshot = self.snapshot();
        let target_value = self.sizer.target_value(&snapshot, signal, data);
        if target_value <= Decimal::ZERO {
            tracing::info!(symbol = %signal.symbol, "dropping LONG signal: sizer returned non-positive target");
            return None;
        }

        let raw_volume = (target_value / price).trunc().to_i64().unwrap_or(0);
        let mut volume = round_down_to_lot(raw_volume);
        if volume == 0 {
            tracing::info!(symbol = %signal.symbol, "dropping LONG signal: sized volume rounds to 0 lots");
            return None;
        }

        let commission = (price * Decimal::from(volume) * self.cost.commission_rate).max(self.cost.min_commission);
        let estimated_total = price * Decimal::from(volume) + commission;

        // The portfolio's own reserve floor applies on top of whatever the
        // sizer already capped to, independent of the sizer's configuration.
        let usable_cash = self.cash * (Decimal::ONE - self.risk.cash_reserve_ratio);

        if estimated_total > usable_cash {
            let denom = price * (Decimal::ONE + self.cost.commission_rate);
            let affordable_raw = ((usable_cash - self.cost.min_commission) / denom).trunc().to_i64().unwrap_or(0);
            let affordable = round_down_to_lot(affordable_raw.max(0));
            if affordable == 0 {
                tracing::info!(symbol = %signal.symbol, "dropping LONG signal: insufficient cash even after resizing");
                return None;
            }
            volume = affordable;
        }

        Some(Order {
            symbol: signal.symbol.clone(),
            order_type: OrderType::Market,
            direction: Direction::Long,
            volume,
            limit_price: None,
            timestamp: signal.timestamp,
        })
    }

    fn process_short_signal(&mut self, signal: &Signal, data: &DataHandler) -> Option<Order> {
        let shares = self.shares_held(&signal.symbol);
        if shares <= 0 {
            tracing::info!(symbol = %signal.symbol, "dropping SHORT signal: nothing held");
            return None;
        }
        let Some(latest) = data.latest_bar(&signal.symbol) else {
            tracing::info!(symbol = %signal.symbol, "dropping SHORT signal: no price data");
            return None;
        };
        let price = latest.close;

        let gross = price * Decimal::from(shares);
        let commission = (gross * self.cost.commission_rate).max(self.cost.min_commission);
        let net = gross - commission;
        if net < self.dust_floor {
            tracing::info!(symbol = %signal.symbol, net = %net, "dropping SHORT signal: below dust floor");
            return None;
        }

        Some(Order {
            symbol: signal.symbol.clone(),
            order_type: OrderType::Market,
            direction: Direction::Short,
            volume: shares,
            limit_price: None,
            timestamp: signal.timestamp,
        })
    }

    /// Applies a `Fill` to cash and positions, validates the cash delta
    /// against the expected value within `CASH_DELTA_TOLERANCE`, and
    /// appends a `FillRecord`. Never returns an error: accounting drift is
    /// logged, not fatal (spec.md §7 error kind 6).
    pub fn update_on_fill(&mut self, fill: &Fill) {
        self.counters.fills_processed += 1;
        let cash_before = self.cash;

        match fill.direction {
            Direction::Long => {
                self.cash -= fill.net_value();
                *self.positions.entry(fill.symbol.clone()).or_insert(0) += fill.volume;
            }
            Direction::Short => {
                self.cash += fill.net_value();
                let remaining = self.shares_held(&fill.symbol) - fill.volume;
                if remaining <= 0 {
                    self.positions.remove(&fill.symbol);
                } else {
                    self.positions.insert(fill.symbol.clone(), remaining);
                }
            }
        }

        let expected_delta = match fill.direction {
            Direction::Long => -fill.trade_value() - fill.commission,
            Direction::Short => fill.trade_value() - fill.commission,
        };
        let actual_delta = self.cash - cash_before;
        if (actual_delta - expected_delta).abs() > CASH_DELTA_TOLERANCE {
            tracing::error!(
                symbol = %fill.symbol,
                expected = %expected_delta,
                actual = %actual_delta,
                "accounting drift: cash delta does not match expected fill value"
            );
        }

        self.total_commission += fill.commission;
        self.counters.total_trades += 1;
        self.fill_history.push(FillRecord::from(fill));

        if self.cash < Decimal::ZERO {
            tracing::error!(cash = %self.cash, "portfolio cash went negative after fill");
        }
    }

    pub fn total_commission(&self) -> Decimal {
        self.total_commission
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{Bar, Exchange, Interval};

    struct ConstantBars {
        bars: HashMap<String, Vec<Bar>>,
    }

    impl data::BarSource for ConstantBars {
        fn load_bars(
            &self,
            symbol: &str,
            _exchange: Exchange,
            _start: Timestamp,
            _end: Timestamp,
        ) -> Result<Vec<Bar>, data::DataError> {
            Ok(self.bars.get(symbol).cloned().unwrap_or_default())
        }
    }

    fn bar(symbol: &str, day: u32, close: Decimal) -> Bar {
        Bar::new(
            symbol.to_string(),
            Exchange::SZ,
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
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
        .unwrap()
    }

    fn handler_with(symbol: &str, closes: &[(u32, Decimal)]) -> DataHandler {
        let mut bars = HashMap::new();
        bars.insert(symbol.to_string(), closes.iter().map(|&(d, c)| bar(symbol, d, c)).collect());
        let source = ConstantBars { bars };
        let mut handler = DataHandler::new(
            &source,
            &[symbol.to_string()],
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
        .unwrap();
        while handler.next_tick().is_some() {}
        handler
    }

    struct FixedSizer(Decimal);
    impl Sizer for FixedSizer {
        fn target_value(&self, _p: &PortfolioSnapshot, _s: &Signal, _d: &DataHandler) -> Decimal {
            self.0
        }
    }

    fn portfolio(cash: Decimal, target: Decimal) -> Portfolio {
        Portfolio::new(
            cash,
            Box::new(FixedSizer(target)),
            RiskConfig { max_positions: 5, cash_reserve_ratio: Decimal::ZERO },
            CostConfig { commission_rate: dec!(0.0003), min_commission: dec!(5) },
        )
        .unwrap()
    }

    #[test]
    fn rejects_zero_max_positions_at_construction() {
        let result = Portfolio::new(
            dec!(100000),
            Box::new(FixedSizer(dec!(1000))),
            RiskConfig { max_positions: 0, cash_reserve_ratio: Decimal::ZERO },
            CostConfig { commission_rate: dec!(0.0003), min_commission: dec!(5) },
        );
        assert!(result.is_err());
    }

    #[test]
    fn long_signal_sizes_and_rounds_to_board_lot() {
        let mut p = portfolio(dec!(100000), dec!(50000));
        let data = handler_with("000001.SZ", &[(2, dec!(10))]);
        let signal = Signal {
            symbol: "000001.SZ".to_string(),
            direction: Direction::Long,
            strength: dec!(1.0),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            reference_price: None,
        };
        let order = p.process_signal(&signal, &data).unwrap();
        assert_eq!(order.volume, 5000);
        assert_eq!(order.direction, Direction::Long);
    }

    #[test]
    fn long_signal_dropped_when_already_held() {
        let mut p = portfolio(dec!(100000), dec!(50000));
        p.positions.insert("000001.SZ".to_string(), 100);
        let data = handler_with("000001.SZ", &[(2, dec!(10))]);
        let signal = Signal {
            symbol: "000001.SZ".to_string(),
            direction: Direction::Long,
            strength: dec!(1.0),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            reference_price: None,
        };
        assert!(p.process_signal(&signal, &data).is_none());
    }

    #[test]
    fn scenario_b_max_positions_caps_concurrent_long_signals() {
        let mut p = Portfolio::new(
            dec!(100000),
            Box::new(FixedSizer(dec!(10000))),
            RiskConfig { max_positions: 2, cash_reserve_ratio: Decimal::ZERO },
            CostConfig { commission_rate: dec!(0.0003), min_commission: dec!(5) },
        )
        .unwrap();

        let mut bars = HashMap::new();
        bars.insert("000001.SZ".to_string(), vec![bar("000001.SZ", 2, dec!(10))]);
        bars.insert("000002.SZ".to_string(), vec![bar("000002.SZ", 2, dec!(20))]);
        bars.insert("000003.SZ".to_string(), vec![bar("000003.SZ", 2, dec!(30))]);
        let source = ConstantBars { bars };
        let mut data = DataHandler::new(
            &source,
            &["000001.SZ".to_string(), "000002.SZ".to_string(), "000003.SZ".to_string()],
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
        .unwrap();
        data.next_tick();

        let signal_for = |symbol: &str| Signal {
            symbol: symbol.to_string(),
            direction: Direction::Long,
            strength: dec!(1.0),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            reference_price: None,
        };

        // S1 and S2 each open (order issued, fill applied), reaching
        // max_positions=2. S3's LONG signal is then dropped at the gate,
        // per spec.md §8 Scenario B.
        let order1 = p.process_signal(&signal_for("000001.SZ"), &data).expect("S1 should size an order");
        p.update_on_fill(&Fill {
            symbol: "000001.SZ".to_string(),
            direction: Direction::Long,
            volume: order1.volume,
            price: dec!(10),
            commission: dec!(5),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        });

        let order2 = p.process_signal(&signal_for("000002.SZ"), &data).expect("S2 should size an order");
        p.update_on_fill(&Fill {
            symbol: "000002.SZ".to_string(),
            direction: Direction::Long,
            volume: order2.volume,
            price: dec!(20),
            commission: dec!(5),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        });

        assert!(p.process_signal(&signal_for("000003.SZ"), &data).is_none());
    }

    #[test]
    fn insufficient_cash_recomputes_affordable_volume() {
        let mut p = portfolio(dec!(1000), dec!(1000));
        let data = handler_with("000001.SZ", &[(2, dec!(10))]);
        let signal = Signal {
            symbol: "000001.SZ".to_string(),
            direction: Direction::Long,
            strength: dec!(1.0),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            reference_price: None,
        };
        // raw=100 shares, commission=max(0.3,5)=5, total=1005 > 1000 cash.
        let order = p.process_signal(&signal, &data);
        assert!(order.is_none(), "affordable volume should round down to 0 lots");
    }

    #[test]
    fn cash_reserve_ratio_shrinks_affordable_volume_independent_of_sizer() {
        let mut p = Portfolio::new(
            dec!(10000),
            Box::new(FixedSizer(dec!(10000))),
            RiskConfig { max_positions: 5, cash_reserve_ratio: dec!(0.5) },
            CostConfig { commission_rate: dec!(0.0003), min_commission: dec!(5) },
        )
        .unwrap();
        let data = handler_with("000001.SZ", &[(2, dec!(10))]);
        let signal = Signal {
            symbol: "000001.SZ".to_string(),
            direction: Direction::Long,
            strength: dec!(1.0),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            reference_price: None,
        };
        // Sizer asks for the full 10000, but half of cash is held in reserve:
        // usable_cash=5000, affordable=floor((5000-5)/10.003)=499 -> 400 shares.
        let order = p.process_signal(&signal, &data).expect("should still size something");
        assert_eq!(order.volume, 400);
    }

    #[test]
    fn update_on_fill_applies_long_fill_and_records_history() {
        let mut p = portfolio(dec!(100000), dec!(50000));
        let fill = Fill {
            symbol: "000001.SZ".to_string(),
            direction: Direction::Long,
            volume: 5000,
            price: dec!(10),
            commission: dec!(15),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        };
        p.update_on_fill(&fill);
        assert_eq!(p.cash, dec!(49985));
        assert_eq!(p.shares_held("000001.SZ"), 5000);
        assert_eq!(p.fill_history().len(), 1);
    }

    #[test]
    fn short_signal_below_dust_floor_is_dropped() {
        let mut p = portfolio(dec!(100000), dec!(50000));
        p.positions.insert("000001.SZ".to_string(), 10);
        let data = handler_with("000001.SZ", &[(2, dec!(1))]);
        let signal = Signal {
            symbol: "000001.SZ".to_string(),
            direction: Direction::Short,
            strength: dec!(1.0),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            reference_price: None,
        };
        assert!(p.process_signal(&signal, &data).is_none());
    }

    #[test]
    fn update_on_market_accumulates_equity_curve() {
        let mut p = portfolio(dec!(100000), dec!(50000));
        let data = handler_with("000001.SZ", &[(2, dec!(10)), (3, dec!(11))]);
        p.update_on_market(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), &data);
        assert_eq!(p.equity_curve().len(), 1);
        assert_eq!(p.equity_curve()[0].total_equity, dec!(100000));
    }
}
