use crate::enums::{Direction, Exchange, Interval, OrderType};
use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bars carry date granularity only; the core never simulates intra-day.
pub type Timestamp = NaiveDate;

/// The epsilon used to detect a bar closing at its limit-up/limit-down price.
pub const LIMIT_EPSILON: Decimal = dec!(0.01);

/// One interval of OHLCV data for one symbol.
///
/// Invariants (enforced by [`Bar::new`]):
/// `low <= min(open, close) <= max(open, close) <= high`, `volume >= 0`,
/// `turnover >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub exchange: Exchange,
    pub timestamp: Timestamp,
    pub interval: Interval,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Shares traded (already converted from lots at ingestion time).
    pub volume: Decimal,
    /// Currency units traded.
    pub turnover: Decimal,
    pub pre_close: Decimal,
    pub limit_up: Decimal,
    pub limit_down: Decimal,
    /// Free-form extras: adjustment factor, PE, turnover rate, market cap, ...
    pub extras: HashMap<String, Decimal>,
}

impl Bar {
    /// Constructs a `Bar`, rejecting one that violates the OHLC/volume
    /// invariants. This is where a `BarSource` implementation should reject
    /// malformed rows at load time (§7 error kind 2).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: String,
        exchange: Exchange,
        timestamp: Timestamp,
        interval: Interval,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
        turnover: Decimal,
        pre_close: Decimal,
        limit_up: Decimal,
        limit_down: Decimal,
        extras: HashMap<String, Decimal>,
    ) -> Result<Self, CoreError> {
        let body_low = open.min(close);
        let body_high = open.max(close);

        if !(low <= body_low && body_high <= high) {
            return Err(CoreError::InvalidBar(
                symbol,
                format!(
                    "inverted OHLC: low={low} open={open} close={close} high={high}"
                ),
            ));
        }
        if volume.is_sign_negative() {
            return Err(CoreError::InvalidBar(
                symbol,
                format!("negative volume: {volume}"),
            ));
        }
        if turnover.is_sign_negative() {
            return Err(CoreError::InvalidBar(
                symbol,
                format!("negative turnover: {turnover}"),
            ));
        }

        Ok(Self {
            symbol,
            exchange,
            timestamp,
            interval,
            open,
            high,
            low,
            close,
            volume,
            turnover,
            pre_close,
            limit_up,
            limit_down,
            extras,
        })
    }

    pub fn is_limit_up(&self) -> bool {
        self.close >= self.limit_up - LIMIT_EPSILON
    }

    pub fn is_limit_down(&self) -> bool {
        self.close <= self.limit_down + LIMIT_EPSILON
    }
}

/// A strategy's request to open (`Long`) or close (`Short`) a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub direction: Direction,
    /// Advisory strength in `[0, 1]`; sizers may ignore it.
    pub strength: Decimal,
    pub timestamp: Timestamp,
    pub reference_price: Option<Decimal>,
}

/// A risk-checked, sized instruction to trade, emitted by the Portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub symbol: String,
    pub order_type: OrderType,
    pub direction: Direction,
    /// Integer shares; always a multiple of the 100-share A-share board lot
    /// when it originates from `Portfolio::process_signal`.
    pub volume: i64,
    /// Only meaningful for `OrderType::Limit`.
    pub limit_price: Option<Decimal>,
    pub timestamp: Timestamp,
}

/// The receipt of a simulated (or live) trade execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub symbol: String,
    pub direction: Direction,
    pub volume: i64,
    pub price: Decimal,
    pub commission: Decimal,
    pub timestamp: Timestamp,
}

impl Fill {
    pub fn trade_value(&self) -> Decimal {
        self.price * Decimal::from(self.volume)
    }

    /// `trade_value + commission` for a `Long` fill (cash paid out),
    /// `trade_value - commission` for a `Short` fill (cash received).
    pub fn net_value(&self) -> Decimal {
        match self.direction {
            Direction::Long => self.trade_value() + self.commission,
            Direction::Short => self.trade_value() - self.commission,
        }
    }
}

/// A snapshot view of one held position, used for read-only reporting
/// (e.g. in [`crate::Position`] lists handed to strategies).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub shares: i64,
}

/// One append-only entry in the equity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: Timestamp,
    pub total_equity: Decimal,
    pub cash: Decimal,
    pub positions_value: Decimal,
}

/// One append-only entry in the fill history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillRecord {
    pub timestamp: Timestamp,
    pub symbol: String,
    pub direction: Direction,
    pub volume: i64,
    pub price: Decimal,
    pub commission: Decimal,
    pub trade_value: Decimal,
    pub net_value: Decimal,
}

impl From<&Fill> for FillRecord {
    fn from(fill: &Fill) -> Self {
        Self {
            timestamp: fill.timestamp,
            symbol: fill.symbol.clone(),
            direction: fill.direction,
            volume: fill.volume,
            price: fill.price,
            commission: fill.commission,
            trade_value: fill.trade_value(),
            net_value: fill.net_value(),
        }
    }
}
