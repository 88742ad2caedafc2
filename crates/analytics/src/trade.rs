use core_types::{Direction, FillRecord, Timestamp};
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};

/// A reconstructed (LONG open, SHORT close) round trip, produced once by
/// matching `fill_history` FIFO. Grounded in spec.md §4.6's trade
/// reconstruction algorithm.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ClosedTrade {
    pub symbol: String,
    pub open_ts: Timestamp,
    pub close_ts: Timestamp,
    pub volume: i64,
    pub open_price: Decimal,
    pub close_price: Decimal,
    pub open_commission: Decimal,
    pub close_commission: Decimal,
    pub gross_pnl: Decimal,
    pub net_pnl: Decimal,
    pub return_pct: Decimal,
}

struct OpenLot {
    ts: Timestamp,
    volume_remaining: i64,
    price: Decimal,
    commission_remaining: Decimal,
}

/// Matches each SHORT fill against the oldest still-open LONG lots for the
/// same symbol. Fills are processed in ascending timestamp order
/// regardless of the order they're passed in. If a SHORT fill's volume
/// outlives the open-lot queue, the residual is logged and dropped — that
/// indicates an upstream bookkeeping error, not a condition to propagate.
pub fn match_fifo_trades(fill_history: &[FillRecord]) -> Vec<ClosedTrade> {
    let mut fills: Vec<&FillRecord> = fill_history.iter().collect();
    fills.sort_by_key(|f| f.timestamp);

    let mut open_lots: HashMap<String, VecDeque<OpenLot>> = HashMap::new();
    let mut trades = Vec::new();

    for fill in fills {
        let lots = open_lots.entry(fill.symbol.clone()).or_default();
        match fill.direction {
            Direction::Long => lots.push_back(OpenLot {
                ts: fill.timestamp,
                volume_remaining: fill.volume,
                price: fill.price,
                commission_remaining: fill.commission,
            }),
            Direction::Short => {
                let original_volume = Decimal::from(fill.volume);
                let mut remaining = fill.volume;

                while remaining > 0 {
                    let Some(lot) = lots.front_mut() else {
                        tracing::warn!(
                            symbol = %fill.symbol,
                            residual_volume = remaining,
                            "FIFO open-lot queue emptied before SHORT volume was fully matched"
                        );
                        break;
                    };

                    let matched = remaining.min(lot.volume_remaining);
                    let matched_d = Decimal::from(matched);
                    let open_value = matched_d * lot.price;
                    let close_value = matched_d * fill.price;
                    let gross_pnl = close_value - open_value;
                    let alloc_open_commission =
                        lot.commission_remaining * matched_d / Decimal::from(lot.volume_remaining);
                    let alloc_close_commission = fill.commission * matched_d / original_volume;
                    let net_pnl = gross_pnl - alloc_open_commission - alloc_close_commission;
                    let return_pct = if open_value > Decimal::ZERO {
                        gross_pnl / open_value * Decimal::from(100)
                    } else {
                        Decimal::ZERO
                    };

                    trades.push(ClosedTrade {
                        symbol: fill.symbol.clone(),
                        open_ts: lot.ts,
                        close_ts: fill.timestamp,
                        volume: matched,
                        open_price: lot.price,
                        close_price: fill.price,
                        open_commission: alloc_open_commission,
                        close_commission: alloc_close_commission,
                        gross_pnl,
                        net_pnl,
                        return_pct,
                    });

                    lot.volume_remaining -= matched;
                    lot.commission_remaining -= alloc_open_commission;
                    remaining -= matched;
                    if lot.volume_remaining == 0 {
                        lots.pop_front();
                    }
                }
            }
        }
    }

    trades
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn fill(day: u32, direction: Direction, volume: i64, price: Decimal, commission: Decimal) -> FillRecord {
        let trade_value = Decimal::from(volume) * price;
        let net_value = match direction {
            Direction::Long => trade_value + commission,
            Direction::Short => trade_value - commission,
        };
        FillRecord {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            symbol: "000001.SZ".to_string(),
            direction,
            volume,
            price,
            commission,
            trade_value,
            net_value,
        }
    }

    #[test]
    fn fifo_partial_matching_scenario_c() {
        let fills = vec![
            fill(1, Direction::Long, 300, dec!(10), dec!(5)),
            fill(2, Direction::Long, 200, dec!(12), dec!(5)),
            fill(3, Direction::Short, 400, dec!(15), dec!(5)),
        ];
        let trades = match_fifo_trades(&fills);
        assert_eq!(trades.len(), 2);

        assert_eq!(trades[0].volume, 300);
        assert_eq!(trades[0].gross_pnl, dec!(1500));
        assert_eq!(trades[0].open_commission, dec!(5));
        assert_eq!(trades[0].close_commission, dec!(3.75));
        assert_eq!(trades[0].net_pnl, dec!(1491.25));

        assert_eq!(trades[1].volume, 100);
        assert_eq!(trades[1].gross_pnl, dec!(300));
        assert_eq!(trades[1].open_commission, dec!(2.5));
        assert_eq!(trades[1].close_commission, dec!(1.25));
        assert_eq!(trades[1].net_pnl, dec!(296.25));
    }

    #[test]
    fn residual_short_volume_is_dropped_with_a_warning() {
        let fills = vec![
            fill(1, Direction::Long, 100, dec!(10), dec!(5)),
            fill(2, Direction::Short, 300, dec!(15), dec!(5)),
        ];
        let trades = match_fifo_trades(&fills);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].volume, 100);
    }
}
